// SPDX-License-Identifier: MPL-2.0
//! Dockable tool plugins.
//!
//! A plugin is a tool panel attached to one or more views. The plugin
//! system itself lives outside this crate; the view manager consumes the
//! [`Plugin`] contract to move panels between containers on every view
//! switch and to offer input events.
//!
//! Registration order matters: the dispatcher and the switch machinery
//! iterate plugins most-recently-registered first. [`PluginRegistry`]
//! makes that an explicit contract instead of a container accident.

use crate::accel::{AccelHandle, AccelRegistry};
use crate::application::port::panels::{PanelContainer, WidgetId};
use crate::application::port::surface::DrawSurface;
use crate::domain::input::{Modifiers, MouseButton, PressKind};
use crate::domain::{ViewKindSet, ViewToken};

/// Contract consumed from the plugin system.
///
/// Every lifecycle and input callback is optional; the default
/// implementations are no-ops (or "not handled" for input). `views` is
/// the one declaration a well-formed plugin must provide; a plugin
/// returning `None` is logged and skipped at every iteration site.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Capability mask: the set of views this plugin is visible in.
    fn views(&self) -> Option<ViewKindSet>;

    /// Container the plugin's widget docks into.
    fn container(&self) -> PanelContainer;

    /// The plugin's bare widget.
    fn widget(&self) -> WidgetId;

    /// Whether the plugin wraps its widget in a collapsible expander.
    fn expandable(&self) -> bool {
        false
    }

    /// Builds or returns the expander widget; `None` when the plugin
    /// exposes no expander and its bare widget is docked directly.
    fn expander(&mut self) -> Option<WidgetId> {
        None
    }

    /// Applies the persisted expanded flag to the expander.
    fn set_expanded(&mut self, _expanded: bool) {}

    /// Drops per-view GUI state when the application leaves all views.
    fn gui_cleanup(&mut self) {}

    fn view_enter(&mut self, _outgoing: Option<&ViewToken>, _incoming: &ViewToken) {}

    fn view_leave(&mut self, _outgoing: &ViewToken, _incoming: Option<&ViewToken>) {}

    /// Draws on top of the view's own expose output.
    fn gui_post_expose(
        &mut self,
        _surface: &mut dyn DrawSurface,
        _width: f32,
        _height: f32,
        _pointer_x: f32,
        _pointer_y: f32,
    ) {
    }

    fn mouse_moved(&mut self, _x: f64, _y: f64, _pressure: f64, _which: MouseButton) -> bool {
        false
    }

    fn button_pressed(
        &mut self,
        _x: f64,
        _y: f64,
        _pressure: f64,
        _which: MouseButton,
        _kind: PressKind,
        _mods: Modifiers,
    ) -> bool {
        false
    }

    fn button_released(&mut self, _x: f64, _y: f64, _which: MouseButton, _mods: Modifiers) -> bool {
        false
    }

    fn scrolled(&mut self, _x: f64, _y: f64, _up: bool, _mods: Modifiers) -> bool {
        false
    }

    /// Connects the plugin's own accelerators, returning their handles.
    fn connect_key_accels(&mut self, _accels: &mut AccelRegistry) -> Vec<AccelHandle> {
        Vec::new()
    }
}

/// Manager-side state for one registered plugin.
#[derive(Default)]
pub struct PluginBinding {
    /// Widget currently docked in a container (expander or bare widget).
    pub attached: Option<WidgetId>,
    /// Handles of the plugin's connected accelerators. Always fully
    /// disconnected before the plugin's view membership changes.
    pub accels: Vec<AccelHandle>,
}

/// One registered plugin plus its binding state.
pub struct PluginSlot {
    pub plugin: Box<dyn Plugin>,
    pub binding: PluginBinding,
}

/// Ordered plugin collection.
#[derive(Default)]
pub struct PluginRegistry {
    slots: Vec<PluginSlot>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin, returning its registration index.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> usize {
        self.slots.push(PluginSlot {
            plugin,
            binding: PluginBinding::default(),
        });
        self.slots.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Indices in dispatch order: most-recently-registered first.
    pub fn indices_newest_first(&self) -> impl Iterator<Item = usize> {
        (0..self.slots.len()).rev()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PluginSlot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PluginSlot> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginSlot> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn views(&self) -> Option<ViewKindSet> {
            Some(ViewKindSet::empty())
        }

        fn container(&self) -> PanelContainer {
            PanelContainer::RightCenter
        }

        fn widget(&self) -> WidgetId {
            WidgetId(0)
        }
    }

    #[test]
    fn newest_first_iteration_reverses_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Named("first")));
        registry.register(Box::new(Named("second")));
        registry.register(Box::new(Named("third")));

        let names: Vec<&str> = registry
            .indices_newest_first()
            .map(|i| registry.get(i).expect("slot must exist").plugin.name())
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[test]
    fn default_callbacks_report_unhandled() {
        let mut plugin = Named("idle");
        assert!(!plugin.mouse_moved(0.0, 0.0, 0.0, MouseButton::PRIMARY));
        assert!(!plugin.scrolled(0.0, 0.0, true, Modifiers::none()));
        assert!(plugin.expander().is_none());
        assert!(!plugin.expandable());
    }
}
