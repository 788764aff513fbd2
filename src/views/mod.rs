// SPDX-License-Identifier: MPL-2.0
//! Views: the full-screen application modes and their management.
//!
//! A view module implements [`View`]; the registry instantiates modules
//! from a [`registry::ModuleTable`] and the [`manager::ViewManager`]
//! drives switching, input dispatch and exposure.

pub mod manager;
pub mod proxy;
pub mod registry;

use crate::accel::{AccelHandle, AccelRegistry};
use crate::application::port::surface::DrawSurface;
use crate::domain::input::{Key, Modifiers, MouseButton, PressKind};
use crate::domain::{ViewFlags, ViewId, ViewKind, ViewToken};

/// Upper bound on loaded view modules.
pub const MAX_VIEWS: usize = 10;

/// Reason a view refused entry during `try_enter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDenial {
    pub reason: String,
}

impl EntryDenial {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A view module.
///
/// Only `kind` is mandatory. Every other callback has a no-op default,
/// mirroring the module contract where any symbol may be absent.
pub trait View {
    /// Capability identity of this view.
    fn kind(&self) -> ViewKind;

    /// Human-readable name; the module name is used when absent.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Behavior flags; none by default.
    fn flags(&self) -> ViewFlags {
        ViewFlags::NONE
    }

    /// Called once right after the module is instantiated.
    fn init(&mut self) {}

    /// Called once after all modules are loaded and a GUI exists.
    fn gui_init(&mut self) {}

    /// Called once at shutdown, before the module is dropped.
    fn cleanup(&mut self) {}

    /// Paints the view onto the center area.
    fn expose(
        &mut self,
        _surface: &mut dyn DrawSurface,
        _width: f32,
        _height: f32,
        _pointer_x: f32,
        _pointer_y: f32,
    ) {
    }

    /// Asks whether the view can become active right now. Denying leaves
    /// the current view untouched.
    fn try_enter(&mut self) -> Result<(), EntryDenial> {
        Ok(())
    }

    fn enter(&mut self) {}

    fn leave(&mut self) {}

    /// Resets the view to its initial interactive state.
    fn reset(&mut self) {}

    fn mouse_enter(&mut self) {}

    fn mouse_leave(&mut self) {}

    fn mouse_moved(&mut self, _x: f64, _y: f64, _pressure: f64, _which: MouseButton) {}

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

    fn key_pressed(&mut self, _key: Key, _mods: Modifiers) -> bool {
        false
    }

    fn key_released(&mut self, _key: Key, _mods: Modifiers) -> bool {
        false
    }

    /// Viewport size change. Broadcast to every loaded view, active or
    /// not, so inactive views keep accurate dimensions.
    fn configure(&mut self, _width: u32, _height: u32) {}

    fn scrolled(&mut self, _x: f64, _y: f64, _up: bool, _mods: Modifiers) {}

    /// Registers the view's accelerator paths at load time.
    fn init_key_accels(&mut self, _accels: &mut AccelRegistry) {}

    /// Connects the view's accelerators while it is active, returning
    /// their handles.
    fn connect_key_accels(&mut self, _accels: &mut AccelRegistry) -> Vec<AccelHandle> {
        Vec::new()
    }
}

/// Independent scroll axis state: position plus total and viewport
/// extent, in view-defined units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub pos: f32,
    pub size: f32,
    pub viewport: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            pos: 0.0,
            size: 1.0,
            viewport: 1.0,
        }
    }
}

/// Manager-side state for one loaded view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDescriptor {
    pub id: ViewId,
    pub module_name: String,
    pub kind: ViewKind,
    pub width: u32,
    pub height: u32,
    pub hscroll: ScrollState,
    pub vscroll: ScrollState,
    pub accels: Vec<AccelHandle>,
}

impl ViewDescriptor {
    /// Descriptor with sane pre-configure defaults (a 100×100 viewport,
    /// full-extent scroll regions).
    #[must_use]
    pub fn new(id: ViewId, module_name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            id,
            module_name: module_name.into(),
            kind,
            width: 100,
            height: 100,
            hscroll: ScrollState::default(),
            vscroll: ScrollState::default(),
            accels: Vec::new(),
        }
    }
}

/// A loaded view: its descriptor plus the module instance.
pub struct ViewSlot {
    pub descriptor: ViewDescriptor,
    pub module: Box<dyn View>,
}

impl ViewSlot {
    /// Display name, falling back to the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.module
            .display_name()
            .unwrap_or(&self.descriptor.module_name)
    }

    #[must_use]
    pub fn token(&self) -> ViewToken {
        ViewToken {
            id: self.descriptor.id,
            kind: self.descriptor.kind,
            name: self.name().to_string(),
        }
    }

    /// Whether this view is excluded from the regular view picker.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.module.flags().contains(ViewFlags::HIDDEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl View for Bare {
        fn kind(&self) -> ViewKind {
            ViewKind::Slideshow
        }
    }

    struct Hidden;

    impl View for Hidden {
        fn kind(&self) -> ViewKind {
            ViewKind::Arcade
        }

        fn flags(&self) -> ViewFlags {
            ViewFlags::HIDDEN
        }
    }

    #[test]
    fn descriptor_defaults_match_preconfigure_state() {
        let descriptor = ViewDescriptor::new(ViewId::new(0), "slideshow", ViewKind::Slideshow);
        assert_eq!(descriptor.width, 100);
        assert_eq!(descriptor.height, 100);
        assert_eq!(descriptor.hscroll.pos, 0.0);
        assert_eq!(descriptor.hscroll.size, 1.0);
        assert_eq!(descriptor.vscroll.viewport, 1.0);
        assert!(descriptor.accels.is_empty());
    }

    #[test]
    fn slot_name_falls_back_to_module_name() {
        let slot = ViewSlot {
            descriptor: ViewDescriptor::new(ViewId::new(3), "slideshow", ViewKind::Slideshow),
            module: Box::new(Bare),
        };
        assert_eq!(slot.name(), "slideshow");
        assert_eq!(slot.token().id, ViewId::new(3));
    }

    #[test]
    fn default_callbacks_are_inert() {
        let mut view = Bare;
        assert!(view.try_enter().is_ok());
        assert!(!view.key_pressed(Key::Char('a'), Modifiers::none()));
        assert!(!view.button_released(0.0, 0.0, MouseButton::PRIMARY, Modifiers::none()));
        assert!(view.display_name().is_none());
        assert_eq!(view.flags(), ViewFlags::NONE);
    }

    #[test]
    fn hidden_flag_surfaces_through_the_slot() {
        let slot = ViewSlot {
            descriptor: ViewDescriptor::new(ViewId::new(0), "arcade", ViewKind::Arcade),
            module: Box::new(Hidden),
        };
        assert!(slot.is_hidden());

        let slot = ViewSlot {
            descriptor: ViewDescriptor::new(ViewId::new(1), "slideshow", ViewKind::Slideshow),
            module: Box::new(Bare),
        };
        assert!(!slot.is_hidden());
    }
}
