// SPDX-License-Identifier: MPL-2.0
//! The view manager: switch state machine and input dispatch.
//!
//! All state the original kept in process-wide globals lives here and is
//! reached through an explicit `&mut ViewManager`. The manager owns the
//! loaded views, the plugin registry, the accelerator registry, the
//! proxy slots and the collaborator ports, and everything it does runs
//! synchronously on the UI thread.

use crate::accel::AccelRegistry;
use crate::application::port::library::ImageLibrary;
use crate::application::port::panels::{PanelContainer, PanelHost, WidgetId};
use crate::application::port::signal::SignalHub;
use crate::application::port::style::Rgba;
use crate::application::port::surface::DrawSurface;
use crate::config::Config;
use crate::domain::geometry::RectF;
use crate::domain::input::{Key, Modifiers, MouseButton, PressKind};
use crate::domain::{ImageId, ViewId, ViewKind, ViewKindSet, ViewToken};
use crate::error::{LoadError, SwitchError};
use crate::plugins::{Plugin, PluginRegistry};
use crate::views::proxy::{MarkerId, MarkerKind, PrintInfo, ViewProxies};
use crate::views::registry::{ModuleTable, ViewRegistry, DEFAULT_MODULES};
use crate::views::ViewSlot;

/// Background painted when no view is active.
const VIEW_BACKGROUND: Rgba = Rgba::new(0.13, 0.13, 0.13, 1.0);

/// Where a switch should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchTarget {
    /// Leave the current view without entering another one. This is the
    /// designated shutdown-before-exit transition.
    None,
    /// A view by registry index. Out-of-range indices fall back to the
    /// current view.
    Index(usize),
    /// The first loaded view of a kind, falling back to the current view
    /// when no such view is loaded.
    Kind(ViewKind),
}

/// The ten-key unlock sequence guarding the hidden view.
pub const UNLOCK_SEQUENCE: [Key; 10] = [
    Key::Up,
    Key::Up,
    Key::Down,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Left,
    Key::Right,
    Key::Char('b'),
    Key::Char('a'),
];

/// Sequence matcher for [`UNLOCK_SEQUENCE`].
///
/// A mismatching key resets progress and is then re-evaluated as a
/// possible fresh sequence start.
#[derive(Debug, Default)]
pub struct UnlockSequence {
    progress: usize,
}

impl UnlockSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one key; returns `true` exactly when the full sequence just
    /// completed (progress resets either way).
    pub fn advance(&mut self, key: Key) -> bool {
        if key == UNLOCK_SEQUENCE[self.progress] {
            self.progress += 1;
            if self.progress == UNLOCK_SEQUENCE.len() {
                self.progress = 0;
                return true;
            }
        } else {
            self.progress = usize::from(key == UNLOCK_SEQUENCE[0]);
        }
        false
    }

    #[must_use]
    pub fn progress(&self) -> usize {
        self.progress
    }
}

fn warn_missing_views(name: &str) {
    log::warn!("[view_manager] plugin '{}' does not declare view flags", name);
}

/// Process-wide view management state.
pub struct ViewManager {
    registry: ViewRegistry,
    plugins: PluginRegistry,
    accels: AccelRegistry,
    proxies: ViewProxies,
    panels: Box<dyn PanelHost>,
    signals: Box<dyn SignalHub>,
    library: Box<dyn ImageLibrary>,
    config: Config,
    current: Option<ViewId>,
    unlock: UnlockSequence,
    mouse_over: Option<ImageId>,
}

impl ViewManager {
    pub fn new(
        panels: Box<dyn PanelHost>,
        signals: Box<dyn SignalHub>,
        library: Box<dyn ImageLibrary>,
        config: Config,
        gui_attached: bool,
    ) -> Self {
        Self {
            registry: ViewRegistry::new(gui_attached),
            plugins: PluginRegistry::new(),
            accels: AccelRegistry::new(),
            proxies: ViewProxies::new(),
            panels,
            signals,
            library,
            config,
            current: None,
            unlock: UnlockSequence::new(),
            mouse_over: None,
        }
    }

    // -------------------------------------------------------------------------
    // Loading and registration
    // -------------------------------------------------------------------------

    /// Loads the default module list, logging and skipping failures.
    pub fn load_default_modules(&mut self, table: &ModuleTable) -> usize {
        let Self {
            registry, accels, ..
        } = self;
        registry.load_list(table, &DEFAULT_MODULES, accels)
    }

    pub fn load_module(&mut self, table: &ModuleTable, name: &str) -> Result<ViewId, LoadError> {
        let Self {
            registry, accels, ..
        } = self;
        registry.load(table, name, accels)
    }

    /// Runs `gui_init` on every loaded view.
    pub fn gui_init(&mut self) {
        self.registry.gui_init_all();
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) -> usize {
        self.plugins.register(plugin)
    }

    /// Leaves the active view and unloads every module. Only valid at
    /// process shutdown.
    pub fn shutdown(&mut self) {
        let _ = self.switch_to(SwitchTarget::None);
        let Self {
            registry, accels, ..
        } = self;
        registry.unload_all(accels);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn current(&self) -> Option<ViewId> {
        self.current
    }

    #[must_use]
    pub fn current_slot(&self) -> Option<&ViewSlot> {
        self.current.and_then(|id| self.registry.get(id))
    }

    /// Display name of the active view, `""` when none is active.
    #[must_use]
    pub fn current_view_name(&self) -> &str {
        self.current_slot().map(ViewSlot::name).unwrap_or("")
    }

    #[must_use]
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    #[must_use]
    pub fn proxies(&self) -> &ViewProxies {
        &self.proxies
    }

    /// Views populate their proxy slots through this while entering and
    /// clear them when leaving.
    pub fn proxies_mut(&mut self) -> &mut ViewProxies {
        &mut self.proxies
    }

    #[must_use]
    pub fn accels(&self) -> &AccelRegistry {
        &self.accels
    }

    #[must_use]
    pub fn mouse_over(&self) -> Option<ImageId> {
        self.mouse_over
    }

    /// Updates the hovered image, fed by the active view's expose cycle.
    pub fn set_mouse_over(&mut self, id: Option<ImageId>) {
        self.mouse_over = id;
    }

    fn current_kind(&self) -> Option<ViewKind> {
        self.current_slot().map(|slot| slot.descriptor.kind)
    }

    // -------------------------------------------------------------------------
    // Switching
    // -------------------------------------------------------------------------

    /// Runs the switch transition. On `Ok` the target view is active (or
    /// none, for [`SwitchTarget::None`]); on `Err` nothing has changed.
    pub fn switch_to(&mut self, target: SwitchTarget) -> Result<(), SwitchError> {
        if matches!(target, SwitchTarget::None) {
            return match self.current {
                Some(current) => {
                    self.leave_for_exit(current);
                    Ok(())
                }
                None => Err(SwitchError::InvalidTarget),
            };
        }

        let new_id = self
            .resolve_target(target)
            .ok_or(SwitchError::InvalidTarget)?;

        // Ask the target whether entry is possible. This is the only
        // failure point past which the machine guarantees no mutation.
        {
            let slot = self
                .registry
                .get_mut(new_id)
                .ok_or(SwitchError::InvalidTarget)?;
            if let Err(denial) = slot.module.try_enter() {
                return Err(SwitchError::EntryDenied(denial.reason));
            }
        }

        let outgoing = self
            .current
            .and_then(|id| self.registry.get(id))
            .map(ViewSlot::token);
        let incoming = self
            .registry
            .get(new_id)
            .map(ViewSlot::token)
            .ok_or(SwitchError::InvalidTarget)?;

        if let Some(old_token) = &outgoing {
            self.leave_outgoing(old_token.clone(), &incoming);
        }

        // Commit.
        self.current = Some(new_id);

        self.panels.restore_panels();
        self.attach_incoming_plugins(&incoming);
        self.restore_and_enter_plugins(outgoing.as_ref(), &incoming);

        // Enter the view after its plugins are in place: some view
        // initializers depend on plugin state already being attached.
        {
            let Self {
                registry, accels, ..
            } = self;
            if let Some(slot) = registry.get_mut(new_id) {
                slot.module.enter();
                slot.descriptor.accels = slot.module.connect_key_accels(accels);
            }
        }

        self.signals.view_changed(outgoing.as_ref(), &incoming);

        self.panels.append_end_marker(PanelContainer::LeftCenter);
        self.panels.append_end_marker(PanelContainer::RightCenter);

        Ok(())
    }

    /// Convenience for [`SwitchTarget::Kind`].
    pub fn switch_to_kind(&mut self, kind: ViewKind) -> Result<(), SwitchError> {
        self.switch_to(SwitchTarget::Kind(kind))
    }

    fn resolve_target(&self, target: SwitchTarget) -> Option<ViewId> {
        match target {
            SwitchTarget::None => None,
            SwitchTarget::Index(index) => {
                if index < self.registry.len() {
                    Some(ViewId::new(index))
                } else {
                    self.current
                }
            }
            SwitchTarget::Kind(kind) => self.registry.find_by_kind(kind).or(self.current),
        }
    }

    /// The shutdown-before-exit path: leave the view, tear down its
    /// plugins and empty every container.
    fn leave_for_exit(&mut self, current: ViewId) {
        let (old_token, old_kind) = {
            let Some(slot) = self.registry.get_mut(current) else {
                return;
            };
            let token = slot.token();
            let kind = slot.descriptor.kind;
            slot.module.leave();
            (token, kind)
        };

        let Self {
            plugins, accels, ..
        } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if mask.contains(old_kind) {
                slot.plugin.view_leave(&old_token, None);
                slot.plugin.gui_cleanup();
                accels.disconnect_list(&mut slot.binding.accels);
                slot.binding.attached = None;
            }
        }

        for container in PanelContainer::ALL {
            for child in self.panels.children(container) {
                self.panels.destroy_widget(child);
            }
        }
        self.current = None;
    }

    /// Leaves the outgoing view and detaches its plugins, completing
    /// every outgoing callback before any incoming one runs.
    fn leave_outgoing(&mut self, old_token: ViewToken, incoming: &ViewToken) {
        {
            let Self {
                registry, accels, ..
            } = self;
            if let Some(slot) = registry.get_mut(old_token.id) {
                slot.module.leave();
                accels.disconnect_list(&mut slot.descriptor.accels);
            }
        }

        let old_kind = old_token.kind;
        let Self {
            plugins, accels, ..
        } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if mask.contains(old_kind) {
                slot.plugin.view_leave(&old_token, Some(incoming));
                accels.disconnect_list(&mut slot.binding.accels);
                slot.binding.attached = None;
            }
        }

        // Empty the containers. Expanders destroy their child with them,
        // so the body is detached before the expander shell goes.
        for container in PanelContainer::ALL {
            for child in self.panels.children(container) {
                if self.panels.expander_body(child).is_some() {
                    self.panels.detach_expander_body(child);
                    self.panels.destroy_widget(child);
                } else {
                    self.panels.remove_widget(container, child);
                }
            }
        }
    }

    /// First incoming pass: dock every plugin of the new view and
    /// reconnect its accelerators, newest registration first.
    fn attach_incoming_plugins(&mut self, incoming: &ViewToken) {
        let Self {
            plugins,
            accels,
            panels,
            ..
        } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if !mask.contains(incoming.kind) {
                continue;
            }

            let widget = slot
                .plugin
                .expander()
                .unwrap_or_else(|| slot.plugin.widget());
            let mut handles = slot.plugin.connect_key_accels(accels);
            handles.extend(accels.connect_common_plugin_accels(slot.plugin.name()));
            slot.binding.accels = handles;
            panels.add_widget(slot.plugin.container(), widget);
            slot.binding.attached = Some(widget);
        }
    }

    /// Second incoming pass: restore persisted panel state and run the
    /// plugins' enter callbacks.
    fn restore_and_enter_plugins(&mut self, outgoing: Option<&ViewToken>, incoming: &ViewToken) {
        let Self {
            plugins,
            panels,
            config,
            ..
        } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if !mask.contains(incoming.kind) {
                continue;
            }

            let plugin_name = slot.plugin.name().to_string();
            if slot.plugin.expandable() {
                let expanded = config.is_panel_expanded(&incoming.name, &plugin_name);
                slot.plugin.set_expanded(expanded);
            } else {
                let widget = slot.plugin.widget();
                if config.is_panel_visible(&incoming.name, &plugin_name) {
                    panels.show_widget(widget);
                } else {
                    panels.hide_widget(widget);
                }
            }
            slot.plugin.view_enter(outgoing, incoming);
        }
    }

    // -------------------------------------------------------------------------
    // Exposure
    // -------------------------------------------------------------------------

    /// Paints the center area: the active view first, then every
    /// matching plugin's post-expose overlay.
    pub fn expose(
        &mut self,
        surface: &mut dyn DrawSurface,
        width: u32,
        height: u32,
        pointer_x: f32,
        pointer_y: f32,
    ) {
        let Some(current) = self.current else {
            surface.set_color(VIEW_BACKGROUND);
            surface.paint();
            return;
        };

        // A pointer below the view belongs to the panels; park it far
        // outside so hover tests in the view cannot match.
        let (px, py) = if pointer_y > height as f32 {
            (10000.0, -1.0)
        } else {
            (pointer_x, pointer_y)
        };

        let kind;
        {
            let Some(slot) = self.registry.get_mut(current) else {
                return;
            };
            slot.descriptor.width = width;
            slot.descriptor.height = height;
            kind = slot.descriptor.kind;

            surface.clip_rect(RectF::new(0.0, 0.0, width as f32, height as f32));
            surface.save();
            slot.module
                .expose(surface, width as f32, height as f32, px, py);
            surface.restore();
        }

        let Self { plugins, .. } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if mask.contains(kind) {
                slot.plugin
                    .gui_post_expose(surface, width as f32, height as f32, px, py);
            }
        }
    }

    /// Resets the active view to its initial interactive state.
    pub fn reset(&mut self) {
        if let Some(current) = self.current {
            if let Some(slot) = self.registry.get_mut(current) {
                slot.module.reset();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Input dispatch
    // -------------------------------------------------------------------------

    pub fn mouse_enter(&mut self) {
        if let Some(current) = self.current {
            if let Some(slot) = self.registry.get_mut(current) {
                slot.module.mouse_enter();
            }
        }
    }

    pub fn mouse_leave(&mut self) {
        if let Some(current) = self.current {
            if let Some(slot) = self.registry.get_mut(current) {
                slot.module.mouse_leave();
            }
        }
    }

    /// Offers the move to every matching plugin; the view's own handler
    /// runs only when no plugin claimed the event.
    pub fn mouse_moved(&mut self, x: f64, y: f64, pressure: f64, which: MouseButton) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let handled = self.offer_to_plugins(kind, |plugin| plugin.mouse_moved(x, y, pressure, which));
        if !handled {
            if let Some(current) = self.current {
                if let Some(slot) = self.registry.get_mut(current) {
                    slot.module.mouse_moved(x, y, pressure, which);
                }
            }
        }
    }

    /// Offers the release to every matching plugin; the view's handler
    /// runs only when no plugin claimed it, and its result is ignored.
    pub fn button_released(&mut self, x: f64, y: f64, which: MouseButton, mods: Modifiers) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let handled =
            self.offer_to_plugins(kind, |plugin| plugin.button_released(x, y, which, mods));
        if !handled {
            if let Some(current) = self.current {
                if let Some(slot) = self.registry.get_mut(current) {
                    slot.module.button_released(x, y, which, mods);
                }
            }
        }
    }

    /// Press events are claimable: the first plugin (newest registration
    /// first) to handle the press stops the search and the dispatcher
    /// reports it handled. Only when no plugin claims it does the view's
    /// handler run, and its result is propagated unchanged.
    pub fn button_pressed(
        &mut self,
        x: f64,
        y: f64,
        pressure: f64,
        which: MouseButton,
        kind: PressKind,
        mods: Modifiers,
    ) -> bool {
        let Some(view_kind) = self.current_kind() else {
            return false;
        };

        let Self { plugins, .. } = self;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if mask.contains(view_kind)
                && slot
                    .plugin
                    .button_pressed(x, y, pressure, which, kind, mods)
            {
                return true;
            }
        }

        if let Some(current) = self.current {
            if let Some(slot) = self.registry.get_mut(current) {
                return slot
                    .module
                    .button_pressed(x, y, pressure, which, kind, mods);
            }
        }
        false
    }

    /// Scrolls are observable like moves: every matching plugin sees the
    /// event, and the view's handler runs only when none claimed it.
    pub fn scrolled(&mut self, x: f64, y: f64, up: bool, mods: Modifiers) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let handled = self.offer_to_plugins(kind, |plugin| plugin.scrolled(x, y, up, mods));
        if !handled {
            if let Some(current) = self.current {
                if let Some(slot) = self.registry.get_mut(current) {
                    slot.module.scrolled(x, y, up, mods);
                }
            }
        }
    }

    /// Feeds the unlock sequence, then the active view. A completed
    /// sequence requests the hidden view before the key reaches the view
    /// handler.
    pub fn key_pressed(&mut self, key: Key, mods: Modifiers) -> bool {
        if self.unlock.advance(key) {
            let _ = self.switch_to(SwitchTarget::Kind(ViewKind::Arcade));
        }

        let Some(current) = self.current else {
            return false;
        };
        let Some(slot) = self.registry.get_mut(current) else {
            return false;
        };
        slot.module.key_pressed(key, mods)
    }

    pub fn key_released(&mut self, key: Key, mods: Modifiers) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let Some(slot) = self.registry.get_mut(current) else {
            return false;
        };
        slot.module.key_released(key, mods)
    }

    /// Broadcasts a viewport resize to every loaded view, not just the
    /// active one: inactive views must keep accurate dimensions for when
    /// they become active.
    pub fn configure(&mut self, width: u32, height: u32) {
        for slot in self.registry.iter_mut() {
            slot.descriptor.width = width;
            slot.descriptor.height = height;
            slot.module.configure(width, height);
        }
    }

    /// Updates a view's scroll state and asks the host to repaint the
    /// border strips.
    #[allow(clippy::too_many_arguments)]
    pub fn set_scrollbar(
        &mut self,
        id: ViewId,
        hpos: f32,
        hsize: f32,
        hviewport: f32,
        vpos: f32,
        vsize: f32,
        vviewport: f32,
    ) {
        if let Some(slot) = self.registry.get_mut(id) {
            slot.descriptor.hscroll.pos = hpos;
            slot.descriptor.hscroll.size = hsize;
            slot.descriptor.hscroll.viewport = hviewport;
            slot.descriptor.vscroll.pos = vpos;
            slot.descriptor.vscroll.size = vsize;
            slot.descriptor.vscroll.viewport = vviewport;
        }
        self.panels.queue_border_redraw();
    }

    /// Runs `handler` for every plugin matching `kind`, newest first,
    /// with no short-circuit; reports whether any claimed the event.
    fn offer_to_plugins<F>(&mut self, kind: ViewKind, mut handler: F) -> bool
    where
        F: FnMut(&mut dyn Plugin) -> bool,
    {
        let Self { plugins, .. } = self;
        let mut handled = false;
        for i in (0..plugins.len()).rev() {
            let Some(slot) = plugins.get_mut(i) else {
                continue;
            };
            let Some(mask) = slot.plugin.views() else {
                warn_missing_views(slot.plugin.name());
                continue;
            };
            if mask.contains(kind) && handler(slot.plugin.as_mut()) {
                handled = true;
            }
        }
        handled
    }

    // -------------------------------------------------------------------------
    // Selection helpers
    // -------------------------------------------------------------------------

    /// Sets the selection bit for an image to the given value.
    pub fn set_selection(&mut self, id: ImageId, selected: bool) {
        if self.library.is_selected(id) {
            if !selected {
                self.library.remove_from_selection(id);
            }
        } else if selected {
            self.library.add_to_selection(id);
        }
    }

    /// Toggles the selection bit for an image.
    pub fn toggle_selection(&mut self, id: ImageId) {
        if self.library.is_selected(id) {
            self.library.remove_from_selection(id);
        } else {
            self.library.add_to_selection(id);
        }
    }

    /// The image an action should apply to: the hovered image in
    /// single-image zoom or full preview; otherwise the hovered image
    /// unless it is part of the selection (or nothing is hovered), in
    /// which case `None` means "act on the whole selection".
    #[must_use]
    pub fn image_to_act_on(&self) -> Option<ImageId> {
        let zoom = self
            .proxies
            .lighttable
            .as_ref()
            .map(|ops| ops.images_in_row())
            .unwrap_or(0);
        let full_preview = self
            .proxies
            .lighttable
            .as_ref()
            .and_then(|ops| ops.full_preview_image());

        if zoom == 1 || full_preview.is_some() {
            return self.mouse_over;
        }
        match self.mouse_over {
            Some(id) if !self.library.is_selected(id) => Some(id),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Proxy forwarders
    // -------------------------------------------------------------------------

    pub fn lighttable_set_zoom(&self, images_in_row: u32) {
        if let Some(ops) = &self.proxies.lighttable {
            ops.set_images_in_row(images_in_row);
        }
    }

    #[must_use]
    pub fn lighttable_zoom(&self) -> u32 {
        self.proxies
            .lighttable
            .as_ref()
            .map(|ops| ops.images_in_row())
            .unwrap_or(0)
    }

    /// Persists the grid position alongside forwarding it, so the next
    /// session restores it even if the view never re-enters.
    pub fn lighttable_set_position(&mut self, position: u32) {
        if let Some(ops) = &self.proxies.lighttable {
            ops.set_position(position);
        }
        self.config.lighttable_position = Some(position);
    }

    #[must_use]
    pub fn lighttable_position(&self) -> u32 {
        self.proxies
            .lighttable
            .as_ref()
            .map(|ops| ops.position())
            .unwrap_or(0)
    }

    pub fn filmstrip_scroll_to_image(&self, id: ImageId, activate: bool) {
        if let Some(ops) = &self.proxies.filmstrip {
            ops.scroll_to_image(id, activate);
        }
    }

    #[must_use]
    pub fn filmstrip_activated_image(&self) -> Option<ImageId> {
        self.proxies
            .filmstrip
            .as_ref()
            .and_then(|ops| ops.activated_image())
    }

    /// Makes `id` the only selected image and scrolls the strip to it.
    pub fn filmstrip_set_active_image(&mut self, id: ImageId) {
        self.library.clear_selection();
        self.library.add_to_selection(id);
        self.filmstrip_scroll_to_image(id, true);
    }

    #[must_use]
    pub fn tethering_selected_image(&self) -> Option<ImageId> {
        self.proxies
            .tethering
            .as_ref()
            .and_then(|ops| ops.selected_image())
    }

    #[must_use]
    pub fn tethering_job_code(&self) -> String {
        self.proxies
            .tethering
            .as_ref()
            .map(|ops| ops.job_code())
            .unwrap_or_default()
    }

    pub fn tethering_set_job_code(&self, code: &str) {
        if let Some(ops) = &self.proxies.tethering {
            ops.set_job_code(code);
        }
    }

    pub fn map_center_on_location(&self, longitude: f64, latitude: f64, zoom: f64) {
        if let Some(ops) = &self.proxies.map {
            ops.center_on_location(longitude, latitude, zoom);
        }
    }

    pub fn map_center_on_bbox(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) {
        if let Some(ops) = &self.proxies.map {
            ops.center_on_bbox(lon1, lat1, lon2, lat2);
        }
    }

    pub fn map_show_osd(&self, enabled: bool) {
        if let Some(ops) = &self.proxies.map {
            ops.show_osd(enabled);
        }
    }

    pub fn map_set_source(&self, source: &str) {
        if let Some(ops) = &self.proxies.map {
            ops.set_map_source(source);
        }
    }

    #[must_use]
    pub fn map_add_marker(&self, kind: MarkerKind, points: &[(f64, f64)]) -> Option<MarkerId> {
        self.proxies
            .map
            .as_ref()
            .and_then(|ops| ops.add_marker(kind, points))
    }

    pub fn map_remove_marker(&self, kind: MarkerKind, marker: MarkerId) -> bool {
        self.proxies
            .map
            .as_ref()
            .map(|ops| ops.remove_marker(kind, marker))
            .unwrap_or(false)
    }

    pub fn print_settings(&self, info: &PrintInfo) {
        if let Some(ops) = &self.proxies.print {
            ops.print_settings(info);
        }
    }

    pub fn view_toolbox_add(&self, widget: WidgetId, views: ViewKindSet) {
        if let Some(ops) = &self.proxies.view_toolbox {
            ops.add_tool(widget, views);
        }
    }

    pub fn module_toolbox_add(&self, widget: WidgetId, views: ViewKindSet) {
        if let Some(ops) = &self.proxies.module_toolbox {
            ops.add_tool(widget, views);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_sequence_completes_once_and_resets() {
        let mut unlock = UnlockSequence::new();
        for key in UNLOCK_SEQUENCE.iter().take(9) {
            assert!(!unlock.advance(*key));
        }
        assert!(unlock.advance(Key::Char('a')));
        assert_eq!(unlock.progress(), 0);
    }

    #[test]
    fn mismatching_key_resets_progress() {
        let mut unlock = UnlockSequence::new();
        assert!(!unlock.advance(Key::Up));
        assert!(!unlock.advance(Key::Up));
        assert!(!unlock.advance(Key::Char('x')));
        assert_eq!(unlock.progress(), 0);
    }

    #[test]
    fn mismatching_key_restarts_as_fresh_sequence_start() {
        let mut unlock = UnlockSequence::new();
        // Up Up Up: the third Up breaks the run but begins a new one.
        assert!(!unlock.advance(Key::Up));
        assert!(!unlock.advance(Key::Up));
        assert!(!unlock.advance(Key::Up));
        assert_eq!(unlock.progress(), 1);

        // The remaining nine keys now complete the sequence.
        let mut completed = false;
        for key in UNLOCK_SEQUENCE.iter().skip(1) {
            completed = unlock.advance(*key);
        }
        assert!(completed);
    }

    #[test]
    fn full_sequence_fires_exactly_once() {
        let mut unlock = UnlockSequence::new();
        let mut fires = 0;
        for _ in 0..2 {
            for key in UNLOCK_SEQUENCE.iter() {
                if unlock.advance(*key) {
                    fires += 1;
                }
            }
        }
        assert_eq!(fires, 2);
        assert_eq!(unlock.progress(), 0);
    }
}
