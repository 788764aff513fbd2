// SPDX-License-Identifier: MPL-2.0
//! Dockable-panel host port.
//!
//! The toolkit owns the actual widgets; the core only moves opaque
//! widget handles between the fixed panel containers during view
//! switches. Expander widgets destroy their child with them, so the
//! host exposes the body so it can be detached first.

/// Opaque handle to a toolkit widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

/// The fixed docking containers around the center view area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelContainer {
    LeftTop,
    LeftCenter,
    LeftBottom,
    RightTop,
    RightCenter,
    RightBottom,
    TopCenter,
    BottomCenter,
}

impl PanelContainer {
    pub const ALL: [PanelContainer; 8] = [
        PanelContainer::LeftTop,
        PanelContainer::LeftCenter,
        PanelContainer::LeftBottom,
        PanelContainer::RightTop,
        PanelContainer::RightCenter,
        PanelContainer::RightBottom,
        PanelContainer::TopCenter,
        PanelContainer::BottomCenter,
    ];
}

/// Port for the panel/container side of the main window.
pub trait PanelHost {
    /// Appends a widget to a container.
    fn add_widget(&mut self, container: PanelContainer, widget: WidgetId);

    /// Current children of a container, in attachment order.
    fn children(&self, container: PanelContainer) -> Vec<WidgetId>;

    /// Detaches a widget from a container without destroying it.
    fn remove_widget(&mut self, container: PanelContainer, widget: WidgetId);

    /// Body widget of a collapsible expander, `None` for plain widgets.
    fn expander_body(&self, widget: WidgetId) -> Option<WidgetId>;

    /// Detaches an expander's body from its inner container so the body
    /// survives the expander's destruction.
    fn detach_expander_body(&mut self, expander: WidgetId);

    /// Destroys a widget (and, for expanders, the now-childless shell).
    fn destroy_widget(&mut self, widget: WidgetId);

    /// Appends a fixed-size end-marker spacer to a container.
    fn append_end_marker(&mut self, container: PanelContainer);

    /// Restores the persisted visibility of the panels for the current
    /// view.
    fn restore_panels(&mut self);

    fn show_widget(&mut self, widget: WidgetId);
    fn hide_widget(&mut self, widget: WidgetId);

    /// Requests a redraw of the scrollbar border strips.
    fn queue_border_redraw(&mut self);
}
