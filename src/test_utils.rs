// SPDX-License-Identifier: MPL-2.0
//! Test doubles for the collaborator ports and the module contracts.
//!
//! Everything here records what the core did to it so tests can assert
//! on ordering and side effects. The doubles hand out shared state
//! handles (`Rc<RefCell<_>>`) because the manager takes ownership of its
//! ports.

use crate::accel::{AccelHandle, AccelRegistry};
use crate::application::port::library::ImageLibrary;
use crate::application::port::panels::{PanelContainer, PanelHost, WidgetId};
use crate::application::port::signal::SignalHub;
use crate::application::port::style::{ResolvedStyle, Rgba, StyleEngine, StyleQuery};
use crate::application::port::surface::{DrawSurface, FilterHint};
use crate::application::port::thumbnails::{
    ImageInfoCache, MipLevel, ThumbBuffer, ThumbnailCache,
};
use crate::domain::geometry::RectF;
use crate::domain::input::{Key, Modifiers, MouseButton, PressKind};
use crate::domain::{ImageFlags, ImageId, ImageRecord, ViewKind, ViewKindSet, ViewToken};
use crate::plugins::Plugin;
use crate::views::{EntryDenial, View};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// =============================================================================
// RecordingSurface
// =============================================================================

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    Scale { sx: f32, sy: f32 },
    ClipRect(RectF),
    SetColor(Rgba),
    SetLineWidth(f32),
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CurveTo { x3: f32, y3: f32 },
    Arc { cx: f32, cy: f32, radius: f32 },
    Rect(RectF),
    ClosePath,
    NewPath,
    Fill,
    FillPreserve,
    Stroke,
    Paint,
    Bitmap {
        width: u32,
        height: u32,
        filter: FilterHint,
    },
    Text(String),
    Background(RectF),
    Frame(RectF),
}

/// Surface that records every call instead of rasterizing.
#[derive(Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    #[must_use]
    pub fn bitmap_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Bitmap { .. }))
            .count()
    }

    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn clip_rect(&mut self, rect: RectF) {
        self.ops.push(DrawOp::ClipRect(rect));
    }

    fn set_color(&mut self, color: Rgba) {
        self.ops.push(DrawOp::SetColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, x3: f32, y3: f32) {
        self.ops.push(DrawOp::CurveTo { x3, y3 });
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, _angle1: f32, _angle2: f32) {
        self.ops.push(DrawOp::Arc { cx, cy, radius });
    }

    fn rect(&mut self, rect: RectF) {
        self.ops.push(DrawOp::Rect(rect));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn new_path(&mut self) {
        self.ops.push(DrawOp::NewPath);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn fill_preserve(&mut self) {
        self.ops.push(DrawOp::FillPreserve);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn paint(&mut self) {
        self.ops.push(DrawOp::Paint);
    }

    fn draw_bitmap(&mut self, width: u32, height: u32, _rgba: &[u8], filter: FilterHint) {
        self.ops.push(DrawOp::Bitmap {
            width,
            height,
            filter,
        });
    }

    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _size: f32, _color: Rgba) {
        self.ops.push(DrawOp::Text(text.to_string()));
    }

    fn render_background(&mut self, _style: &ResolvedStyle, rect: RectF) {
        self.ops.push(DrawOp::Background(rect));
    }

    fn render_frame(&mut self, _style: &ResolvedStyle, rect: RectF) {
        self.ops.push(DrawOp::Frame(rect));
    }
}

// =============================================================================
// PlainStyleEngine
// =============================================================================

/// Style engine resolving every query to the same style.
pub struct PlainStyleEngine {
    pub style: ResolvedStyle,
}

impl PlainStyleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            style: ResolvedStyle::default(),
        }
    }
}

impl Default for PlainStyleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleEngine for PlainStyleEngine {
    fn resolve(&self, _query: &StyleQuery<'_>) -> ResolvedStyle {
        self.style.clone()
    }
}

// =============================================================================
// MemoryLibrary
// =============================================================================

/// Backing state of [`MemoryLibrary`].
#[derive(Default)]
pub struct LibraryState {
    pub selected: HashSet<ImageId>,
    pub groups: HashMap<ImageId, Vec<ImageId>>,
    pub labels: HashMap<ImageId, Vec<u8>>,
    pub history: HashSet<ImageId>,
}

/// In-memory image library.
#[derive(Clone, Default)]
pub struct MemoryLibrary {
    state: Rc<RefCell<LibraryState>>,
}

impl MemoryLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the backing state, usable after the library
    /// has been moved into the manager.
    #[must_use]
    pub fn state(&self) -> Rc<RefCell<LibraryState>> {
        Rc::clone(&self.state)
    }
}

impl ImageLibrary for MemoryLibrary {
    fn is_selected(&self, id: ImageId) -> bool {
        self.state.borrow().selected.contains(&id)
    }

    fn add_to_selection(&mut self, id: ImageId) {
        self.state.borrow_mut().selected.insert(id);
    }

    fn remove_from_selection(&mut self, id: ImageId) {
        self.state.borrow_mut().selected.remove(&id);
    }

    fn clear_selection(&mut self) {
        self.state.borrow_mut().selected.clear();
    }

    fn group_siblings(&self, id: ImageId) -> Vec<ImageId> {
        self.state
            .borrow()
            .groups
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    fn color_labels(&self, id: ImageId) -> Vec<u8> {
        self.state
            .borrow()
            .labels
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    fn has_history(&self, id: ImageId) -> bool {
        self.state.borrow().history.contains(&id)
    }
}

// =============================================================================
// FakeInfoCache
// =============================================================================

/// Image-record cache with an explicit resident set.
#[derive(Default)]
pub struct FakeInfoCache {
    records: HashMap<ImageId, ImageRecord>,
    resident: HashSet<ImageId>,
    captions: HashMap<ImageId, String>,
    blocking_gets: Cell<u32>,
}

impl FakeInfoCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record; `resident` controls whether `try_get` sees it.
    pub fn insert(&mut self, record: ImageRecord, resident: bool) {
        if resident {
            self.resident.insert(record.id);
        }
        self.records.insert(record.id, record);
    }

    pub fn set_caption(&mut self, id: ImageId, caption: impl Into<String>) {
        self.captions.insert(id, caption.into());
    }

    /// How many times a blocking `get` ran.
    #[must_use]
    pub fn blocking_gets(&self) -> u32 {
        self.blocking_gets.get()
    }
}

impl ImageInfoCache for FakeInfoCache {
    fn try_get(&self, id: ImageId) -> Option<ImageRecord> {
        if self.resident.contains(&id) {
            self.records.get(&id).cloned()
        } else {
            None
        }
    }

    fn get(&self, id: ImageId) -> Option<ImageRecord> {
        self.blocking_gets.set(self.blocking_gets.get() + 1);
        self.records.get(&id).cloned()
    }

    fn caption(&self, id: ImageId) -> Option<String> {
        self.captions.get(&id).cloned()
    }
}

/// A plain record for tests.
#[must_use]
pub fn test_record(id: u32, flags: ImageFlags) -> ImageRecord {
    ImageRecord {
        id: ImageId::new(id),
        group_id: ImageId::new(id),
        filename: format!("IMG_{:04}.raf", id),
        flags,
        exif_line: "1/125s f/2.8 ISO 200 35mm".to_string(),
    }
}

// =============================================================================
// FakeThumbCache
// =============================================================================

/// Thumbnail cache serving pre-seeded buffers.
#[derive(Default)]
pub struct FakeThumbCache {
    buffers: HashMap<ImageId, ThumbBuffer>,
    prefetched: RefCell<Vec<ImageId>>,
}

impl FakeThumbCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ImageId, buffer: ThumbBuffer) {
        self.buffers.insert(id, buffer);
    }

    #[must_use]
    pub fn prefetched(&self) -> Vec<ImageId> {
        self.prefetched.borrow().clone()
    }

    /// A solid-color BGRA buffer at the given tier.
    #[must_use]
    pub fn solid_buffer(level: MipLevel, width: u32, height: u32) -> ThumbBuffer {
        ThumbBuffer {
            level,
            width,
            height,
            color_space: crate::application::port::thumbnails::ColorSpaceTag::Display,
            pixels: vec![128; (width * height * 4) as usize],
        }
    }
}

impl ThumbnailCache for FakeThumbCache {
    fn matching_level(&self, width: f32, height: f32) -> MipLevel {
        let target = width.max(height);
        let mut level = 0u8;
        let mut size = 64.0;
        while size < target && level < 7 {
            level += 1;
            size *= 2.0;
        }
        MipLevel(level)
    }

    fn best_effort(&self, id: ImageId, _level: MipLevel) -> Option<ThumbBuffer> {
        self.buffers.get(&id).cloned()
    }

    fn prefetch(&self, id: ImageId) {
        self.prefetched.borrow_mut().push(id);
    }
}

// =============================================================================
// RecordingPanelHost
// =============================================================================

/// Backing state of [`RecordingPanelHost`].
#[derive(Default)]
pub struct PanelState {
    pub containers: HashMap<PanelContainer, Vec<WidgetId>>,
    /// Expander widget -> its body.
    pub expanders: HashMap<WidgetId, WidgetId>,
    pub destroyed: Vec<WidgetId>,
    pub detached_bodies: Vec<WidgetId>,
    pub end_markers: Vec<PanelContainer>,
    pub restore_count: u32,
    pub border_redraws: u32,
    pub shown: Vec<WidgetId>,
    pub hidden: Vec<WidgetId>,
}

impl PanelState {
    /// Total number of widgets attached across all containers.
    #[must_use]
    pub fn total_attached(&self) -> usize {
        self.containers.values().map(Vec::len).sum()
    }
}

/// Panel host recording attachment traffic.
#[derive(Clone, Default)]
pub struct RecordingPanelHost {
    state: Rc<RefCell<PanelState>>,
}

impl RecordingPanelHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> Rc<RefCell<PanelState>> {
        Rc::clone(&self.state)
    }

    /// Declares `expander` as a collapsible widget wrapping `body`.
    pub fn define_expander(&self, expander: WidgetId, body: WidgetId) {
        self.state.borrow_mut().expanders.insert(expander, body);
    }
}

impl PanelHost for RecordingPanelHost {
    fn add_widget(&mut self, container: PanelContainer, widget: WidgetId) {
        self.state
            .borrow_mut()
            .containers
            .entry(container)
            .or_default()
            .push(widget);
    }

    fn children(&self, container: PanelContainer) -> Vec<WidgetId> {
        self.state
            .borrow()
            .containers
            .get(&container)
            .cloned()
            .unwrap_or_default()
    }

    fn remove_widget(&mut self, container: PanelContainer, widget: WidgetId) {
        if let Some(children) = self.state.borrow_mut().containers.get_mut(&container) {
            children.retain(|child| *child != widget);
        }
    }

    fn expander_body(&self, widget: WidgetId) -> Option<WidgetId> {
        self.state.borrow().expanders.get(&widget).copied()
    }

    fn detach_expander_body(&mut self, expander: WidgetId) {
        let mut state = self.state.borrow_mut();
        if let Some(body) = state.expanders.get(&expander).copied() {
            state.detached_bodies.push(body);
        }
    }

    fn destroy_widget(&mut self, widget: WidgetId) {
        let mut state = self.state.borrow_mut();
        for children in state.containers.values_mut() {
            children.retain(|child| *child != widget);
        }
        state.destroyed.push(widget);
    }

    fn append_end_marker(&mut self, container: PanelContainer) {
        self.state.borrow_mut().end_markers.push(container);
    }

    fn restore_panels(&mut self) {
        self.state.borrow_mut().restore_count += 1;
    }

    fn show_widget(&mut self, widget: WidgetId) {
        self.state.borrow_mut().shown.push(widget);
    }

    fn hide_widget(&mut self, widget: WidgetId) {
        self.state.borrow_mut().hidden.push(widget);
    }

    fn queue_border_redraw(&mut self) {
        self.state.borrow_mut().border_redraws += 1;
    }
}

// =============================================================================
// RecordingSignalHub
// =============================================================================

/// One observed view-changed notification, by view names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewChange {
    pub outgoing: Option<String>,
    pub incoming: String,
}

/// Signal hub recording view-changed notifications.
#[derive(Clone, Default)]
pub struct RecordingSignalHub {
    events: Rc<RefCell<Vec<ViewChange>>>,
}

impl RecordingSignalHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Rc<RefCell<Vec<ViewChange>>> {
        Rc::clone(&self.events)
    }
}

impl SignalHub for RecordingSignalHub {
    fn view_changed(&mut self, outgoing: Option<&ViewToken>, incoming: &ViewToken) {
        self.events.borrow_mut().push(ViewChange {
            outgoing: outgoing.map(|token| token.name.clone()),
            incoming: incoming.name.clone(),
        });
    }
}

// =============================================================================
// ScriptedView
// =============================================================================

/// View double appending every lifecycle call to a shared log as
/// `"<name>:<event>"`.
pub struct ScriptedView {
    pub kind: ViewKind,
    pub label: String,
    pub log: Rc<RefCell<Vec<String>>>,
    /// When set, `try_enter` denies with this reason.
    pub deny_entry: Option<String>,
    /// Return value of the key-pressed handler.
    pub handles_keys: bool,
}

impl ScriptedView {
    #[must_use]
    pub fn new(kind: ViewKind, label: impl Into<String>, log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            kind,
            label: label.into(),
            log,
            deny_entry: None,
            handles_keys: false,
        }
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, event));
    }
}

impl View for ScriptedView {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn init(&mut self) {
        self.record("init");
    }

    fn gui_init(&mut self) {
        self.record("gui_init");
    }

    fn cleanup(&mut self) {
        self.record("cleanup");
    }

    fn try_enter(&mut self) -> Result<(), EntryDenial> {
        match &self.deny_entry {
            Some(reason) => {
                self.record("try_enter:denied");
                Err(EntryDenial::new(reason.clone()))
            }
            None => {
                self.record("try_enter");
                Ok(())
            }
        }
    }

    fn enter(&mut self) {
        self.record("enter");
    }

    fn leave(&mut self) {
        self.record("leave");
    }

    fn reset(&mut self) {
        self.record("reset");
    }

    fn expose(
        &mut self,
        _surface: &mut dyn DrawSurface,
        _width: f32,
        _height: f32,
        _pointer_x: f32,
        _pointer_y: f32,
    ) {
        self.record("expose");
    }

    fn mouse_moved(&mut self, _x: f64, _y: f64, _pressure: f64, _which: MouseButton) {
        self.record("mouse_moved");
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
        self.record("button_pressed");
        true
    }

    fn button_released(&mut self, _x: f64, _y: f64, _which: MouseButton, _mods: Modifiers) -> bool {
        self.record("button_released");
        false
    }

    fn key_pressed(&mut self, _key: Key, _mods: Modifiers) -> bool {
        self.record("key_pressed");
        self.handles_keys
    }

    fn scrolled(&mut self, _x: f64, _y: f64, _up: bool, _mods: Modifiers) {
        self.record("scrolled");
    }

    fn configure(&mut self, width: u32, height: u32) {
        self.record(&format!("configure:{}x{}", width, height));
    }

    fn connect_key_accels(&mut self, accels: &mut AccelRegistry) -> Vec<AccelHandle> {
        self.record("connect_key_accels");
        vec![accels.connect(crate::accel::AccelBinding::unbound(format!(
            "views/{}/fullscreen",
            self.label
        )))]
    }
}

// =============================================================================
// ScriptedPlugin
// =============================================================================

/// Plugin double with configurable capability mask and input handling.
pub struct ScriptedPlugin {
    pub name: String,
    pub mask: Option<ViewKindSet>,
    pub container: PanelContainer,
    pub widget: WidgetId,
    pub expander_widget: Option<WidgetId>,
    pub expandable: bool,
    pub handles_press: bool,
    pub handles_move: bool,
    pub handles_scroll: bool,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPlugin {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mask: Option<ViewKindSet>,
        widget: WidgetId,
        log: Rc<RefCell<Vec<String>>>,
    ) -> Self {
        Self {
            name: name.into(),
            mask,
            container: PanelContainer::RightCenter,
            widget,
            expander_widget: None,
            expandable: false,
            handles_press: false,
            handles_move: false,
            handles_scroll: false,
            log,
        }
    }

    fn record(&self, event: &str) {
        self.log
            .borrow_mut()
            .push(format!("plugin:{}:{}", self.name, event));
    }
}

impl Plugin for ScriptedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn views(&self) -> Option<ViewKindSet> {
        self.mask
    }

    fn container(&self) -> PanelContainer {
        self.container
    }

    fn widget(&self) -> WidgetId {
        self.widget
    }

    fn expandable(&self) -> bool {
        self.expandable
    }

    fn expander(&mut self) -> Option<WidgetId> {
        self.expander_widget
    }

    fn set_expanded(&mut self, expanded: bool) {
        self.record(&format!("set_expanded:{}", expanded));
    }

    fn gui_cleanup(&mut self) {
        self.record("gui_cleanup");
    }

    fn view_enter(&mut self, outgoing: Option<&ViewToken>, incoming: &ViewToken) {
        let from = outgoing.map(|t| t.name.clone()).unwrap_or_default();
        self.record(&format!("view_enter:{}->{}", from, incoming.name));
    }

    fn view_leave(&mut self, outgoing: &ViewToken, incoming: Option<&ViewToken>) {
        let to = incoming.map(|t| t.name.clone()).unwrap_or_default();
        self.record(&format!("view_leave:{}->{}", outgoing.name, to));
    }

    fn mouse_moved(&mut self, _x: f64, _y: f64, _pressure: f64, _which: MouseButton) -> bool {
        self.record("mouse_moved");
        self.handles_move
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
        self.record("button_pressed");
        self.handles_press
    }

    fn button_released(&mut self, _x: f64, _y: f64, _which: MouseButton, _mods: Modifiers) -> bool {
        self.record("button_released");
        false
    }

    fn scrolled(&mut self, _x: f64, _y: f64, _up: bool, _mods: Modifiers) -> bool {
        self.record("scrolled");
        self.handles_scroll
    }

    fn connect_key_accels(&mut self, accels: &mut AccelRegistry) -> Vec<AccelHandle> {
        self.record("connect_key_accels");
        vec![accels.connect(crate::accel::AccelBinding::unbound(format!(
            "plugins/{}/action",
            self.name
        )))]
    }
}
