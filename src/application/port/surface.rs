// SPDX-License-Identifier: MPL-2.0
//! Drawing surface port.
//!
//! A thin vector-drawing contract modeled on what the compositor and the
//! views actually use: a transform/clip stack, path building, fills and
//! strokes, one bitmap blit and one text primitive. The concrete adapter
//! wraps whatever the toolkit hands the expose callback.

use crate::application::port::style::{ResolvedStyle, Rgba};
use crate::domain::geometry::RectF;

/// Sampling filter for bitmap blits.
///
/// `Nearest` is chosen for the placeholder tier (big pixels wanted) and
/// for 1:1 blits where filtering only loses sharpness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterHint {
    #[default]
    Smooth,
    Nearest,
}

/// Port for the surface a view or cell is rendered onto.
pub trait DrawSurface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn clip_rect(&mut self, rect: RectF);

    fn set_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);

    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32);
    /// Appends an arc around (cx, cy) as a new sub-path.
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, angle1: f32, angle2: f32);
    fn rect(&mut self, rect: RectF);
    fn close_path(&mut self);
    /// Discards the current path without drawing it.
    fn new_path(&mut self);

    fn fill(&mut self);
    fn fill_preserve(&mut self);
    fn stroke(&mut self);
    /// Fills the entire clip region with the current color.
    fn paint(&mut self);

    /// Blits an RGBA bitmap with its top-left corner at the current
    /// origin, under the current transform.
    fn draw_bitmap(&mut self, width: u32, height: u32, rgba: &[u8], filter: FilterHint);

    /// Draws a single line of text with its top-left corner at (x, y).
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba);

    /// Fills `rect` with the style's background.
    fn render_background(&mut self, style: &ResolvedStyle, rect: RectF);

    /// Strokes `rect` with the style's border, if it has a visible one.
    fn render_frame(&mut self, style: &ResolvedStyle, rect: RectF);
}
