// SPDX-License-Identifier: MPL-2.0
//! Closed-form decoration glyphs drawn over thumbnails.
//!
//! All of these only build or stroke paths on the surface; color and
//! line width are the caller's business.

use crate::application::port::style::Rgba;
use crate::application::port::surface::DrawSurface;
use crate::domain::geometry::RectF;
use std::f32::consts::PI;

/// The six color-label swatch colors, indexed by label.
pub const LABEL_COLORS: [Rgba; 6] = [
    Rgba::new(0.9, 0.2, 0.2, 1.0),  // red
    Rgba::new(0.9, 0.9, 0.2, 1.0),  // yellow
    Rgba::new(0.2, 0.9, 0.2, 1.0),  // green
    Rgba::new(0.2, 0.4, 0.9, 1.0),  // blue
    Rgba::new(0.7, 0.2, 0.9, 1.0),  // purple
    Rgba::new(0.5, 0.5, 0.5, 1.0),  // gray
];

/// Builds a five-pointed star path centered at (x, y) with outer radius
/// `r1` and inner radius `r2`. The caller fills or strokes it.
pub fn star_path(surface: &mut dyn DrawSurface, x: f32, y: f32, r1: f32, r2: f32) {
    let d = 2.0 * PI * 0.1;
    let dx: Vec<f32> = (0..10).map(|k| (k as f32 * d).sin()).collect();
    let dy: Vec<f32> = (0..10).map(|k| (k as f32 * d).cos()).collect();
    surface.move_to(x + r1 * dx[0], y - r1 * dy[0]);
    for k in 1..10 {
        if k & 1 == 1 {
            surface.line_to(x + r2 * dx[k], y - r2 * dy[k]);
        } else {
            surface.line_to(x + r1 * dx[k], y - r1 * dy[k]);
        }
    }
    surface.close_path();
}

/// Strokes the "image altered" wand mark centered at (x, y).
pub fn draw_altered(surface: &mut dyn DrawSurface, x: f32, y: f32, r: f32) {
    surface.arc(x, y, r, 0.0, 2.0 * PI);
    let dx = r * (PI / 8.0).cos();
    let dy = r * (PI / 8.0).sin();
    surface.move_to(x - dx, y - dy);
    surface.curve_to(x, y - 2.0 * dy, x, y + 2.0 * dy, x + dx, y + dy);
    surface.move_to(x - 0.20 * dx, y + 0.8 * dy);
    surface.line_to(x - 0.80 * dx, y + 0.8 * dy);
    surface.move_to(x + 0.20 * dx, y - 0.8 * dy);
    surface.line_to(x + 0.80 * dx, y - 0.8 * dy);
    surface.move_to(x + 0.50 * dx, y - 0.8 * dy - 0.3 * dx);
    surface.line_to(x + 0.50 * dx, y - 0.8 * dy + 0.3 * dx);
    surface.stroke();
}

/// Strokes the audio-note speaker glyph centered at (x, y).
pub fn draw_audio(surface: &mut dyn DrawSurface, x: f32, y: f32, r: f32) {
    let d = 2.0 * r;
    let spread = (35.0 / 180.0) * PI;

    surface.save();
    surface.translate(x - d / 2.0, y - d / 2.0);
    surface.scale(d, d);

    surface.rect(RectF::new(0.05, 0.4, 0.2, 0.2));
    surface.move_to(0.25, 0.6);
    surface.line_to(0.45, 0.77);
    surface.line_to(0.45, 0.23);
    surface.line_to(0.25, 0.4);

    surface.arc(0.2, 0.5, 0.45, -spread, spread);
    surface.arc(0.2, 0.5, 0.6, -spread, spread);
    surface.arc(0.2, 0.5, 0.75, -spread, spread);

    surface.restore();
    surface.stroke();
}

/// Strokes the group-membership icon with its top-left at (x, y): two
/// offset frames suggesting a stack.
pub fn draw_grouping(surface: &mut dyn DrawSurface, x: f32, y: f32, size: f32) {
    surface.rect(RectF::new(x, y, 0.7 * size, 0.7 * size));
    surface.rect(RectF::new(x + 0.3 * size, y + 0.3 * size, 0.7 * size, 0.7 * size));
    surface.stroke();
}

/// Fills one color-label swatch of radius `r` centered at (x, y).
/// Indices outside 0–5 fall back to the gray swatch.
pub fn draw_label_swatch(surface: &mut dyn DrawSurface, x: f32, y: f32, r: f32, label: u8) {
    let color = LABEL_COLORS
        .get(usize::from(label))
        .copied()
        .unwrap_or(LABEL_COLORS[5]);
    surface.set_color(color);
    surface.arc(x, y, r, 0.0, 2.0 * PI);
    surface.fill();
}

/// Draws the local-copy corner marker: a triangle, filled when a local
/// copy exists, otherwise stroked.
pub fn draw_local_copy(surface: &mut dyn DrawSurface, x: f32, y: f32, r: f32, active: bool) {
    surface.move_to(x - r, y - r);
    surface.line_to(x + r, y - r);
    surface.line_to(x + r, y + r);
    surface.close_path();
    if active {
        surface.fill();
    } else {
        surface.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DrawOp, RecordingSurface};

    #[test]
    fn star_path_closes_with_ten_vertices() {
        let mut surface = RecordingSurface::new();
        star_path(&mut surface, 10.0, 10.0, 5.0, 2.0);
        let ops = surface.ops();
        assert!(matches!(ops.first(), Some(DrawOp::MoveTo { .. })));
        let lines = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::LineTo { .. }))
            .count();
        assert_eq!(lines, 9);
        assert!(matches!(ops.last(), Some(DrawOp::ClosePath)));
    }

    #[test]
    fn audio_glyph_restores_the_transform_before_stroking() {
        let mut surface = RecordingSurface::new();
        draw_audio(&mut surface, 20.0, 20.0, 4.0);
        let ops = surface.ops();
        let restore_at = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Restore))
            .expect("audio glyph must restore");
        let stroke_at = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Stroke))
            .expect("audio glyph must stroke");
        assert!(restore_at < stroke_at);
    }

    #[test]
    fn unknown_label_falls_back_to_gray() {
        let mut surface = RecordingSurface::new();
        draw_label_swatch(&mut surface, 0.0, 0.0, 2.0, 17);
        assert!(surface
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::SetColor(color) if *color == LABEL_COLORS[5])));
    }

    #[test]
    fn local_copy_marker_fills_only_when_active() {
        let mut surface = RecordingSurface::new();
        draw_local_copy(&mut surface, 0.0, 0.0, 2.0, true);
        assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::Fill)));

        let mut surface = RecordingSurface::new();
        draw_local_copy(&mut surface, 0.0, 0.0, 2.0, false);
        assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::Stroke)));
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::Fill)));
    }
}
