// SPDX-License-Identifier: MPL-2.0
//! The per-cell composite: cached bitmap, styled chrome, decorations
//! and the overlay hit-test, in one synchronous pass.
//!
//! The style tree is rebuilt fresh on every call so live theme and state
//! changes always apply. Selection, grouping and color labels are read
//! through the library port on every call as well; with many cells per
//! row this is the dominant cost of a redraw.

use crate::application::port::color::ColorPipeline;
use crate::application::port::library::ImageLibrary;
use crate::application::port::style::{ElementState, ResolvedStyle, Rgba, StyleEngine, StyleQuery};
use crate::application::port::surface::{DrawSurface, FilterHint};
use crate::application::port::thumbnails::{
    ColorSpaceTag, ImageInfoCache, ThumbBuffer, ThumbnailCache, PLACEHOLDER_SIZE,
};
use crate::domain::geometry::RectF;
use crate::domain::{ImageFlags, ImageId, OverlayHit};
use crate::thumbnail::decorations::{
    draw_altered, draw_audio, draw_grouping, draw_label_swatch, draw_local_copy, star_path,
};
use rayon::prelude::*;
use std::sync::RwLock;
use std::time::Instant;

/// Cells narrower than this draw no decorations at all; they would be
/// illegible clutter.
pub const DECORATION_SIZE_LIMIT: f32 = 40.0;

/// Collaborators and session state the compositor reads.
pub struct CompositorEnv<'a> {
    pub library: &'a dyn ImageLibrary,
    pub images: &'a dyn ImageInfoCache,
    pub thumbs: &'a dyn ThumbnailCache,
    pub styles: &'a dyn StyleEngine,
    pub pipeline: &'a RwLock<ColorPipeline>,
    /// Apply the display profile to thumbnail buffers.
    pub color_managed: bool,
    /// Always draw overlays instead of only on hover.
    pub show_overlays: bool,
    /// Draw caption sidecar text in single-image zoom.
    pub show_captions: bool,
    /// Grouped images are collapsed to their leader.
    pub grouping: bool,
    /// Image currently under the pointer, from the last input cycle.
    pub mouse_over: Option<ImageId>,
}

/// Geometry and state of the one cell being rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSpec {
    pub image: ImageId,
    pub width: f32,
    pub height: f32,
    /// Images per grid row; 1 selects single-image-zoom layout.
    pub zoom: u32,
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub full_preview: bool,
    /// Draw nothing but the bitmap, placed at the pointer offset.
    pub image_only: bool,
}

/// What one composite pass produced, beyond pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellOutcome {
    /// The cache served a different tier than requested (and not the
    /// placeholder): the caller should re-request a render once the
    /// proper tier lands.
    pub missing: bool,
    /// Interactive region under the pointer, for the next input cycle.
    pub hit: OverlayHit,
    /// The pointer rests on the altered-mark: show the history tooltip.
    pub wants_history_tooltip: bool,
}

/// Renders one image cell and returns the overlay hit result.
pub fn composite_cell(
    surface: &mut dyn DrawSurface,
    env: &CompositorEnv<'_>,
    spec: &CellSpec,
) -> CellOutcome {
    let start = Instant::now();
    let mut outcome = CellOutcome::default();

    let width = spec.width;
    let height = spec.height;
    let px = spec.pointer_x;
    let py = spec.pointer_y;
    let zoom = spec.zoom;

    // Overlays are active over the metadata half of the cell, and
    // everywhere in grid mode.
    let in_metadata_zone = (px < width && py < height / 2.0) || zoom > 1;
    let draw_colorlabels = !spec.image_only && (env.show_overlays || in_metadata_zone);
    let draw_copy_marker = !spec.image_only && (env.show_overlays || in_metadata_zone);
    let draw_grouping_icon = !spec.image_only;
    let draw_selected = !spec.image_only;
    let draw_history = !spec.image_only;
    let draw_metadata = !spec.image_only && (env.show_overlays || in_metadata_zone);
    let draw_audio_icon = !spec.image_only;

    let hovered = env.mouse_over == Some(spec.image);
    let selected = draw_selected && env.library.is_selected(spec.image);

    // Non-blocking record probe; the rejection class sticks with what
    // the probe saw even if the blocking get below succeeds later.
    let probe = env.images.try_get(spec.image);
    let rejected = probe
        .as_ref()
        .map(|record| record.flags.is_rejected())
        .unwrap_or(false);

    // If the user points at this image we really want the record.
    let record = if (hovered || zoom == 1) && probe.is_none() {
        env.images.get(spec.image)
    } else {
        probe
    };

    let mut classes: Vec<&str> = Vec::new();
    if rejected {
        classes.push("rejected");
    }
    if draw_metadata {
        classes.push("visible_metadata");
    }
    if spec.image_only {
        classes.push("image_only");
    } else if zoom == 1 {
        classes.push("zoom1");
    }

    // At zoom 1 there is no grid cell to tint, so selection is not a
    // style state there.
    let state = ElementState {
        selected: selected && zoom != 1,
        hovered: hovered || zoom == 1,
    };
    let outline = if hovered || zoom == 1 {
        Rgba::gray(0.6)
    } else if selected && zoom != 1 {
        Rgba::gray(0.4)
    } else {
        Rgba::gray(0.2)
    };

    let root = env.styles.resolve(&StyleQuery {
        path: &["preview"],
        classes: &classes,
        state,
        sibling: None,
    });
    let (outer, inner) = root.boxes(0.0, 0.0, width, height);

    let occupancy = if spec.image_only {
        1.0
    } else if zoom == 1 {
        0.97
    } else {
        0.90
    };

    surface.save();

    if !spec.image_only && zoom != 1 {
        surface.render_background(&root, outer);
        surface.render_frame(&root, outer);
        if let Some(rec) = &record {
            let ext_style = env.styles.resolve(&StyleQuery {
                path: &["preview", "extension"],
                classes: &classes,
                state,
                sibling: None,
            });
            surface.render_background(&ext_style, inner);
            surface.render_frame(&ext_style, inner);
            surface.draw_text(
                rec.extension(),
                inner.x,
                inner.y,
                ext_style.font_size,
                ext_style.color,
            );
        }
    }

    let requested = env.thumbs.matching_level(occupancy * width, occupancy * height);
    let buf = env.thumbs.best_effort(spec.image, requested);
    match &buf {
        Some(buf) => {
            if buf.level != requested
                && buf.width != PLACEHOLDER_SIZE
                && buf.height != PLACEHOLDER_SIZE
            {
                outcome.missing = true;
            }
        }
        None => outcome.missing = true,
    }

    if let Some(buf) = &buf {
        draw_thumb(surface, env, spec, buf, &classes, state, inner);
    }

    surface.restore();

    // Decorations live in their own transform scope.
    surface.save();
    let fscale = width.min(height);

    if hovered || spec.full_preview || env.show_overlays || zoom == 1 {
        if draw_metadata && width > DECORATION_SIZE_LIMIT {
            let (r1, r2) = if zoom != 1 {
                (0.05 * width, 0.022 * width)
            } else {
                (0.015 * fscale, 0.007 * fscale)
            };
            let y = if zoom != 1 { 0.90 * height } else { 0.12 * fscale };

            // Rating stars. Rejected images draw none.
            if let Some(rec) = &record {
                if !rejected {
                    for k in 0..5u8 {
                        let x = if zoom != 1 {
                            (0.41 + f32::from(k) * 0.12) * width
                        } else {
                            (0.08 + f32::from(k) * 0.04) * fscale
                        };
                        star_path(surface, x, y, r1, r2);

                        let mut star_state = ElementState::default();
                        if (hovered || zoom == 1)
                            && (px - x) * (px - x) + (py - y) * (py - y) < r1 * r1
                        {
                            star_state.hovered = true;
                            // No early exit: a later star overlapping the
                            // pointer overwrites an earlier hit.
                            outcome.hit = OverlayHit::Star(k);
                        }
                        if rec.flags.raw_rating() > u32::from(k) {
                            star_state.selected = true;
                        }
                        let star_style = env.styles.resolve(&StyleQuery {
                            path: &["preview", "star"],
                            classes: &classes,
                            state: star_state,
                            sibling: Some((usize::from(k), 5)),
                        });
                        draw_with_style(surface, &star_style);
                    }
                }
            }

            // Reject mark.
            let x = if zoom != 1 { 0.11 * width } else { 0.04 * fscale };
            surface.set_color(if rejected {
                Rgba::new(1.0, 0.0, 0.0, 1.0)
            } else {
                outline
            });
            if (hovered || zoom == 1) && (px - x) * (px - x) + (py - y) * (py - y) < r1 * r1 {
                outcome.hit = OverlayHit::Reject;
                surface.arc(x, y, (r1 + r2) * 0.5, 0.0, 2.0 * std::f32::consts::PI);
                surface.stroke();
            }
            if rejected {
                surface.set_line_width(2.5);
            }
            surface.move_to(x - r2, y - r2);
            surface.line_to(x + r2, y + r2);
            surface.move_to(x + r2, y - r2);
            surface.line_to(x - r2, y + r2);
            surface.close_path();
            surface.stroke();
            surface.set_color(outline);
            surface.set_line_width(1.5);

            // Audio note.
            if draw_audio_icon {
                if let Some(rec) = &record {
                    if rec.flags.contains(ImageFlags::HAS_AUDIO) {
                        let s = (r1 + r2) * 0.5;
                        let (ax, ay) = if zoom != 1 {
                            (width * 0.9 - s * 5.0, height * 0.1)
                        } else {
                            ((0.04 + 8.0 * 0.04 - 1.9 * 0.04) * fscale, y)
                        };
                        draw_audio(surface, ax, ay, s);
                        if (px - ax).abs() <= 1.2 * s && (py - ay).abs() <= 1.2 * s {
                            outcome.hit = OverlayHit::Audio;
                        }
                    }
                }
            }

            // Group membership.
            if draw_grouping_icon {
                let is_grouped = !env.library.group_siblings(spec.image).is_empty();
                if is_grouped && env.grouping {
                    let s = (r1 + r2) * 0.6;
                    let (gx, gy) = if zoom != 1 {
                        (width * 0.9 - s * 2.5, height * 0.1 - s * 0.4)
                    } else {
                        (
                            (0.04 + 8.0 * 0.04 - 1.1 * 0.04) * fscale,
                            y - (0.17 * 0.04) * fscale,
                        )
                    };
                    surface.save();
                    if let Some(rec) = &record {
                        // Non-leaders get the plain foreground color.
                        if !rec.is_group_leader() {
                            surface.set_color(root.color);
                        }
                    }
                    draw_grouping(surface, gx, gy, s);
                    surface.restore();
                    if record.is_some()
                        && (px - gx - 0.5 * s).abs() <= 0.8 * s
                        && (py - gy - 0.5 * s).abs() <= 0.8 * s
                    {
                        outcome.hit = OverlayHit::Group;
                    }
                }
            }

            // Altered mark; hovering it asks for the history tooltip.
            if draw_history && env.library.is_altered(spec.image) {
                let s = (r1 + r2) * 0.5;
                let (ax, ay) = if zoom != 1 {
                    (width * 0.9, height * 0.1)
                } else {
                    ((0.04 + 8.0 * 0.04) * fscale, y)
                };
                draw_altered(surface, ax, ay, s);
                if record.is_some() && (px - ax).abs() <= 1.2 * s && (py - ay).abs() <= 1.2 * s {
                    outcome.wants_history_tooltip = true;
                }
            }
        }
    }
    surface.restore();

    // Kill stray paths in case the image was not loaded.
    surface.new_path();

    if draw_colorlabels && width > DECORATION_SIZE_LIMIT {
        let x = if zoom == 1 { 0.07 * fscale } else { 0.21 * width };
        let y = if zoom == 1 { 0.17 * fscale } else { 0.10 * height };
        let r = if zoom == 1 { 0.01 * fscale } else { 0.03 * width };
        for label in env.library.color_labels(spec.image) {
            surface.save();
            draw_label_swatch(surface, x + 3.0 * r * f32::from(label) - 4.0 * r, y, r, label);
            surface.restore();
        }
    }

    if draw_copy_marker && width > DECORATION_SIZE_LIMIT {
        if let Some(rec) = &record {
            let x = if zoom == 1 { 0.07 * fscale } else { 0.21 * width };
            let y = if zoom == 1 { 0.17 * fscale } else { 0.10 * height };
            let r = if zoom == 1 { 0.01 * fscale } else { 0.03 * width };
            let copy_slot = 6.0;
            surface.save();
            draw_local_copy(
                surface,
                x + 3.0 * r * copy_slot - 4.0 * r,
                y,
                r,
                rec.flags.contains(ImageFlags::LOCAL_COPY),
            );
            surface.restore();
        }
    }

    if draw_metadata && zoom == 1 {
        if let Some(rec) = &record {
            let fontsize = 0.025 * fscale;
            let text_color = Rgba::gray(0.7);
            surface.draw_text(
                &rec.filename,
                0.02 * fscale,
                0.04 * fscale - fontsize,
                fontsize,
                text_color,
            );
            surface.draw_text(
                &rec.exif_line,
                0.02 * fscale,
                0.08 * fscale - fontsize,
                fontsize,
                text_color,
            );

            if env.show_captions && rec.flags.contains(ImageFlags::HAS_CAPTION) {
                if let Some(caption) = env.images.caption(spec.image) {
                    let fontsize = 0.015 * fscale;
                    for (k, line) in caption.lines().enumerate() {
                        surface.draw_text(
                            line,
                            0.02 * fscale,
                            0.20 * fscale + 0.017 * fscale * k as f32 - fontsize,
                            fontsize,
                            text_color,
                        );
                    }
                }
            }
        }
    }

    log::debug!(
        "[thumbnail] image {} expose took {:.4} sec",
        spec.image,
        start.elapsed().as_secs_f64()
    );

    outcome
}

/// Bare-bitmap convenience: draws only the image, placed at the given
/// offset, ignoring hits.
pub fn composite_image_only(
    surface: &mut dyn DrawSurface,
    env: &CompositorEnv<'_>,
    image: ImageId,
    width: f32,
    height: f32,
    offset_x: f32,
    offset_y: f32,
) {
    let spec = CellSpec {
        image,
        width,
        height,
        zoom: 1,
        pointer_x: offset_x,
        pointer_y: offset_y,
        full_preview: true,
        image_only: true,
    };
    let _ = composite_cell(surface, env, &spec);
}

/// Draws the fetched bitmap centered and fitted into the content box
/// (or at the pointer offset in image-only mode), with the style's
/// frame around it.
fn draw_thumb(
    surface: &mut dyn DrawSurface,
    env: &CompositorEnv<'_>,
    spec: &CellSpec,
    buf: &ThumbBuffer,
    classes: &[&str],
    state: ElementState,
    inner: RectF,
) {
    if buf.width == 0 || buf.height == 0 {
        return;
    }

    let image_style = env.styles.resolve(&StyleQuery {
        path: &["preview", "image"],
        classes,
        state,
        sibling: None,
    });
    let (_, content) = image_style.boxes(inner.x, inner.y, inner.width, inner.height);

    let rgba = convert_for_display(buf, env.pipeline, env.color_managed);
    let buf_w = buf.width as f32;
    let buf_h = buf.height as f32;
    let scale = (content.width / buf_w).min(content.height / buf_h);

    surface.save();

    if !spec.image_only {
        let b = image_style.border;
        let frame = RectF::new(
            content.x + 0.5 * (content.width - scale * buf_w) - b.left,
            content.y + 0.5 * (content.height - scale * buf_h) - b.top,
            scale * buf_w + b.left + b.right,
            scale * buf_h + b.top + b.bottom,
        );
        surface.render_background(&image_style, frame);
        surface.render_frame(&image_style, frame);
        surface.translate(content.x + content.width / 2.0, content.y + content.height / 2.0);
    } else {
        surface.translate(spec.pointer_x, spec.pointer_y);
    }

    surface.scale(scale, scale);
    if !spec.image_only {
        surface.translate(-0.5 * buf_w, -0.5 * buf_h);
    }

    // Nearest for the placeholder (big pixels wanted) and for 1:1 blits
    // where filtering only loses sharpness.
    let filter = if (buf.width <= PLACEHOLDER_SIZE && buf.height <= PLACEHOLDER_SIZE)
        || (scale - 1.0).abs() < 0.01
    {
        FilterHint::Nearest
    } else {
        FilterHint::Smooth
    };
    surface.draw_bitmap(buf.width, buf.height, &rgba, filter);

    surface.restore();
}

/// Fills a built path with the style's background, stroking the border
/// on top when the style has a visible one.
fn draw_with_style(surface: &mut dyn DrawSurface, style: &ResolvedStyle) {
    surface.set_color(style.background);
    if style.border_width > 0.0 {
        surface.set_line_width(style.border_width);
        surface.fill_preserve();
        surface.set_color(style.border_color);
        surface.stroke();
    } else {
        surface.fill();
    }
}

/// Converts a BGRA cache buffer into display-referred RGBA.
///
/// With color management on, the matching profile transform is applied
/// row-wise under the pipeline's read lock; rows fan out across worker
/// threads while the lock is held, sharing only the immutable transform.
/// Without a transform the channels are reordered in place of it.
fn convert_for_display(
    buf: &ThumbBuffer,
    pipeline: &RwLock<ColorPipeline>,
    color_managed: bool,
) -> Vec<u8> {
    let row = buf.row_bytes();
    let mut out = vec![0u8; buf.pixels.len()];
    if row == 0 {
        return out;
    }

    let guard = if color_managed {
        pipeline.read().ok()
    } else {
        None
    };
    let transform = guard.as_ref().and_then(|p| p.for_tag(&buf.color_space));

    if color_managed && transform.is_none() {
        match &buf.color_space {
            ColorSpaceTag::Unset => {
                log::error!(
                    "[thumbnail] there seems to be a code path not setting the color space of thumbnails"
                );
            }
            ColorSpaceTag::Display => {}
            other => {
                log::warn!(
                    "[thumbnail] unhandled thumbnail color space '{}', dumping to screen as-is",
                    other
                );
            }
        }
    }

    let mut converted = false;
    if let Some(transform) = transform {
        out.par_chunks_exact_mut(row)
            .zip(buf.pixels.par_chunks_exact(row))
            .for_each(|(dst, src)| transform.apply(src, dst));
        converted = true;
    }
    drop(guard);

    if !converted {
        out.par_chunks_exact_mut(row)
            .zip(buf.pixels.par_chunks_exact(row))
            .for_each(|(dst, src)| {
                for (dst_px, src_px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                    dst_px[0] = src_px[2];
                    dst_px[1] = src_px[1];
                    dst_px[2] = src_px[0];
                    dst_px[3] = 255;
                }
            });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::color::DisplayTransform;
    use crate::application::port::thumbnails::MipLevel;

    fn buffer(width: u32, height: u32, tag: ColorSpaceTag, pixels: Vec<u8>) -> ThumbBuffer {
        ThumbBuffer {
            level: MipLevel(2),
            width,
            height,
            color_space: tag,
            pixels,
        }
    }

    #[test]
    fn unmanaged_conversion_swaps_bgra_to_rgba() {
        let pipeline = RwLock::new(ColorPipeline::default());
        let buf = buffer(1, 1, ColorSpaceTag::Display, vec![10, 20, 30, 0]);
        let out = convert_for_display(&buf, &pipeline, false);
        assert_eq!(out, vec![30, 20, 10, 255]);
    }

    #[test]
    fn managed_conversion_uses_the_matching_transform() {
        struct Doubling;

        impl DisplayTransform for Doubling {
            fn apply(&self, src: &[u8], dst: &mut [u8]) {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s.saturating_mul(2);
                }
            }
        }

        let pipeline = RwLock::new(ColorPipeline {
            srgb_to_display: Some(Box::new(Doubling)),
            adobe_rgb_to_display: None,
        });
        let buf = buffer(2, 1, ColorSpaceTag::Srgb, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let out = convert_for_display(&buf, &pipeline, true);
        assert_eq!(out, vec![2, 4, 6, 8, 10, 12, 14, 16]);
    }

    #[test]
    fn managed_conversion_without_transform_falls_back_to_swap() {
        let pipeline = RwLock::new(ColorPipeline::default());
        let buf = buffer(1, 1, ColorSpaceTag::AdobeRgb, vec![1, 2, 3, 0]);
        let out = convert_for_display(&buf, &pipeline, true);
        assert_eq!(out, vec![3, 2, 1, 255]);
    }

    #[test]
    fn empty_buffer_converts_to_nothing() {
        let pipeline = RwLock::new(ColorPipeline::default());
        let buf = buffer(0, 0, ColorSpaceTag::Display, Vec::new());
        assert!(convert_for_display(&buf, &pipeline, true).is_empty());
    }
}
