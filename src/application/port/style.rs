// SPDX-License-Identifier: MPL-2.0
//! Styling port: the theming collaborator.
//!
//! The compositor describes what it is about to draw (an element path
//! like `preview > star`, CSS-ish classes, selection/hover state, a
//! sibling position) and the engine resolves the themed attributes.
//! Queries are rebuilt fresh on every render call so live theme changes
//! apply without any cache invalidation.

use crate::domain::geometry::{Insets, RectF};

// =============================================================================
// Rgba
// =============================================================================

/// Color with straight (non-premultiplied) alpha, components in 0–1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn gray(level: f32) -> Self {
        Self::new(level, level, level, 1.0)
    }
}

// =============================================================================
// ElementState
// =============================================================================

/// Visual state of the queried element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementState {
    pub selected: bool,
    pub hovered: bool,
}

// =============================================================================
// StyleQuery
// =============================================================================

/// One style lookup.
///
/// `path` is the element hierarchy from the outermost node, e.g.
/// `["preview", "star"]`. `classes` apply to the whole query;
/// `sibling` positions the leaf among same-named siblings (star index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleQuery<'a> {
    pub path: &'a [&'a str],
    pub classes: &'a [&'a str],
    pub state: ElementState,
    pub sibling: Option<(usize, usize)>,
}

impl<'a> StyleQuery<'a> {
    #[must_use]
    pub fn element(path: &'a [&'a str]) -> Self {
        Self {
            path,
            classes: &[],
            state: ElementState::default(),
            sibling: None,
        }
    }
}

// =============================================================================
// ResolvedStyle
// =============================================================================

/// Themed attributes for one element in one state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub color: Rgba,
    pub background: Rgba,
    pub border_color: Rgba,
    pub border_width: f32,
    pub margin: Insets,
    pub border: Insets,
    pub padding: Insets,
    pub font_size: f32,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            color: Rgba::gray(0.7),
            background: Rgba::gray(0.2),
            border_color: Rgba::gray(0.1),
            border_width: 0.0,
            margin: Insets::default(),
            border: Insets::default(),
            padding: Insets::default(),
            font_size: 12.0,
        }
    }
}

impl ResolvedStyle {
    /// Splits a box into the drawing rectangle (margin removed) and the
    /// content rectangle (margin, border and padding removed).
    #[must_use]
    pub fn boxes(&self, x: f32, y: f32, width: f32, height: f32) -> (RectF, RectF) {
        let outer = RectF::new(x, y, width, height).inset(self.margin);
        let inner = RectF::new(x, y, width, height).inset(Insets {
            top: self.margin.top + self.border.top + self.padding.top,
            right: self.margin.right + self.border.right + self.padding.right,
            bottom: self.margin.bottom + self.border.bottom + self.padding.bottom,
            left: self.margin.left + self.border.left + self.padding.left,
        });
        (outer, inner)
    }
}

// =============================================================================
// StyleEngine
// =============================================================================

/// Port for the theming engine.
pub trait StyleEngine {
    fn resolve(&self, query: &StyleQuery<'_>) -> ResolvedStyle;
}
