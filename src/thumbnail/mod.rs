// SPDX-License-Identifier: MPL-2.0
//! Per-cell thumbnail compositing.
//!
//! [`compositor::composite_cell`] renders one image cell (the cached
//! bitmap plus its decorations) onto a drawing surface and reports
//! which interactive region is under the pointer.

pub mod compositor;
pub mod decorations;

pub use compositor::{
    composite_cell, composite_image_only, CellOutcome, CellSpec, CompositorEnv,
    DECORATION_SIZE_LIMIT,
};
