// SPDX-License-Identifier: MPL-2.0
//! Port definitions.
//!
//! Each port is a trait describing one external collaborator. The core
//! never talks to the database, the caches, the color engine or the
//! widget toolkit directly; adapters implement these traits at the
//! application boundary.

pub mod color;
pub mod library;
pub mod panels;
pub mod signal;
pub mod style;
pub mod surface;
pub mod thumbnails;

pub use color::{ColorPipeline, DisplayTransform};
pub use library::ImageLibrary;
pub use panels::{PanelContainer, PanelHost, WidgetId};
pub use signal::SignalHub;
pub use style::{ElementState, ResolvedStyle, Rgba, StyleEngine, StyleQuery};
pub use surface::{DrawSurface, FilterHint};
pub use thumbnails::{ColorSpaceTag, ImageInfoCache, MipLevel, ThumbBuffer, ThumbnailCache};
