// SPDX-License-Identifier: MPL-2.0
//! Thumbnail (mipmap) cache and image-info cache ports.

use crate::domain::{ImageId, ImageRecord};
use std::fmt;

// =============================================================================
// MipLevel
// =============================================================================

/// Discrete thumbnail resolution tier. Level 0 is the smallest; the
/// cache chooses how many tiers exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MipLevel(pub u8);

// =============================================================================
// ColorSpaceTag
// =============================================================================

/// Color space recorded for a cached thumbnail buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpaceTag {
    Srgb,
    AdobeRgb,
    /// Already display-referred; no transform needed.
    Display,
    /// The producing code path never tagged the buffer. Diagnosed at
    /// render time.
    Unset,
    /// Any other tagged space, by name.
    Other(String),
}

impl fmt::Display for ColorSpaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpaceTag::Srgb => write!(f, "sRGB"),
            ColorSpaceTag::AdobeRgb => write!(f, "AdobeRGB"),
            ColorSpaceTag::Display => write!(f, "display"),
            ColorSpaceTag::Unset => write!(f, "unset"),
            ColorSpaceTag::Other(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// ThumbBuffer
// =============================================================================

/// Side length of the degenerate placeholder tier the cache returns when
/// it has nothing better yet.
pub const PLACEHOLDER_SIZE: u32 = 8;

/// A cached thumbnail bitmap, BGRA, 4 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbBuffer {
    /// Tier this buffer was actually served from, which may differ from
    /// the requested tier.
    pub level: MipLevel,
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpaceTag,
    pub pixels: Vec<u8>,
}

impl ThumbBuffer {
    /// Whether this is the degenerate placeholder bitmap.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.width == PLACEHOLDER_SIZE && self.height == PLACEHOLDER_SIZE
    }

    #[must_use]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }
}

// =============================================================================
// ThumbnailCache
// =============================================================================

/// Port for the pre-scaled thumbnail cache.
///
/// `best_effort` never blocks waiting for the requested tier: it returns
/// whatever is resident (possibly the placeholder) and lets the caller
/// re-request a render once the proper tier lands.
pub trait ThumbnailCache {
    /// Smallest tier whose resolution covers the given target size.
    fn matching_level(&self, width: f32, height: f32) -> MipLevel;

    /// Best resident buffer for the image, preferring `level`.
    fn best_effort(&self, id: ImageId, level: MipLevel) -> Option<ThumbBuffer>;

    /// Hint that the full-size entry for this image will be wanted soon.
    fn prefetch(&self, _id: ImageId) {}
}

// =============================================================================
// ImageInfoCache
// =============================================================================

/// Port for the image-record cache.
///
/// Both getters return an owned snapshot: the adapter copies the record
/// out under its own read lock and releases the lock before returning,
/// so callers never hold a cache lock across further cache traffic.
pub trait ImageInfoCache {
    /// Non-blocking lookup; `None` when the record is not resident.
    fn try_get(&self, id: ImageId) -> Option<ImageRecord>;

    /// Blocking lookup, loading the record if necessary.
    fn get(&self, id: ImageId) -> Option<ImageRecord>;

    /// Caption text from the image's sidecar file, if one exists.
    fn caption(&self, _id: ImageId) -> Option<String> {
        None
    }
}
