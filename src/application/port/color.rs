// SPDX-License-Identifier: MPL-2.0
//! Display color-management port.
//!
//! The application owns one [`ColorPipeline`] behind a `std::sync::RwLock`.
//! The compositor takes a read lock for the duration of converting one
//! thumbnail's pixel buffer and releases it before drawing; the GUI
//! replaces the transforms under the write lock when the display profile
//! changes.

use crate::application::port::thumbnails::ColorSpaceTag;

/// One direction of a profile transform (e.g. sRGB to display).
///
/// `apply` converts a single BGRA row into a display-referred RGBA row of
/// the same pixel count. Implementations must be thread safe: the
/// per-row conversion loop fans rows out across worker threads while the
/// shared read lock is held.
pub trait DisplayTransform: Send + Sync {
    fn apply(&self, src: &[u8], dst: &mut [u8]);
}

/// The transforms available for thumbnail conversion. Only sRGB and
/// AdobeRGB sources are color managed; everything else is shown as-is.
#[derive(Default)]
pub struct ColorPipeline {
    pub srgb_to_display: Option<Box<dyn DisplayTransform>>,
    pub adobe_rgb_to_display: Option<Box<dyn DisplayTransform>>,
}

impl ColorPipeline {
    /// Transform for a buffer tagged with `tag`, if one is configured.
    #[must_use]
    pub fn for_tag(&self, tag: &ColorSpaceTag) -> Option<&dyn DisplayTransform> {
        match tag {
            ColorSpaceTag::Srgb => self.srgb_to_display.as_deref(),
            ColorSpaceTag::AdobeRgb => self.adobe_rgb_to_display.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl DisplayTransform for Passthrough {
        fn apply(&self, src: &[u8], dst: &mut [u8]) {
            dst.copy_from_slice(src);
        }
    }

    #[test]
    fn empty_pipeline_has_no_transforms() {
        let pipeline = ColorPipeline::default();
        assert!(pipeline.for_tag(&ColorSpaceTag::Srgb).is_none());
        assert!(pipeline.for_tag(&ColorSpaceTag::AdobeRgb).is_none());
    }

    #[test]
    fn for_tag_picks_the_matching_direction() {
        let pipeline = ColorPipeline {
            srgb_to_display: Some(Box::new(Passthrough)),
            adobe_rgb_to_display: None,
        };
        assert!(pipeline.for_tag(&ColorSpaceTag::Srgb).is_some());
        assert!(pipeline.for_tag(&ColorSpaceTag::AdobeRgb).is_none());
        // display-referred buffers never get a transform
        assert!(pipeline.for_tag(&ColorSpaceTag::Display).is_none());
        assert!(pipeline.for_tag(&ColorSpaceTag::Unset).is_none());
    }
}
