// SPDX-License-Identifier: MPL-2.0
//! Specialized-view operation registries.
//!
//! Some view kinds expose extra operations to the rest of the system
//! (the lighttable's grid zoom, the filmstrip's scrolling, ...). Instead
//! of function-pointer tables the manager keeps one optional trait
//! object per kind; a view registers its implementation while active (or
//! persistently, for the filmstrip companion) and callers go through the
//! manager's forwarders, which no-op or return a documented sentinel
//! when nothing is registered.

use crate::application::port::panels::WidgetId;
use crate::domain::{ImageId, ViewKindSet};
use std::rc::Rc;

/// Lighttable grid operations.
pub trait LighttableOps {
    /// Number of images per grid row; 1 means single-image zoom.
    fn images_in_row(&self) -> u32;

    fn set_images_in_row(&self, count: u32);

    /// Grid position to restore when re-entering the view.
    fn position(&self) -> u32;

    fn set_position(&self, position: u32);

    /// Image shown in sticky full preview, if any.
    fn full_preview_image(&self) -> Option<ImageId>;
}

/// Filmstrip companion-view operations.
pub trait FilmstripOps {
    fn scroll_to_image(&self, id: ImageId, activate: bool);

    /// Image last activated from the strip.
    fn activated_image(&self) -> Option<ImageId>;
}

/// Tethered-capture operations.
pub trait TetheringOps {
    fn selected_image(&self) -> Option<ImageId>;

    fn job_code(&self) -> String;

    fn set_job_code(&self, code: &str);
}

/// Opaque handle to a marker placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Shape of a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Point,
    Track,
    Region,
}

/// Geo-view operations.
pub trait MapOps {
    fn center_on_location(&self, longitude: f64, latitude: f64, zoom: f64);

    fn center_on_bbox(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64);

    fn show_osd(&self, enabled: bool);

    fn set_map_source(&self, source: &str);

    fn add_marker(&self, kind: MarkerKind, points: &[(f64, f64)]) -> Option<MarkerId>;

    fn remove_marker(&self, kind: MarkerKind, marker: MarkerId) -> bool;
}

/// Print job parameters passed through to the print view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintInfo {
    pub job_title: String,
    pub paper: String,
    pub landscape: bool,
}

/// Print-view operations.
pub trait PrintOps {
    fn print_settings(&self, info: &PrintInfo);
}

/// Toolbox slots views offer to plugins.
pub trait ToolboxOps {
    fn add_tool(&self, widget: WidgetId, views: ViewKindSet);
}

/// The per-kind operation registries. Each slot is populated only while
/// a view providing it is available and must be treated as optional by
/// every caller.
#[derive(Default)]
pub struct ViewProxies {
    pub lighttable: Option<Rc<dyn LighttableOps>>,
    pub filmstrip: Option<Rc<dyn FilmstripOps>>,
    pub tethering: Option<Rc<dyn TetheringOps>>,
    pub map: Option<Rc<dyn MapOps>>,
    pub print: Option<Rc<dyn PrintOps>>,
    pub view_toolbox: Option<Rc<dyn ToolboxOps>>,
    pub module_toolbox: Option<Rc<dyn ToolboxOps>>,
}

impl ViewProxies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingLighttable {
        zoom: Cell<u32>,
    }

    impl LighttableOps for CountingLighttable {
        fn images_in_row(&self) -> u32 {
            self.zoom.get()
        }

        fn set_images_in_row(&self, count: u32) {
            self.zoom.set(count);
        }

        fn position(&self) -> u32 {
            0
        }

        fn set_position(&self, _position: u32) {}

        fn full_preview_image(&self) -> Option<ImageId> {
            None
        }
    }

    #[test]
    fn unregistered_slots_are_none() {
        let proxies = ViewProxies::new();
        assert!(proxies.lighttable.is_none());
        assert!(proxies.filmstrip.is_none());
        assert!(proxies.map.is_none());
    }

    #[test]
    fn registered_ops_are_reachable_through_the_slot() {
        let mut proxies = ViewProxies::new();
        proxies.lighttable = Some(Rc::new(CountingLighttable { zoom: Cell::new(5) }));

        let ops = proxies.lighttable.as_ref().expect("slot must be populated");
        assert_eq!(ops.images_in_row(), 5);
        ops.set_images_in_row(7);
        assert_eq!(ops.images_in_row(), 7);
    }
}
