// SPDX-License-Identifier: MPL-2.0
//! `shutterdeck` is the view orchestration core of a desktop photography
//! editor.
//!
//! It dispatches input events, lifecycle transitions and render calls
//! across the full-screen views (lighttable, darkroom, tethering, map,
//! slideshow, print) and the dockable tool plugins attached to them, and
//! composites per-thumbnail cells from cached bitmaps and vector
//! decorations. The widget toolkit, the image database and the caches
//! stay outside, behind the ports in [`application::port`].

#![doc(html_root_url = "https://docs.rs/shutterdeck/0.4.0")]

pub mod accel;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod plugins;
pub mod test_utils;
pub mod thumbnail;
pub mod views;

pub use error::{Error, LoadError, Result, SwitchError};
