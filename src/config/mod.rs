// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! Besides global flags, the config persists per-panel state keyed by
//! `<view-name>/<plugin-name>`, which the view manager restores on every
//! switch.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Shutterdeck";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Apply the display profile to cached thumbnails.
    #[serde(default)]
    pub cache_color_managed: Option<bool>,
    /// Always draw thumbnail overlays instead of only on hover.
    #[serde(default)]
    pub show_overlays: Option<bool>,
    /// Draw caption sidecar text on zoomed-in thumbnails.
    #[serde(default)]
    pub draw_custom_captions: Option<bool>,
    /// Collapse grouped images to their leader in grid views.
    #[serde(default)]
    pub grouping: Option<bool>,
    /// Last grid position in the lighttable.
    #[serde(default)]
    pub lighttable_position: Option<u32>,
    /// Expanded flag per panel, keyed by `<view>/<plugin>`.
    #[serde(default)]
    pub panel_expanded: BTreeMap<String, bool>,
    /// Visible flag per panel, keyed by `<view>/<plugin>`.
    #[serde(default)]
    pub panel_visible: BTreeMap<String, bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_color_managed: Some(true),
            show_overlays: Some(false),
            draw_custom_captions: Some(false),
            grouping: Some(true),
            lighttable_position: None,
            panel_expanded: BTreeMap::new(),
            panel_visible: BTreeMap::new(),
        }
    }
}

fn panel_key(view: &str, plugin: &str) -> String {
    format!("{}/{}", view, plugin)
}

impl Config {
    #[must_use]
    pub fn is_panel_expanded(&self, view: &str, plugin: &str) -> bool {
        self.panel_expanded
            .get(&panel_key(view, plugin))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_panel_expanded(&mut self, view: &str, plugin: &str, expanded: bool) {
        self.panel_expanded.insert(panel_key(view, plugin), expanded);
    }

    /// Panels are visible unless explicitly hidden.
    #[must_use]
    pub fn is_panel_visible(&self, view: &str, plugin: &str) -> bool {
        self.panel_visible
            .get(&panel_key(view, plugin))
            .copied()
            .unwrap_or(true)
    }

    pub fn set_panel_visible(&mut self, view: &str, plugin: &str, visible: bool) {
        self.panel_visible.insert(panel_key(view, plugin), visible);
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
