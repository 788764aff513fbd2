// SPDX-License-Identifier: MPL-2.0
//! Input-accelerator bindings.
//!
//! Views and plugins register named bindings while they are active and
//! get back handles; the manager disconnects the whole handle list
//! before a view or plugin leaves, and always before any reconnection.

use crate::domain::input::{Key, Modifiers};
use std::collections::BTreeMap;

/// Handle to one connected accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccelHandle(u64);

/// A key chord bound to an accelerator path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub mods: Modifiers,
}

/// One registered binding. `chord` is `None` for bindings the user has
/// not assigned a key to yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccelBinding {
    /// Slash-separated path, e.g. `"views/lighttable/zoom in"`.
    pub path: String,
    pub chord: Option<KeyChord>,
}

impl AccelBinding {
    #[must_use]
    pub fn unbound(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            chord: None,
        }
    }

    #[must_use]
    pub fn with_chord(path: impl Into<String>, key: Key, mods: Modifiers) -> Self {
        Self {
            path: path.into(),
            chord: Some(KeyChord { key, mods }),
        }
    }
}

/// Registry of currently connected accelerators.
#[derive(Default)]
pub struct AccelRegistry {
    next: u64,
    active: BTreeMap<u64, AccelBinding>,
}

impl AccelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a binding and returns its handle.
    pub fn connect(&mut self, binding: AccelBinding) -> AccelHandle {
        let handle = AccelHandle(self.next);
        self.next += 1;
        self.active.insert(handle.0, binding);
        handle
    }

    /// Disconnects every handle in the list, draining it.
    pub fn disconnect_list(&mut self, handles: &mut Vec<AccelHandle>) {
        for handle in handles.drain(..) {
            self.active.remove(&handle.0);
        }
    }

    /// Connects the accelerators every plugin gets regardless of its own
    /// bindings (show/hide of its panel).
    pub fn connect_common_plugin_accels(&mut self, plugin_name: &str) -> Vec<AccelHandle> {
        vec![
            self.connect(AccelBinding::unbound(format!(
                "plugins/{}/show module",
                plugin_name
            ))),
            self.connect(AccelBinding::unbound(format!(
                "plugins/{}/expand module",
                plugin_name
            ))),
        ]
    }

    #[must_use]
    pub fn is_connected(&self, handle: AccelHandle) -> bool {
        self.active.contains_key(&handle.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Looks up a connected binding whose chord matches the event.
    #[must_use]
    pub fn match_chord(&self, key: Key, mods: Modifiers) -> Option<&AccelBinding> {
        self.active
            .values()
            .find(|binding| binding.chord == Some(KeyChord { key, mods }))
    }
}
