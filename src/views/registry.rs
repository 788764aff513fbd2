// SPDX-License-Identifier: MPL-2.0
//! Module table and view registry.
//!
//! The host registers named module factories at startup, and the
//! registry instantiates them by name. Unknown modules and version
//! mismatches are logged and skipped, never fatal: the application
//! keeps running with the modules that did load.

use crate::accel::AccelRegistry;
use crate::error::LoadError;
use crate::views::{View, ViewDescriptor, ViewSlot, MAX_VIEWS};
use crate::domain::{ViewId, ViewKind};

/// API version compiled into the host. A module registered with any
/// other version is refused.
pub const MODULE_API_VERSION: u32 = 4;

/// Module names loaded at startup, in load order. The trailing entry is
/// the hidden view reachable only through the key unlock sequence.
pub const DEFAULT_MODULES: [&str; 7] = [
    "lighttable",
    "darkroom",
    "tethering",
    "map",
    "slideshow",
    "print",
    "arcade",
];

type ViewFactory = Box<dyn Fn() -> Box<dyn View>>;

/// One registered view module.
pub struct ViewModuleEntry {
    name: String,
    api_version: u32,
    factory: ViewFactory,
}

/// Named view-module registrations.
#[derive(Default)]
pub struct ModuleTable {
    entries: Vec<ViewModuleEntry>,
}

impl ModuleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module factory under `name`. A later registration
    /// with the same name shadows the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, api_version: u32, factory: F)
    where
        F: Fn() -> Box<dyn View> + 'static,
    {
        self.entries.insert(
            0,
            ViewModuleEntry {
                name: name.into(),
                api_version,
                factory: Box::new(factory),
            },
        );
    }

    fn find(&self, name: &str) -> Option<&ViewModuleEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed-capacity collection of loaded views.
pub struct ViewRegistry {
    views: Vec<ViewSlot>,
    gui_attached: bool,
}

impl ViewRegistry {
    /// `gui_attached` controls whether accelerator initializers run; a
    /// headless host (tests, batch export) skips them.
    #[must_use]
    pub fn new(gui_attached: bool) -> Self {
        Self {
            views: Vec::new(),
            gui_attached,
        }
    }

    /// Loads `name` from the table. On success the module's `init` runs,
    /// then `init_key_accels` if a GUI is attached, and the new view's
    /// stable index is returned.
    pub fn load(
        &mut self,
        table: &ModuleTable,
        name: &str,
        accels: &mut AccelRegistry,
    ) -> Result<ViewId, LoadError> {
        if self.views.len() >= MAX_VIEWS {
            return Err(LoadError::RegistryFull(name.to_string()));
        }
        let entry = table
            .find(name)
            .ok_or_else(|| LoadError::ModuleUnavailable(name.to_string()))?;
        if entry.api_version != MODULE_API_VERSION {
            log::warn!(
                "[view_load_module] '{}' is compiled for another host version (module {} != host {})",
                name,
                entry.api_version,
                MODULE_API_VERSION
            );
            return Err(LoadError::VersionMismatch {
                module: name.to_string(),
                module_version: entry.api_version,
                host_version: MODULE_API_VERSION,
            });
        }

        let id = ViewId::new(self.views.len());
        let mut module = (entry.factory)();
        let descriptor = ViewDescriptor::new(id, name, module.kind());
        log::debug!("[view_load_module] loading view '{}'", name);
        module.init();
        if self.gui_attached {
            module.init_key_accels(accels);
        }
        self.views.push(ViewSlot { descriptor, module });
        Ok(id)
    }

    /// Loads every name in `names`, logging and skipping failures.
    /// Returns the number of views actually loaded.
    pub fn load_list(
        &mut self,
        table: &ModuleTable,
        names: &[&str],
        accels: &mut AccelRegistry,
    ) -> usize {
        let mut loaded = 0;
        for name in names {
            match self.load(table, name, accels) {
                Ok(_) => loaded += 1,
                Err(err) => {
                    log::error!("[view_manager] failed to load view module '{}': {}", name, err);
                }
            }
        }
        loaded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ViewId) -> Option<&ViewSlot> {
        self.views.get(id.index())
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewSlot> {
        self.views.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewSlot> {
        self.views.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ViewSlot> + '_ {
        self.views.iter_mut()
    }

    /// First loaded view of the given kind.
    #[must_use]
    pub fn find_by_kind(&self, kind: ViewKind) -> Option<ViewId> {
        self.views
            .iter()
            .find(|slot| slot.descriptor.kind == kind)
            .map(|slot| slot.descriptor.id)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|slot| slot.descriptor.module_name == name)
            .map(|slot| slot.descriptor.id)
    }

    /// Runs `gui_init` on every loaded view.
    pub fn gui_init_all(&mut self) {
        for slot in &mut self.views {
            slot.module.gui_init();
        }
    }

    /// Unloads every view: runs `cleanup` and drops the accelerators.
    /// Only called at process shutdown.
    pub fn unload_all(&mut self, accels: &mut AccelRegistry) {
        for slot in &mut self.views {
            slot.module.cleanup();
            accels.disconnect_list(&mut slot.descriptor.accels);
        }
        self.views.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::EntryDenial;

    struct Stub(ViewKind);

    impl View for Stub {
        fn kind(&self) -> ViewKind {
            self.0
        }

        fn try_enter(&mut self) -> Result<(), EntryDenial> {
            Ok(())
        }
    }

    fn table_with(name: &str, version: u32, kind: ViewKind) -> ModuleTable {
        let mut table = ModuleTable::new();
        table.register(name, version, move || Box::new(Stub(kind)));
        table
    }

    #[test]
    fn load_assigns_stable_sequential_indices() {
        let mut table = table_with("lighttable", MODULE_API_VERSION, ViewKind::Lighttable);
        table.register("darkroom", MODULE_API_VERSION, || {
            Box::new(Stub(ViewKind::Darkroom))
        });
        let mut accels = AccelRegistry::new();
        let mut registry = ViewRegistry::new(false);

        let first = registry
            .load(&table, "lighttable", &mut accels)
            .expect("load should succeed");
        let second = registry
            .load(&table, "darkroom", &mut accels)
            .expect("load should succeed");

        assert_eq!(first, ViewId::new(0));
        assert_eq!(second, ViewId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_module_is_unavailable() {
        let table = ModuleTable::new();
        let mut registry = ViewRegistry::new(false);
        let err = registry
            .load(&table, "tethering", &mut AccelRegistry::new())
            .expect_err("load must fail");
        assert_eq!(err, LoadError::ModuleUnavailable("tethering".to_string()));
    }

    #[test]
    fn version_mismatch_keeps_module_out_of_registry() {
        let table = table_with("map", MODULE_API_VERSION + 1, ViewKind::Map);
        let mut registry = ViewRegistry::new(false);
        let err = registry
            .load(&table, "map", &mut AccelRegistry::new())
            .expect_err("load must fail");
        assert!(matches!(err, LoadError::VersionMismatch { .. }));
        assert!(registry.is_empty());
        assert!(registry.find_by_kind(ViewKind::Map).is_none());
    }

    #[test]
    fn load_list_continues_past_failures() {
        let mut table = table_with("lighttable", MODULE_API_VERSION, ViewKind::Lighttable);
        table.register("map", MODULE_API_VERSION + 2, || Box::new(Stub(ViewKind::Map)));
        table.register("print", MODULE_API_VERSION, || {
            Box::new(Stub(ViewKind::Print))
        });
        let mut registry = ViewRegistry::new(false);

        let loaded = registry.load_list(
            &table,
            &["lighttable", "map", "missing", "print"],
            &mut AccelRegistry::new(),
        );

        assert_eq!(loaded, 2);
        assert!(registry.find_by_name("lighttable").is_some());
        assert!(registry.find_by_name("print").is_some());
        assert!(registry.find_by_name("map").is_none());
    }

    #[test]
    fn capacity_is_enforced() {
        let table = table_with("slideshow", MODULE_API_VERSION, ViewKind::Slideshow);
        let mut registry = ViewRegistry::new(false);
        let mut accels = AccelRegistry::new();
        for _ in 0..MAX_VIEWS {
            registry
                .load(&table, "slideshow", &mut accels)
                .expect("load should succeed");
        }
        let err = registry
            .load(&table, "slideshow", &mut accels)
            .expect_err("registry must be full");
        assert!(matches!(err, LoadError::RegistryFull(_)));
    }
}
