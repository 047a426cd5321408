// SPDX-License-Identifier: MIT OR Apache-2.0

//! The live configuration handle.
//!
//! `ConfigStore` holds the current [`ConfigTree`] behind an atomically
//! swappable pointer. Readers load the pointer without locking and keep the
//! snapshot they loaded for as long as they hold it; a concurrent replace never
//! changes a snapshot already handed out.

use crate::domain::{ConfigAccessor, ConfigTree, ConfigurationService, RawValue};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// A cheaply cloneable handle to the current configuration snapshot.
///
/// Clones share the same snapshot slot. Pass the handle to whatever needs
/// configuration instead of reaching for a global.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::{ConfigAccessor, ConfigTree, Mapping, RawValue};
/// use remotecfg::service::ConfigStore;
///
/// let store = ConfigStore::new();
/// assert_eq!(store.get_int("workers"), 0);
///
/// store.replace(ConfigTree::from_mapping(Mapping::from([
///     ("workers".to_string(), RawValue::Int(4)),
/// ])));
/// assert_eq!(store.get_int("workers"), 4);
/// ```
#[derive(Clone, Debug)]
pub struct ConfigStore {
    current: Arc<ArcSwap<ConfigTree>>,
}

impl ConfigStore {
    /// Creates a store holding an empty tree.
    pub fn new() -> Self {
        Self::from_tree(ConfigTree::empty())
    }

    /// Creates a store holding `tree`. Handy for injecting fixed configuration
    /// in tests.
    pub fn from_tree(tree: ConfigTree) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(tree)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<ConfigTree> {
        self.current.load_full()
    }

    /// Installs `tree` and returns the snapshot it replaced.
    pub fn replace(&self, tree: ConfigTree) -> Arc<ConfigTree> {
        self.current.swap(Arc::new(tree))
    }

    /// Resolves `path` against the current snapshot.
    pub fn get(&self, path: &str) -> Option<RawValue> {
        self.current.load().get(path).cloned()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationService for ConfigStore {
    fn snapshot(&self) -> Arc<ConfigTree> {
        ConfigStore::snapshot(self)
    }

    fn replace(&self, tree: ConfigTree) -> Arc<ConfigTree> {
        ConfigStore::replace(self, tree)
    }

    fn get(&self, path: &str) -> Option<RawValue> {
        ConfigStore::get(self, path)
    }
}

impl ConfigAccessor for ConfigStore {
    fn with_value<R, F>(&self, path: &str, f: F) -> R
    where
        F: FnOnce(Option<&RawValue>) -> R,
    {
        let guard = self.current.load();
        f(guard.get(path))
    }
}
