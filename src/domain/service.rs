// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait: the holder of the
//! current [`ConfigTree`] that readers consult and the synchronizer replaces.

use crate::domain::{ConfigTree, RawValue};
use std::sync::Arc;

/// Holds exactly one live configuration snapshot at a time.
///
/// Implementations must make [`replace`](ConfigurationService::replace) atomic:
/// a concurrent reader sees either the old snapshot or the new one, never a
/// mixture. Readers must not block on the writer.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::{ConfigTree, ConfigurationService};
/// use std::sync::{Arc, Mutex};
///
/// struct LockedService(Mutex<Arc<ConfigTree>>);
///
/// impl ConfigurationService for LockedService {
///     fn snapshot(&self) -> Arc<ConfigTree> {
///         self.0.lock().unwrap().clone()
///     }
///
///     fn replace(&self, tree: ConfigTree) -> Arc<ConfigTree> {
///         std::mem::replace(&mut *self.0.lock().unwrap(), Arc::new(tree))
///     }
/// }
///
/// let service = LockedService(Mutex::new(Arc::new(ConfigTree::empty())));
/// assert!(service.get("anything").is_none());
/// ```
pub trait ConfigurationService: Send + Sync {
    /// Returns the currently installed snapshot.
    fn snapshot(&self) -> Arc<ConfigTree>;

    /// Installs `tree` as the current snapshot and returns the previous one.
    fn replace(&self, tree: ConfigTree) -> Arc<ConfigTree>;

    /// Resolves a dotted path against the current snapshot.
    fn get(&self, path: &str) -> Option<RawValue> {
        self.snapshot().get(path).cloned()
    }
}
