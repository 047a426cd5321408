// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, the subscribe-for-change half
//! of the external store contract.

use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A change observed at a watched key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The key now holds these bytes.
    Updated(Vec<u8>),
    /// The key was removed.
    Deleted,
}

/// Type alias for change notification callbacks.
///
/// The callback runs on the watcher's task and should return quickly.
pub type ChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// A trait for subscribing to changes of a single key.
///
/// # Contract
///
/// [`watch`](ConfigWatcher::watch) runs until one of two things happens:
///
/// * `cancel` fires, and it returns `Ok(())`;
/// * the subscription breaks (connection lost, stream closed), and it returns
///   `Err`. The caller decides whether to subscribe again.
///
/// A watcher may be subscribed again after `watch` returned.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use remotecfg::domain::Result;
/// use remotecfg::ports::{ChangeCallback, ChangeEvent, ConfigWatcher};
/// use tokio_util::sync::CancellationToken;
///
/// struct OneShotWatcher;
///
/// #[async_trait]
/// impl ConfigWatcher for OneShotWatcher {
///     fn name(&self) -> &str {
///         "one-shot"
///     }
///
///     async fn watch(
///         &self,
///         _key: &str,
///         callback: ChangeCallback,
///         cancel: CancellationToken,
///     ) -> Result<()> {
///         callback(ChangeEvent::Updated(b"a: 1".to_vec()));
///         cancel.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ConfigWatcher: Send + Sync {
    /// Returns the name of this watcher, e.g. `"etcd"`.
    fn name(&self) -> &str;

    /// Subscribes to changes of `key`, invoking `callback` for each one.
    async fn watch(&self, key: &str, callback: ChangeCallback, cancel: CancellationToken)
        -> Result<()>;
}
