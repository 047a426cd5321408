// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process key-value store.
//!
//! `MemoryStore` implements both halves of the external store contract without
//! any network. It backs embedded use and the crate's own tests.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ChangeEvent, ConfigSource, ConfigWatcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
enum Notification {
    Change { key: String, event: ChangeEvent },
    Disconnect,
}

/// A cloneable in-memory store. Clones share the same data and subscribers.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::MemoryStore;
/// use remotecfg::ports::ConfigSource;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// store.set("services/billing", "port: 8080");
/// assert_eq!(
///     store.fetch("services/billing").await.unwrap(),
///     Some(b"port: 8080".to_vec())
/// );
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    notifier: broadcast::Sender<Notification>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (notifier, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            notifier,
        }
    }

    /// Stores `value` at `key` and notifies watchers of that key.
    pub fn set(&self, key: &str, value: impl Into<Vec<u8>>) {
        let value = value.into();
        match self.values.write() {
            Ok(mut values) => {
                values.insert(key.to_string(), value.clone());
            }
            Err(_) => {
                tracing::warn!(key, "Memory store lock poisoned, value not stored");
                return;
            }
        }
        self.notify(Notification::Change {
            key: key.to_string(),
            event: ChangeEvent::Updated(value),
        });
    }

    /// Removes `key`, notifying watchers if it existed.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self
            .values
            .write()
            .map(|mut values| values.remove(key).is_some())
            .unwrap_or(false);
        if removed {
            self.notify(Notification::Change {
                key: key.to_string(),
                event: ChangeEvent::Deleted,
            });
        }
        removed
    }

    /// Breaks every active subscription, as a lost connection would.
    pub fn disconnect_watchers(&self) {
        self.notify(Notification::Disconnect);
    }

    /// The number of subscriptions currently active.
    pub fn watcher_count(&self) -> usize {
        self.notifier.receiver_count()
    }

    fn notify(&self, notification: Notification) {
        // No receivers is not an error: nobody is watching yet.
        let _ = self.notifier.send(notification);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigSource for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().map_err(|_| ConfigError::SourceError {
            source_name: "memory".to_string(),
            message: "store lock poisoned".to_string(),
            source: None,
        })?;
        Ok(values.get(key).cloned())
    }
}

#[async_trait]
impl ConfigWatcher for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn watch(
        &self,
        key: &str,
        callback: ChangeCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut receiver = self.notifier.subscribe();
        tracing::debug!(key, "Memory watcher subscribed");

        loop {
            let notification = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                received = receiver.recv() => received,
            };

            match notification {
                Ok(Notification::Change { key: changed, event }) if changed == key => callback(event),
                Ok(Notification::Change { .. }) => {}
                Ok(Notification::Disconnect) => {
                    return Err(ConfigError::WatcherError {
                        message: "memory store disconnected its watchers".to_string(),
                        source: None,
                    })
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(key, skipped, "Memory watcher lagged behind, notifications skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(ConfigError::WatcherError {
                        message: "memory store notification channel closed".to_string(),
                        source: None,
                    })
                }
            }
        }
    }
}
