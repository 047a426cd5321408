// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd configuration watcher.
//!
//! This module provides a watcher that monitors a single etcd key using etcd's
//! native watch API.

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ChangeEvent, ConfigWatcher};
use async_trait::async_trait;
use etcd_client::{Client, EventType};
use tokio_util::sync::CancellationToken;

/// Watcher for etcd configuration changes.
///
/// `Put` events report the new value, `Delete` events report a deletion. A
/// closed or cancelled watch stream ends the subscription with an error.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::EtcdWatcher;
/// use remotecfg::ports::ConfigWatcher;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> remotecfg::domain::Result<()> {
/// let watcher = EtcdWatcher::connect(vec!["localhost:2379"], Some("myapp/")).await?;
/// let cancel = CancellationToken::new();
///
/// watcher
///     .watch("billing", Arc::new(|event| println!("changed: {:?}", event)), cancel)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EtcdWatcher {
    /// etcd client
    client: Client,
    /// Key prefix for namespacing
    prefix: String,
}

impl EtcdWatcher {
    /// Connects to the given etcd endpoints.
    pub async fn connect<S: AsRef<str>>(endpoints: Vec<S>, prefix: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        let client = Client::connect(&endpoints, None).await.map_err(|e| {
            ConfigError::watcher(format!("Failed to connect to etcd: {}", e), e)
        })?;

        Ok(Self::from_client(client, prefix))
    }

    /// Wraps an already connected client.
    pub fn from_client(client: Client, prefix: Option<&str>) -> Self {
        Self {
            client,
            prefix: prefix.unwrap_or_default().to_string(),
        }
    }
}

impl std::fmt::Debug for EtcdWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdWatcher")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConfigWatcher for EtcdWatcher {
    fn name(&self) -> &str {
        "etcd"
    }

    async fn watch(
        &self,
        key: &str,
        callback: ChangeCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        let full_key = format!("{}{}", self.prefix, key);
        let mut client = self.client.clone();

        let (mut watcher, mut stream) = client
            .watch(full_key.as_str(), None)
            .await
            .map_err(|e| ConfigError::watcher(format!("Failed to create etcd watch: {}", e), e))?;

        tracing::info!(key = %full_key, "Starting etcd watch");

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => {
                    if let Err(e) = watcher.cancel().await {
                        tracing::debug!(error = %e, "Failed to cancel etcd watch");
                    }
                    return Ok(());
                }
                message = stream.message() => message,
            };

            let response = match message {
                Ok(Some(response)) => response,
                Ok(None) => {
                    return Err(ConfigError::WatcherError {
                        message: "etcd watch stream ended".to_string(),
                        source: None,
                    })
                }
                Err(e) => {
                    return Err(ConfigError::watcher(format!("etcd watch failed: {}", e), e))
                }
            };

            if response.canceled() {
                return Err(ConfigError::WatcherError {
                    message: format!("etcd cancelled the watch: {}", response.cancel_reason()),
                    source: None,
                });
            }

            for event in response.events() {
                let change = match event.event_type() {
                    EventType::Put => match event.kv() {
                        Some(kv) => ChangeEvent::Updated(kv.value().to_vec()),
                        None => continue,
                    },
                    EventType::Delete => ChangeEvent::Deleted,
                };
                tracing::debug!(key = %full_key, "etcd key changed");
                callback(change);
            }
        }
    }
}
