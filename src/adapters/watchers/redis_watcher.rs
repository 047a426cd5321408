// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis configuration watcher.
//!
//! This module provides a watcher that monitors a Redis key for changes using
//! Redis keyspace notifications (pub/sub).

use crate::adapters::redis::validate_namespace;
use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ChangeEvent, ConfigWatcher};
use async_trait::async_trait;
use futures::StreamExt;
use redis::{AsyncCommands, Client};
use tokio_util::sync::CancellationToken;

/// Watcher for Redis configuration changes.
///
/// This watcher subscribes to the keyspace channel of a single key. Writes are
/// reported with the key's new value, `del`, `expired` and `evicted` are
/// reported as deletions. A closed pub/sub connection ends the subscription with
/// an error.
///
/// **Note**: Redis keyspace notifications must be enabled. Set in redis.conf:
/// ```text
/// notify-keyspace-events KEA
/// ```
/// Or call [`RedisWatcher::try_enable_keyspace_notifications`].
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::RedisWatcher;
/// use remotecfg::ports::ConfigWatcher;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> remotecfg::domain::Result<()> {
/// let watcher = RedisWatcher::open("redis://localhost:6379", "myapp:")?;
/// watcher.try_enable_keyspace_notifications().await?;
///
/// watcher
///     .watch("billing", Arc::new(|event| println!("changed: {:?}", event)), CancellationToken::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedisWatcher {
    /// Redis client
    client: Client,
    /// Key prefix
    namespace: String,
}

impl RedisWatcher {
    /// Creates a watcher for the given connection URL.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379"`)
    /// * `namespace` - Key prefix (e.g., `"myapp:"`), may be empty
    pub fn open(url: &str, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;

        let client = Client::open(url)
            .map_err(|e| ConfigError::watcher(format!("Failed to create Redis client: {}", e), e))?;

        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    /// Attempts to enable keyspace notifications on the server.
    ///
    /// This sets `notify-keyspace-events` to `KEA` and requires permission to
    /// run `CONFIG SET`.
    pub async fn try_enable_keyspace_notifications(&self) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ConfigError::watcher(format!("Failed to connect to Redis: {}", e), e))?;

        redis::cmd("CONFIG")
            .arg("SET")
            .arg("notify-keyspace-events")
            .arg("KEA")
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| {
                ConfigError::watcher(
                    format!(
                        "Failed to enable keyspace notifications. Enable manually with: CONFIG SET notify-keyspace-events KEA. Error: {}",
                        e
                    ),
                    e,
                )
            })?;

        tracing::info!("Enabled Redis keyspace notifications");
        Ok(())
    }

    /// The keyspace channel carrying events for `full_key`.
    pub fn keyspace_channel(&self, full_key: &str) -> String {
        let db = self.client.get_connection_info().redis.db;
        format!("__keyspace@{}__:{}", db, full_key)
    }

    async fn read_change(&self, full_key: &str, operation: &str) -> Result<Option<ChangeEvent>> {
        match operation {
            "del" | "expired" | "evicted" | "rename_from" => Ok(Some(ChangeEvent::Deleted)),
            "set" | "setrange" | "append" | "rename_to" | "restore" | "copy_to" => {
                let mut conn = self
                    .client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| ConfigError::watcher(format!("Failed to connect to Redis: {}", e), e))?;
                let value: Option<Vec<u8>> = conn
                    .get(full_key)
                    .await
                    .map_err(|e| ConfigError::watcher(format!("Failed to read '{}': {}", full_key, e), e))?;
                Ok(Some(match value {
                    Some(bytes) => ChangeEvent::Updated(bytes),
                    None => ChangeEvent::Deleted,
                }))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ConfigWatcher for RedisWatcher {
    fn name(&self) -> &str {
        "redis"
    }

    async fn watch(
        &self,
        key: &str,
        callback: ChangeCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        let full_key = format!("{}{}", self.namespace, key);
        let channel = self.keyspace_channel(&full_key);

        let mut pubsub = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| ConfigError::watcher(format!("Failed to connect to Redis for watching: {}", e), e))?
            .into_pubsub();

        pubsub.subscribe(&channel).await.map_err(|e| {
            ConfigError::watcher(
                format!(
                    "Failed to subscribe to Redis keyspace events: {}. Ensure keyspace notifications are enabled with: CONFIG SET notify-keyspace-events KEA",
                    e
                ),
                e,
            )
        })?;

        tracing::info!(channel = %channel, "Starting Redis watch");
        let mut messages = Box::pin(pubsub.on_message());

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                message = messages.next() => message,
            };

            let Some(message) = message else {
                return Err(ConfigError::WatcherError {
                    message: "Redis pub/sub connection closed".to_string(),
                    source: None,
                });
            };

            let operation: String = match message.get_payload() {
                Ok(operation) => operation,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable keyspace notification");
                    continue;
                }
            };

            tracing::debug!(key = %full_key, operation = %operation, "Redis key changed");
            if let Some(change) = self.read_change(&full_key, &operation).await? {
                callback(change);
            }
        }
    }
}
