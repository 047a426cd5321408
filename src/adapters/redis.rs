// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis configuration source adapter.
//!
//! This module provides an adapter that reads a configuration blob stored as a
//! Redis string value.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigSource;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

/// Configuration source adapter for Redis.
///
/// The namespace is prepended to every key, so with namespace `myapp:` the key
/// `billing` reads `myapp:billing`.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::RedisSource;
/// use remotecfg::ports::ConfigSource;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = RedisSource::open("redis://localhost:6379", "myapp:")?;
/// let blob = source.fetch("billing").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedisSource {
    /// Redis client
    client: Client,
    /// Key prefix
    namespace: String,
}

impl RedisSource {
    /// Creates a source for the given connection URL.
    ///
    /// No connection is made until the first fetch.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379"`)
    /// * `namespace` - Key prefix (e.g., `"myapp:"`), may be empty
    pub fn open(url: &str, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;

        let client = Client::open(url).map_err(|e| {
            ConfigError::source("redis", format!("Failed to create Redis client: {}", e), e)
        })?;

        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    /// The full Redis key that `key` maps to.
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ConfigError::source("redis", format!("Failed to connect to Redis: {}", e), e))
    }
}

/// Rejects Redis pattern characters in a namespace.
pub(crate) fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.contains(['*', '?', '[', ']', '\\']) {
        return Err(ConfigError::SourceError {
            source_name: "redis".to_string(),
            message: "Namespace contains invalid characters (* ? [ ] \\)".to_string(),
            source: None,
        });
    }
    Ok(())
}

#[async_trait]
impl ConfigSource for RedisSource {
    fn name(&self) -> &str {
        "redis"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_key = self.full_key(key);
        let mut conn = self.get_connection().await?;

        conn.get::<_, Option<Vec<u8>>>(&full_key).await.map_err(|e| {
            ConfigError::source("redis", format!("Failed to read '{}' from Redis: {}", full_key, e), e)
        })
    }
}
