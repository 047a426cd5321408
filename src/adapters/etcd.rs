// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd configuration source adapter.
//!
//! This module provides an adapter that reads a configuration blob stored
//! under a single etcd key.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigSource;
use async_trait::async_trait;
use etcd_client::Client;

/// Configuration source adapter for etcd.
///
/// An optional prefix namespaces every key, so with prefix `myapp/` the key
/// `billing` reads `myapp/billing`.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::EtcdSource;
/// use remotecfg::ports::ConfigSource;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = EtcdSource::connect(vec!["localhost:2379"], Some("myapp/")).await?;
/// let blob = source.fetch("billing").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EtcdSource {
    /// etcd client
    client: Client,
    /// Key prefix for namespacing
    prefix: String,
}

impl EtcdSource {
    /// Connects to the given etcd endpoints.
    ///
    /// # Arguments
    ///
    /// * `endpoints` - List of etcd endpoints (e.g., `["localhost:2379"]`)
    /// * `prefix` - Optional key prefix for namespacing (e.g., `"myapp/"`)
    pub async fn connect<S: AsRef<str>>(endpoints: Vec<S>, prefix: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();

        let client = Client::connect(&endpoints, None).await.map_err(|e| {
            ConfigError::source("etcd", format!("Failed to connect to etcd: {}", e), e)
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

    /// The full etcd key that `key` maps to.
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl std::fmt::Debug for EtcdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdSource")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConfigSource for EtcdSource {
    fn name(&self) -> &str {
        "etcd"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let full_key = self.full_key(key);
        let mut client = self.client.clone();

        let response = client.get(full_key.as_str(), None).await.map_err(|e| {
            ConfigError::source("etcd", format!("Failed to fetch '{}' from etcd: {}", full_key, e), e)
        })?;

        Ok(response.kvs().first().map(|kv| kv.value().to_vec()))
    }
}
