// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing parser, source and watcher implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer. Store adapters implement `ConfigSource` for the initial read
//! and, under `watchers`, `ConfigWatcher` for change subscriptions.

#[cfg(feature = "etcd")]
pub mod etcd;
pub mod file;
pub mod json;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

use crate::ports::ConfigParser;
use std::sync::Arc;

// Re-export adapters based on feature flags
#[cfg(feature = "etcd")]
pub use etcd::EtcdSource;
pub use file::FileSource;
pub use json::JsonParser;
pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis::RedisSource;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;

#[cfg(feature = "reload")]
pub use watchers::FileWatcher;

#[cfg(feature = "etcd")]
pub use watchers::EtcdWatcher;

#[cfg(feature = "redis")]
pub use watchers::RedisWatcher;

/// The parser used when none is configured: YAML if enabled, JSON otherwise.
pub fn default_parser() -> Arc<dyn ConfigParser> {
    #[cfg(feature = "yaml")]
    let parser: Arc<dyn ConfigParser> = Arc::new(YamlParser::new());
    #[cfg(not(feature = "yaml"))]
    let parser: Arc<dyn ConfigParser> = Arc::new(JsonParser::new());
    parser
}

/// Looks up a parser by format name (`yaml`, `yml` or `json`).
pub fn parser_for(format: &str) -> Option<Arc<dyn ConfigParser>> {
    match format.to_ascii_lowercase().as_str() {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Some(Arc::new(YamlParser::new())),
        "json" => Some(Arc::new(JsonParser::new())),
        _ => None,
    }
}
