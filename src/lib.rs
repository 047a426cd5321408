// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical runtime configuration backed by a remote key-value store.
//!
//! A single configuration blob (YAML or JSON) lives under one key of an
//! external store. This crate fetches it once at startup, decodes it into an
//! immutable tree, and keeps the tree current by subscribing to changes of the
//! same key. Application code reads values through dotted paths with lenient
//! typed accessors that never fail.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`RawValue`, `ConfigTree`, coercion, errors)
//! - **Ports**: Trait definitions for the seams (`ConfigParser`, `ConfigSource`, `ConfigWatcher`)
//! - **Adapters**: Parsers and store implementations (YAML, JSON, memory, files, etcd, Redis)
//! - **Service**: The live store and the synchronizer that keeps it current
//! - **Settings**: Typed consumers of well-known configuration sections
//!
//! # Features
//!
//! - **Nested Lookup**: `database.address` descends mappings; a literal dotted key wins
//! - **Lenient Typing**: `get_int`, `get_duration`, `get_time`, ... return zero values when absent
//! - **Hot Reload**: Valid updates replace the tree atomically, malformed ones are rejected
//! - **Supervision**: Lost subscriptions restart with backoff, every exit is reported
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML parser (default)
//! - `cli`: Build the `remotecfg` binary (default)
//! - `reload`: Enable watching files with `notify`
//! - `etcd`: Enable etcd support
//! - `redis`: Enable Redis support
//! - `remote`: Enable all remote stores (etcd + redis)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use remotecfg::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let backend = MemoryStore::new();
//! backend.set("services/billing", "database:\n  address: db:3306\ntimeout: 1m30s\n");
//!
//! let config = ConfigStore::new();
//! let sync = Synchronizer::builder()
//!     .key("services/billing")
//!     .backend(backend.clone())
//!     .store(config.clone())
//!     .build()?;
//! let handle = sync.start(CancellationToken::new()).await?;
//!
//! assert_eq!(config.get_string("database.address"), "db:3306");
//! assert_eq!(config.get_duration("timeout"), Duration::from_secs(90));
//! assert_eq!(config.get_int("missing"), 0);
//!
//! handle.shutdown().await;
//! # Ok::<(), ConfigError>(())
//! # }).unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigAccessor, ConfigError, ConfigTree, ConfigurationService, FromRawValue, RawValue,
        Result,
    };
    pub use crate::ports::{ChangeEvent, ConfigParser, ConfigSource, ConfigWatcher};
    pub use crate::service::{
        ConfigStore, RetryPolicy, SyncEvent, SyncExit, SyncHandle, SyncState, Synchronizer,
    };
    pub use tokio_util::sync::CancellationToken;

    // Re-export adapters based on feature flags
    pub use crate::adapters::{FileSource, JsonParser, MemoryStore};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
