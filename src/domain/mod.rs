// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module holds the untyped value model, the immutable configuration tree
//! with its path lookup, the coercion rules behind the typed accessors, and the
//! return-code envelopes. It has no knowledge of where configuration comes from.

pub mod accessor;
pub mod coerce;
pub mod config_path;
pub mod config_tree;
pub mod errors;
pub mod raw_value;
pub mod return_code;
pub mod service;

// Re-export commonly used types
pub use accessor::ConfigAccessor;
pub use coerce::{coerce, try_coerce, FromRawValue};
pub use config_path::ConfigPath;
pub use config_tree::ConfigTree;
pub use errors::{ConfigError, Result};
pub use raw_value::{Mapping, RawValue};
pub use return_code::{codes, ReturnCode, ReturnCodeRegistry, ReturnCodeRegistryBuilder};
pub use service::ConfigurationService;
