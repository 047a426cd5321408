// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which the core
//! talks to the outside world: decoding blobs, reading a key from an external
//! store, and subscribing to changes of that key. Adapters implement them.

pub mod parser;
pub mod source;
pub mod watcher;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use source::ConfigSource;
pub use watcher::{ChangeCallback, ChangeEvent, ConfigWatcher};
