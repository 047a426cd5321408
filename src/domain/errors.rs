// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Errors only ever surface at the fetch, parse and subscribe boundaries. The
//! typed accessors never fail: a missing key or a mismatched type resolves to the
//! target type's zero value instead.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::errors::ConfigError;
///
/// fn fetch_blob() -> Result<Vec<u8>, ConfigError> {
///     Err(ConfigError::KeyNotFound {
///         key: "services/billing".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration blob was not present in the remote store.
    #[error("Configuration key not found: {key}")]
    KeyNotFound {
        /// The store key that was looked up
        key: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration blob.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a configuration watcher.
    #[error("Configuration watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation was requested in a state that does not allow it.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// What was attempted and why it was refused
        message: String,
    },

    /// One or more return codes were registered more than once.
    #[error("Duplicate return codes registered: {codes:?}")]
    DuplicateReturnCodes {
        /// Every duplicated code, sorted and listed once
        codes: Vec<i32>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `ParseError` wrapping the given decoder error.
    pub fn parse<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::ParseError {
            message: format!("Failed to parse {}: {}", format, err),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `SourceError` wrapping the given client error.
    pub fn source<E>(source_name: &str, message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `WatcherError` wrapping the given client error.
    pub fn watcher<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::WatcherError {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
