// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the point-read half of the
//! external store contract.

use crate::domain::Result;
use async_trait::async_trait;

/// A trait for reading a configuration blob from an external store.
///
/// A source knows nothing about the blob's format; it returns raw bytes that a
/// [`ConfigParser`](crate::ports::ConfigParser) decodes afterwards.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`, since the synchronizer shares them
/// with its background task.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use remotecfg::domain::Result;
/// use remotecfg::ports::ConfigSource;
///
/// struct StaticSource(&'static [u8]);
///
/// #[async_trait]
/// impl ConfigSource for StaticSource {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
///         Ok((key == "app").then(|| self.0.to_vec()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let source = StaticSource(b"port: 80");
/// assert!(source.fetch("app").await.unwrap().is_some());
/// assert!(source.fetch("other").await.unwrap().is_none());
/// # });
/// ```
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this source, e.g. `"etcd"`.
    ///
    /// Used in logs and in [`ConfigError::SourceError`](crate::domain::ConfigError::SourceError).
    fn name(&self) -> &str;

    /// Reads the raw bytes stored at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The key exists
    /// * `Ok(None)` - The key does not exist
    /// * `Err(ConfigError)` - The store could not be reached or answered with an error
    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;
    use std::collections::HashMap;

    struct TestSource {
        values: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            "test"
        }

        async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
            if key.is_empty() {
                return Err(ConfigError::SourceError {
                    source_name: self.name().to_string(),
                    message: "empty key".to_string(),
                    source: None,
                });
            }
            Ok(self.values.get(key).cloned())
        }
    }

    fn source() -> TestSource {
        let mut values = HashMap::new();
        values.insert("app".to_string(), b"a: 1".to_vec());
        TestSource { values }
    }

    #[tokio::test]
    async fn test_fetch_existing_key() {
        assert_eq!(source().fetch("app").await.unwrap(), Some(b"a: 1".to_vec()));
    }

    #[tokio::test]
    async fn test_fetch_missing_key() {
        assert_eq!(source().fetch("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_error() {
        let err = source().fetch("").await.unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[tokio::test]
    async fn test_source_as_trait_object() {
        let boxed: Box<dyn ConfigSource> = Box::new(source());
        assert_eq!(boxed.name(), "test");
        assert!(boxed.fetch("app").await.unwrap().is_some());
    }
}
