// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source backed by a directory of files.
//!
//! Keys are relative paths under a root directory, so `services/billing.yaml`
//! reads `<root>/services/billing.yaml`. This gives a local stand-in for a
//! remote store during development.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigSource;
use async_trait::async_trait;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Maximum configuration file size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads configuration blobs from files under a root directory.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::FileSource;
/// use remotecfg::ports::ConfigSource;
///
/// # tokio_test::block_on(async {
/// let source = FileSource::new("/etc/myapp");
/// let blob = source.fetch("config.yaml").await.unwrap();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a source rooted at the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: "file".to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self::new(proj_dirs.config_dir()))
    }

    /// The root directory keys are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `key` to a path under the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        resolve_key(&self.root, key)
    }
}

/// Joins a key onto `root`, refusing anything that could escape it.
pub(crate) fn resolve_key(root: &Path, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let is_plain = !key.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if !is_plain {
        return Err(ConfigError::SourceError {
            source_name: "file".to_string(),
            message: format!("Invalid key '{}': must be a relative path without '..'", key),
            source: None,
        });
    }

    Ok(root.join(relative))
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::source(
                    "file",
                    format!("Failed to read file metadata: {}", key),
                    e,
                ))
            }
        };

        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: "file".to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                source: None,
            });
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::source(
                "file",
                format!("Failed to read configuration file: {}", key),
                e,
            )),
        }
    }
}
