// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for configuration file changes.
//!
//! This module provides a watcher that monitors a configuration file under a
//! root directory and reports its new contents when it changes.

use crate::adapters::file::resolve_key;
use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ChangeEvent, ConfigWatcher};
use async_trait::async_trait;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// File system watcher for configuration files.
///
/// The parent directory is watched rather than the file itself, so editors that
/// replace files by renaming are handled. Bursts of events are debounced: the
/// file is read once the directory has been quiet for the debounce delay.
///
/// # Examples
///
/// ```rust,no_run
/// use remotecfg::adapters::FileWatcher;
/// use remotecfg::ports::ConfigWatcher;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let watcher = FileWatcher::new("/etc/myapp", None);
/// let cancel = CancellationToken::new();
/// watcher
///     .watch("config.yaml", Arc::new(|event| println!("{:?}", event)), cancel)
///     .await
///     .unwrap();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FileWatcher {
    /// Directory keys are resolved against
    root: PathBuf,
    /// Quiet period before a change is reported (default 500ms)
    debounce_delay: Duration,
}

impl FileWatcher {
    /// Creates a watcher for files under `root`.
    pub fn new(root: impl Into<PathBuf>, debounce_delay: Option<Duration>) -> Self {
        Self {
            root: root.into(),
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
        }
    }

    fn is_target(event: &Event, target: &Path) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) && event
            .paths
            .iter()
            .any(|p| p == target || p.file_name() == target.file_name())
    }

    async fn read_event(path: &Path) -> Option<ChangeEvent> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(ChangeEvent::Updated(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Some(ChangeEvent::Deleted),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read changed configuration file");
                None
            }
        }
    }
}

#[async_trait]
impl ConfigWatcher for FileWatcher {
    fn name(&self) -> &str {
        "file"
    }

    async fn watch(
        &self,
        key: &str,
        callback: ChangeCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        let target = resolve_key(&self.root, key)?;
        let parent = target
            .parent()
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })?
            .to_path_buf();

        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        })
        .map_err(|e| ConfigError::watcher(format!("Failed to create file watcher: {}", e), e))?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::watcher(format!("Failed to start watching: {}", e), e))?;

        tracing::debug!(path = %target.display(), "File watcher started");

        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                received = event_rx.recv() => received,
            };

            let event = match received {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    return Err(ConfigError::watcher(format!("File watch failed: {}", e), e))
                }
                None => {
                    return Err(ConfigError::WatcherError {
                        message: "File event channel closed".to_string(),
                        source: None,
                    })
                }
            };

            if !Self::is_target(&event, &target) {
                continue;
            }

            // Let the burst settle, then drop whatever queued up meanwhile.
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(self.debounce_delay) => {}
            }
            while event_rx.try_recv().is_ok() {}

            if let Some(change) = Self::read_event(&target).await {
                callback(change);
            }
        }
    }
}
