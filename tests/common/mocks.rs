// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ports for exercising failure handling.

use async_trait::async_trait;
use remotecfg::adapters::JsonParser;
use remotecfg::domain::{ConfigError, ConfigTree, Result};
use remotecfg::ports::{ChangeCallback, ConfigParser, ConfigSource, ConfigWatcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A watcher whose first `failures` subscriptions break immediately.
/// Later subscriptions wait for cancellation.
#[derive(Debug, Clone)]
pub struct FlakyWatcher {
    failures: usize,
    subscriptions: Arc<AtomicUsize>,
}

impl FlakyWatcher {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            subscriptions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A watcher that never manages to stay subscribed.
    pub fn always_failing() -> Self {
        Self::new(usize::MAX)
    }

    /// How many times `watch` was called.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigWatcher for FlakyWatcher {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn watch(&self, _key: &str, _callback: ChangeCallback, cancel: CancellationToken) -> Result<()> {
        let attempt = self.subscriptions.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(ConfigError::WatcherError {
                message: format!("connection refused (subscription {})", attempt),
                source: None,
            });
        }
        cancel.cancelled().await;
        Ok(())
    }
}

/// A watcher that panics as soon as it is subscribed.
#[derive(Debug, Clone, Copy)]
pub struct PanickingWatcher;

#[async_trait]
impl ConfigWatcher for PanickingWatcher {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn watch(&self, _key: &str, _callback: ChangeCallback, _cancel: CancellationToken) -> Result<()> {
        panic!("watcher exploded");
    }
}

/// JSON parser that panics on the literal payload `panic`.
#[derive(Debug, Clone, Default)]
pub struct PanickyParser {
    inner: JsonParser,
}

impl ConfigParser for PanickyParser {
    fn parse(&self, bytes: &[u8]) -> Result<ConfigTree> {
        if bytes == b"panic" {
            panic!("parser exploded");
        }
        self.inner.parse(bytes)
    }

    fn format_name(&self) -> &str {
        "panicky-json"
    }
}

/// A source whose store is unreachable.
#[derive(Debug, Clone, Copy)]
pub struct UnreachableSource;

#[async_trait]
impl ConfigSource for UnreachableSource {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn fetch(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(ConfigError::SourceError {
            source_name: "unreachable".to_string(),
            message: "connection refused".to_string(),
            source: None,
        })
    }
}
