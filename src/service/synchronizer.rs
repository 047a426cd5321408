// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps a configuration store in step with an external store.
//!
//! The synchronizer performs one blocking initial load, then runs a supervised
//! background task that subscribes to changes of the same key and swaps in a
//! freshly parsed tree for every valid update.
//!
//! # States
//!
//! ```text
//! Uninitialized -> Loaded -> Watching <-> Reloading
//!        |                     |
//!        v                     v
//!      Failed          Stopped | Failed
//! ```
//!
//! A failed reload never touches the installed tree. A lost subscription is
//! restarted according to the [`RetryPolicy`]. The key is read again before
//! every subscription, so changes made while unsubscribed are still applied. Every exit of the background
//! task is logged and published as [`SyncEvent::Exited`].

use crate::adapters::default_parser;
use crate::domain::{ConfigError, ConfigTree, ConfigurationService, Result};
use crate::ports::{ChangeCallback, ChangeEvent, ConfigParser, ConfigSource, ConfigWatcher};
use crate::service::retry::RetryPolicy;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const EVENT_CAPACITY: usize = 64;

/// Lifecycle state of a [`Synchronizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// Nothing has been loaded yet.
    Uninitialized,
    /// The initial configuration is installed; no subscription yet.
    Loaded,
    /// Subscribed and waiting for changes.
    Watching,
    /// Parsing and installing an update.
    Reloading,
    /// The background task was cancelled.
    Stopped,
    /// The initial load failed, or the background task gave up or panicked.
    Failed,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Uninitialized => "uninitialized",
            SyncState::Loaded => "loaded",
            SyncState::Watching => "watching",
            SyncState::Reloading => "reloading",
            SyncState::Stopped => "stopped",
            SyncState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why the background task ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncExit {
    /// The cancellation token fired.
    Cancelled,
    /// The subscription kept failing and the retry policy ran out.
    GaveUp {
        /// Consecutive lost subscriptions
        attempts: u32,
        /// The last failure
        reason: String,
    },
    /// The task panicked outside the guarded reload handler.
    Panicked {
        /// The panic message
        reason: String,
    },
}

impl fmt::Display for SyncExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncExit::Cancelled => f.write_str("cancelled"),
            SyncExit::GaveUp { attempts, reason } => {
                write!(f, "gave up after {} attempts: {}", attempts, reason)
            }
            SyncExit::Panicked { reason } => write!(f, "panicked: {}", reason),
        }
    }
}

/// Something the synchronizer did, published to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    /// The initial configuration was installed.
    Loaded,
    /// An update was parsed and installed.
    Applied,
    /// An update could not be parsed; the previous tree stays installed.
    Rejected {
        /// The parse error
        reason: String,
    },
    /// A notification was not applied, e.g. the key was deleted.
    Ignored {
        /// Why it was skipped
        reason: String,
    },
    /// The reload handler panicked; the previous tree stays installed.
    HandlerPanicked {
        /// The panic message
        reason: String,
    },
    /// The subscription broke and will be restarted.
    SubscriptionLost {
        /// Consecutive lost subscriptions so far
        attempt: u32,
        /// The transport error
        reason: String,
        /// Backoff before the next subscription
        retry_in: Duration,
    },
    /// The background task ended.
    Exited(SyncExit),
}

struct Inner {
    key: String,
    source: Arc<dyn ConfigSource>,
    watcher: Arc<dyn ConfigWatcher>,
    parser: Arc<dyn ConfigParser>,
    store: Arc<dyn ConfigurationService>,
    retry: RetryPolicy,
    state: watch::Sender<SyncState>,
    events: broadcast::Sender<SyncEvent>,
    // Last blob handled for `key`; `None` after a deletion.
    last_seen: Mutex<Option<Vec<u8>>>,
}

impl Inner {
    fn set_state(&self, state: SyncState) {
        self.state.send_replace(state);
    }

    fn emit(&self, event: SyncEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    fn remember(&self, blob: Option<&[u8]>) {
        if let Ok(mut last) = self.last_seen.lock() {
            *last = blob.map(<[u8]>::to_vec);
        }
    }

    fn already_seen(&self, blob: Option<&[u8]>) -> bool {
        match self.last_seen.lock() {
            Ok(last) => last.as_deref() == blob,
            Err(_) => false,
        }
    }
}

/// Loads configuration from an external store and keeps it current.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::MemoryStore;
/// use remotecfg::domain::ConfigAccessor;
/// use remotecfg::service::{ConfigStore, Synchronizer};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let backend = MemoryStore::new();
/// backend.set("services/billing", "workers: 4");
///
/// let store = ConfigStore::new();
/// let sync = Synchronizer::builder()
///     .key("services/billing")
///     .backend(backend.clone())
///     .store(store.clone())
///     .build()
///     .unwrap();
///
/// let handle = sync.start(CancellationToken::new()).await.unwrap();
/// assert_eq!(store.get_int("workers"), 4);
/// handle.shutdown().await;
/// # });
/// ```
#[derive(Clone)]
pub struct Synchronizer {
    inner: Arc<Inner>,
}

impl Synchronizer {
    /// Starts building a synchronizer.
    pub fn builder() -> SynchronizerBuilder {
        SynchronizerBuilder::default()
    }

    /// The external store key being synchronized.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SyncState {
        *self.inner.state.borrow()
    }

    /// A receiver that observes every state change.
    pub fn state_receiver(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    /// Subscribes to [`SyncEvent`]s. Subscribe before [`start`](Self::start)
    /// to see the initial `Loaded` event.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Fetches, parses and installs the initial configuration.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::KeyNotFound`] if the key does not exist
    /// * the source's error if the fetch failed
    /// * the parser's error if the blob is malformed
    /// * [`ConfigError::InvalidState`] if the watch task is already running
    ///
    /// Any failure leaves the synchronizer in [`SyncState::Failed`].
    pub async fn load(&self) -> Result<Arc<ConfigTree>> {
        let inner = &self.inner;
        if matches!(self.state(), SyncState::Watching | SyncState::Reloading) {
            return Err(ConfigError::InvalidState {
                message: format!("cannot load '{}' while it is being watched", inner.key),
            });
        }

        match self.fetch_tree().await {
            Ok(tree) => {
                inner.store.replace(tree);
                inner.set_state(SyncState::Loaded);
                tracing::info!(key = %inner.key, source = inner.source.name(), "Loaded initial configuration");
                inner.emit(SyncEvent::Loaded);
                Ok(inner.store.snapshot())
            }
            Err(e) => {
                inner.set_state(SyncState::Failed);
                tracing::error!(key = %inner.key, error = %e, "Initial configuration load failed");
                Err(e)
            }
        }
    }

    async fn fetch_tree(&self) -> Result<ConfigTree> {
        let inner = &self.inner;
        let bytes = inner
            .source
            .fetch(&inner.key)
            .await?
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: inner.key.clone(),
            })?;
        let tree = inner.parser.parse(&bytes)?;
        inner.remember(Some(&bytes));
        Ok(tree)
    }

    /// Starts the supervised watch task. Requires a prior successful
    /// [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidState`] if nothing is loaded, the task is
    /// already running, or no tokio runtime is available.
    pub fn spawn(&self, cancel: CancellationToken) -> Result<SyncHandle> {
        let inner = Arc::clone(&self.inner);

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| ConfigError::InvalidState {
            message: format!("synchronizer needs a tokio runtime: {}", e),
        })?;

        let claimed = inner.state.send_if_modified(|state| {
            if *state == SyncState::Loaded {
                *state = SyncState::Watching;
                true
            } else {
                false
            }
        });
        if !claimed {
            return Err(ConfigError::InvalidState {
                message: format!("cannot watch '{}' in state {}", inner.key, self.state()),
            });
        }

        let worker = runtime.spawn(run_watch_loop(Arc::clone(&inner), cancel.clone()));
        let supervisor_inner = Arc::clone(&inner);
        let task = runtime.spawn(async move {
            let exit = match worker.await {
                Ok(exit) => exit,
                Err(e) if e.is_panic() => SyncExit::Panicked {
                    reason: panic_message(e.into_panic().as_ref()),
                },
                Err(e) => SyncExit::Panicked {
                    reason: e.to_string(),
                },
            };
            record_exit(&supervisor_inner, &exit);
            exit
        });

        Ok(SyncHandle {
            task,
            cancel,
            state: inner.state.subscribe(),
            events: inner.events.clone(),
        })
    }

    /// [`load`](Self::load) followed by [`spawn`](Self::spawn).
    pub async fn start(&self, cancel: CancellationToken) -> Result<SyncHandle> {
        self.load().await?;
        self.spawn(cancel)
    }
}

impl fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("key", &self.inner.key)
            .field("source", &self.inner.source.name())
            .field("watcher", &self.inner.watcher.name())
            .field("parser", &self.inner.parser.format_name())
            .field("state", &self.state())
            .finish()
    }
}

fn record_exit(inner: &Inner, exit: &SyncExit) {
    match exit {
        SyncExit::Cancelled => {
            inner.set_state(SyncState::Stopped);
            tracing::info!(key = %inner.key, "Configuration watch stopped");
        }
        SyncExit::GaveUp { .. } | SyncExit::Panicked { .. } => {
            inner.set_state(SyncState::Failed);
            tracing::error!(key = %inner.key, exit = %exit, "Configuration watch terminated");
        }
    }
    inner.emit(SyncEvent::Exited(exit.clone()));
}

async fn run_watch_loop(inner: Arc<Inner>, cancel: CancellationToken) -> SyncExit {
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return SyncExit::Cancelled;
        }

        inner.set_state(SyncState::Watching);
        let handler = Arc::new(ReloadHandler {
            inner: Arc::clone(&inner),
        });
        let started = Instant::now();

        // Changes made while unsubscribed produce no notification.
        let fetched = tokio::select! {
            _ = cancel.cancelled() => return SyncExit::Cancelled,
            fetched = inner.source.fetch(&inner.key) => fetched,
        };

        let result = match fetched {
            Ok(current) => {
                handler.resync(current);
                let callback_handler = Arc::clone(&handler);
                let callback: ChangeCallback = Arc::new(move |event| callback_handler.handle(event));
                tracing::debug!(key = %inner.key, watcher = inner.watcher.name(), "Subscribing to configuration changes");
                inner.watcher.watch(&inner.key, callback, cancel.clone()).await
            }
            Err(e) => Err(e),
        };

        if cancel.is_cancelled() {
            return SyncExit::Cancelled;
        }

        let reason = match result {
            Ok(()) => "subscription ended without cancellation".to_string(),
            Err(e) => e.to_string(),
        };

        if started.elapsed() >= inner.retry.reset_after {
            attempt = 0;
        }
        attempt = attempt.saturating_add(1);

        if !inner.retry.allows(attempt) {
            return SyncExit::GaveUp {
                attempts: attempt,
                reason,
            };
        }

        let retry_in = inner.retry.delay_for(attempt);
        tracing::warn!(
            key = %inner.key,
            attempt,
            retry_in_ms = retry_in.as_millis() as u64,
            error = %reason,
            "Configuration subscription lost, restarting"
        );
        inner.emit(SyncEvent::SubscriptionLost {
            attempt,
            reason,
            retry_in,
        });

        tokio::select! {
            _ = cancel.cancelled() => return SyncExit::Cancelled,
            _ = tokio::time::sleep(retry_in) => {}
        }
    }
}

/// Applies change notifications; runs on the watcher's task.
struct ReloadHandler {
    inner: Arc<Inner>,
}

impl ReloadHandler {
    /// Applies the value read straight from the store unless it was already
    /// handled.
    fn resync(&self, current: Option<Vec<u8>>) {
        if self.inner.already_seen(current.as_deref()) {
            tracing::debug!(key = %self.inner.key, "Configuration unchanged since last notification");
            return;
        }
        tracing::info!(key = %self.inner.key, "Configuration changed while unsubscribed");
        self.handle(match current {
            Some(bytes) => ChangeEvent::Updated(bytes),
            None => ChangeEvent::Deleted,
        });
    }

    fn handle(&self, event: ChangeEvent) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.apply(event)));
        if let Err(payload) = outcome {
            let reason = panic_message(payload.as_ref());
            tracing::error!(key = %self.inner.key, panic = %reason, "Reload handler panicked, keeping previous configuration");
            self.inner.set_state(SyncState::Watching);
            self.inner.emit(SyncEvent::HandlerPanicked { reason });
        }
    }

    fn apply(&self, event: ChangeEvent) {
        let inner = &self.inner;
        match event {
            ChangeEvent::Deleted => {
                inner.remember(None);
                tracing::warn!(key = %inner.key, "Configuration key deleted, keeping previous configuration");
                inner.emit(SyncEvent::Ignored {
                    reason: "key deleted".to_string(),
                });
            }
            ChangeEvent::Updated(bytes) => {
                inner.remember(Some(&bytes));
                inner.set_state(SyncState::Reloading);
                match inner.parser.parse(&bytes) {
                    Ok(tree) => {
                        inner.store.replace(tree);
                        tracing::info!(key = %inner.key, bytes = bytes.len(), "Applied configuration update");
                        inner.emit(SyncEvent::Applied);
                    }
                    Err(e) => {
                        tracing::error!(key = %inner.key, error = %e, "Rejected configuration update, keeping previous configuration");
                        inner.emit(SyncEvent::Rejected {
                            reason: e.to_string(),
                        });
                    }
                }
                inner.set_state(SyncState::Watching);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to a running watch task.
#[derive(Debug)]
pub struct SyncHandle {
    task: JoinHandle<SyncExit>,
    cancel: CancellationToken,
    state: watch::Receiver<SyncState>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncHandle {
    /// The current lifecycle state.
    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// A receiver that observes every state change.
    pub fn state_receiver(&self) -> watch::Receiver<SyncState> {
        self.state.clone()
    }

    /// Subscribes to [`SyncEvent`]s from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// The token that stops the task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// `true` once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(self) -> SyncExit {
        self.cancel.cancel();
        self.join().await
    }

    /// Waits for the task to exit on its own.
    pub async fn join(self) -> SyncExit {
        match self.task.await {
            Ok(exit) => exit,
            Err(e) => SyncExit::Panicked {
                reason: e.to_string(),
            },
        }
    }
}

/// Builder for [`Synchronizer`].
///
/// `key`, a source, a watcher and a store are required. The parser defaults to
/// YAML when the `yaml` feature is enabled, JSON otherwise, and the retry
/// policy to [`RetryPolicy::default`].
#[derive(Default)]
pub struct SynchronizerBuilder {
    key: Option<String>,
    source: Option<Arc<dyn ConfigSource>>,
    watcher: Option<Arc<dyn ConfigWatcher>>,
    parser: Option<Arc<dyn ConfigParser>>,
    store: Option<Arc<dyn ConfigurationService>>,
    retry: RetryPolicy,
}

impl SynchronizerBuilder {
    /// Sets the external store key holding the configuration blob.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets where the initial configuration is read from.
    pub fn source(self, source: impl ConfigSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    /// Sets a shared source.
    pub fn shared_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets where change notifications come from.
    pub fn watcher(self, watcher: impl ConfigWatcher + 'static) -> Self {
        self.shared_watcher(Arc::new(watcher))
    }

    /// Sets a shared watcher.
    pub fn shared_watcher(mut self, watcher: Arc<dyn ConfigWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Uses one backend as both source and watcher.
    pub fn backend<B>(self, backend: B) -> Self
    where
        B: ConfigSource + ConfigWatcher + 'static,
    {
        let backend = Arc::new(backend);
        self.shared_source(backend.clone()).shared_watcher(backend)
    }

    /// Sets the blob format.
    pub fn parser(self, parser: impl ConfigParser + 'static) -> Self {
        self.shared_parser(Arc::new(parser))
    }

    /// Sets a shared parser.
    pub fn shared_parser(mut self, parser: Arc<dyn ConfigParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the store that receives every installed tree.
    pub fn store(mut self, store: impl ConfigurationService + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets the restart policy for lost subscriptions.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the synchronizer in [`SyncState::Uninitialized`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidState`] naming the first missing part.
    pub fn build(self) -> Result<Synchronizer> {
        let missing = |part: &str| ConfigError::InvalidState {
            message: format!("synchronizer needs a {}", part),
        };

        let key = self.key.filter(|k| !k.is_empty()).ok_or_else(|| missing("key"))?;
        let source = self.source.ok_or_else(|| missing("source"))?;
        let watcher = self.watcher.ok_or_else(|| missing("watcher"))?;
        let store = self.store.ok_or_else(|| missing("store"))?;
        let parser = self.parser.unwrap_or_else(default_parser);

        let (state, _) = watch::channel(SyncState::Uninitialized);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Synchronizer {
            inner: Arc::new(Inner {
                key,
                source,
                watcher,
                parser,
                store,
                retry: self.retry,
                state,
                events,
                last_seen: Mutex::new(None),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{JsonParser, MemoryStore};
    use crate::domain::ConfigAccessor;
    use crate::service::ConfigStore;

    fn builder(backend: &MemoryStore, store: &ConfigStore) -> SynchronizerBuilder {
        Synchronizer::builder()
            .key("app")
            .backend(backend.clone())
            .parser(JsonParser::new())
            .store(store.clone())
    }

    #[test]
    fn test_build_requires_parts() {
        let err = Synchronizer::builder().build().unwrap_err();
        assert!(err.to_string().contains("key"));

        let err = Synchronizer::builder()
            .key("app")
            .backend(MemoryStore::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("store"));
    }

    #[tokio::test]
    async fn test_load_installs_tree() {
        let backend = MemoryStore::new();
        backend.set("app", r#"{"name": "billing"}"#);
        let store = ConfigStore::new();
        let sync = builder(&backend, &store).build().unwrap();

        assert_eq!(sync.state(), SyncState::Uninitialized);
        sync.load().await.unwrap();
        assert_eq!(sync.state(), SyncState::Loaded);
        assert_eq!(store.get_string("name"), "billing");
    }

    #[tokio::test]
    async fn test_load_missing_key_fails() {
        let store = ConfigStore::new();
        let sync = builder(&MemoryStore::new(), &store).build().unwrap();

        let err = sync.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound { .. }));
        assert_eq!(sync.state(), SyncState::Failed);
    }

    #[tokio::test]
    async fn test_load_malformed_fails() {
        let backend = MemoryStore::new();
        backend.set("app", "{ nope");
        let store = ConfigStore::new();
        let sync = builder(&backend, &store).build().unwrap();

        assert!(matches!(sync.load().await, Err(ConfigError::ParseError { .. })));
        assert_eq!(sync.state(), SyncState::Failed);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_requires_loaded() {
        let store = ConfigStore::new();
        let sync = builder(&MemoryStore::new(), &store).build().unwrap();
        let err = sync.spawn(CancellationToken::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_spawn_twice_rejected() {
        let backend = MemoryStore::new();
        backend.set("app", "{}");
        let store = ConfigStore::new();
        let sync = builder(&backend, &store).build().unwrap();

        let handle = sync.start(CancellationToken::new()).await.unwrap();
        assert!(sync.spawn(CancellationToken::new()).is_err());
        assert!(sync.load().await.is_err());
        assert_eq!(handle.shutdown().await, SyncExit::Cancelled);
        assert_eq!(sync.state(), SyncState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spawn_starts_one_task() {
        let backend = MemoryStore::new();
        backend.set("app", "{}");
        let store = ConfigStore::new();
        let sync = builder(&backend, &store).build().unwrap();
        sync.load().await.unwrap();

        let barrier = Arc::new(std::sync::Barrier::new(8));
        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let sync = sync.clone();
                let barrier = Arc::clone(&barrier);
                tokio::task::spawn_blocking(move || {
                    barrier.wait();
                    sync.spawn(CancellationToken::new())
                })
            })
            .collect();

        let mut handles = Vec::new();
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(handle) => handles.push(handle),
                Err(e) => assert!(matches!(e, ConfigError::InvalidState { .. })),
            }
        }
        assert_eq!(handles.len(), 1);
        for handle in handles {
            assert_eq!(handle.shutdown().await, SyncExit::Cancelled);
        }
    }

    #[test]
    fn test_spawn_outside_runtime() {
        let backend = MemoryStore::new();
        let store = ConfigStore::new();
        let sync = builder(&backend, &store).build().unwrap();
        let err = sync.spawn(CancellationToken::new()).unwrap_err();
        assert!(err.to_string().contains("tokio runtime"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_display() {
        assert_eq!(SyncState::Reloading.to_string(), "reloading");
        let exit = SyncExit::GaveUp {
            attempts: 3,
            reason: "down".to_string(),
        };
        assert_eq!(exit.to_string(), "gave up after 3 attempts: down");
    }
}
