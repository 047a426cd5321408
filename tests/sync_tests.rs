// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the synchronizer lifecycle: initial load, hot reload,
//! supervision and restart.

mod common;

use common::mocks::{FlakyWatcher, PanickingWatcher, PanickyParser, UnreachableSource};
use common::{wait_for_event, wait_for_watchers, wait_until};
use remotecfg::adapters::{JsonParser, MemoryStore};
use remotecfg::domain::{ConfigAccessor, ConfigError};
use remotecfg::service::{
    ConfigStore, RetryPolicy, SyncEvent, SyncExit, SyncState, Synchronizer,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const KEY: &str = "services/billing";

fn fast_retry() -> RetryPolicy {
    RetryPolicy::default()
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(10))
}

fn memory_sync(backend: &MemoryStore, store: &ConfigStore) -> Synchronizer {
    Synchronizer::builder()
        .key(KEY)
        .backend(backend.clone())
        .parser(JsonParser::new())
        .store(store.clone())
        .retry(fast_retry())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_start_installs_initial_configuration() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"database": {"address": "db:3306", "maxOpenConns": 20}}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();

    assert_eq!(events.recv().await.unwrap(), SyncEvent::Loaded);
    assert_eq!(handle.state(), SyncState::Watching);
    assert_eq!(store.get_string("database.address"), "db:3306");
    assert_eq!(store.get_int("database.maxOpenConns"), 20);

    assert_eq!(handle.shutdown().await, SyncExit::Cancelled);
}

#[tokio::test]
async fn test_valid_update_replaces_tree() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"workers": 1}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    backend.set(KEY, r#"{"workers": 8, "mode": "batch"}"#);
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;

    assert_eq!(store.get_int("workers"), 8);
    assert_eq!(store.get_string("mode"), "batch");
    assert_eq!(handle.state(), SyncState::Watching);
    handle.shutdown().await;
}

#[tokio::test]
async fn test_malformed_update_keeps_previous_tree() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"workers": 1}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;
    let before = store.snapshot();

    backend.set(KEY, "{ this is not json");
    let rejected = wait_for_event(&mut events, |e| matches!(e, SyncEvent::Rejected { .. })).await;
    if let SyncEvent::Rejected { reason } = rejected {
        assert!(reason.contains("JSON"), "unexpected reason: {}", reason);
    }
    assert_eq!(*store.snapshot(), *before);
    assert_eq!(store.get_int("workers"), 1);

    backend.set(KEY, r#"{"workers": 2}"#);
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("workers"), 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_deleted_key_is_ignored() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"workers": 3}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    assert!(backend.delete(KEY));
    wait_for_event(&mut events, |e| matches!(e, SyncEvent::Ignored { .. })).await;
    assert_eq!(store.get_int("workers"), 3);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_cancellation_stops_task() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let cancel = CancellationToken::new();
    let handle = sync.start(cancel.clone()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    cancel.cancel();
    let exited = wait_for_event(&mut events, |e| matches!(e, SyncEvent::Exited(_))).await;
    assert_eq!(exited, SyncEvent::Exited(SyncExit::Cancelled));
    assert_eq!(handle.join().await, SyncExit::Cancelled);
    assert_eq!(sync.state(), SyncState::Stopped);
    assert_eq!(backend.watcher_count(), 0);
}

#[tokio::test]
async fn test_lost_subscription_is_restarted() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"version": 1}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    backend.disconnect_watchers();
    let lost = wait_for_event(&mut events, |e| matches!(e, SyncEvent::SubscriptionLost { .. })).await;
    match lost {
        SyncEvent::SubscriptionLost { attempt, reason, .. } => {
            assert_eq!(attempt, 1);
            assert!(reason.contains("disconnected"));
        }
        other => panic!("unexpected event {:?}", other),
    }

    wait_for_watchers(&backend, 1).await;
    backend.set(KEY, r#"{"version": 2}"#);
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("version"), 2);
    assert!(!handle.is_finished());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_change_during_backoff_is_applied_on_restart() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"version": 1}"#);
    let store = ConfigStore::new();
    let sync = Synchronizer::builder()
        .key(KEY)
        .backend(backend.clone())
        .parser(JsonParser::new())
        .store(store.clone())
        .retry(RetryPolicy::default().with_base_delay(Duration::from_millis(300)))
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    backend.disconnect_watchers();
    wait_for_event(&mut events, |e| matches!(e, SyncEvent::SubscriptionLost { .. })).await;
    assert_eq!(backend.watcher_count(), 0);
    backend.set(KEY, r#"{"version": 2}"#);

    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("version"), 2);
    assert_eq!(handle.state(), SyncState::Watching);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_change_between_load_and_spawn_is_applied() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"version": 1}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    sync.load().await.unwrap();
    assert_eq!(store.get_int("version"), 1);
    backend.set(KEY, r#"{"version": 2}"#);

    let handle = sync.spawn(CancellationToken::new()).unwrap();
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("version"), 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_unchanged_value_is_not_reapplied_on_restart() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"version": 1}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    backend.disconnect_watchers();
    wait_for_event(&mut events, |e| matches!(e, SyncEvent::SubscriptionLost { .. })).await;
    wait_for_watchers(&backend, 1).await;

    // The store is re-read before subscribing, so it is done by now.
    while let Ok(event) = events.try_recv() {
        assert!(
            !matches!(event, SyncEvent::Applied | SyncEvent::Ignored { .. } | SyncEvent::Rejected { .. }),
            "unexpected event {:?}",
            event
        );
    }

    backend.set(KEY, r#"{"version": 2}"#);
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("version"), 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_flaky_watcher_recovers() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let watcher = FlakyWatcher::new(2);
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(backend)
        .watcher(watcher.clone())
        .parser(JsonParser::new())
        .store(ConfigStore::new())
        .retry(fast_retry().with_max_attempts(5))
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    for expected in 1..=2 {
        let lost = wait_for_event(&mut events, |e| matches!(e, SyncEvent::SubscriptionLost { .. })).await;
        assert!(matches!(lost, SyncEvent::SubscriptionLost { attempt, .. } if attempt == expected));
    }

    wait_until("third subscription", || watcher.subscriptions() == 3).await;
    assert!(!handle.is_finished());
    assert_eq!(handle.shutdown().await, SyncExit::Cancelled);
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let watcher = FlakyWatcher::always_failing();
    let store = ConfigStore::new();
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(backend)
        .watcher(watcher.clone())
        .parser(JsonParser::new())
        .store(store.clone())
        .retry(fast_retry().with_max_attempts(2))
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    let exit = handle.join().await;

    match &exit {
        SyncExit::GaveUp { attempts, reason } => {
            assert_eq!(*attempts, 3);
            assert!(reason.contains("connection refused"));
        }
        other => panic!("unexpected exit {:?}", other),
    }
    assert_eq!(watcher.subscriptions(), 3);
    assert_eq!(sync.state(), SyncState::Failed);
    wait_for_event(&mut events, |e| *e == SyncEvent::Exited(exit.clone())).await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_never_policy_gives_up_on_first_loss() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(backend)
        .watcher(FlakyWatcher::always_failing())
        .parser(JsonParser::new())
        .store(ConfigStore::new())
        .retry(RetryPolicy::never())
        .build()
        .unwrap();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    assert!(matches!(handle.join().await, SyncExit::GaveUp { attempts: 1, .. }));
}

#[tokio::test]
async fn test_cancel_during_backoff() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(backend)
        .watcher(FlakyWatcher::always_failing())
        .parser(JsonParser::new())
        .store(ConfigStore::new())
        .retry(RetryPolicy::default().with_base_delay(Duration::from_secs(60)))
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_event(&mut events, |e| matches!(e, SyncEvent::SubscriptionLost { .. })).await;

    let exit = tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .expect("shutdown waited out the backoff");
    assert_eq!(exit, SyncExit::Cancelled);
}

#[tokio::test]
async fn test_handler_panic_is_reported_and_survived() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"workers": 1}"#);
    let store = ConfigStore::new();
    let sync = Synchronizer::builder()
        .key(KEY)
        .backend(backend.clone())
        .parser(PanickyParser::default())
        .store(store.clone())
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    backend.set(KEY, "panic");
    let panicked =
        wait_for_event(&mut events, |e| matches!(e, SyncEvent::HandlerPanicked { .. })).await;
    assert_eq!(
        panicked,
        SyncEvent::HandlerPanicked {
            reason: "parser exploded".to_string()
        }
    );
    assert_eq!(store.get_int("workers"), 1);
    assert_eq!(handle.state(), SyncState::Watching);

    backend.set(KEY, r#"{"workers": 2}"#);
    wait_for_event(&mut events, |e| *e == SyncEvent::Applied).await;
    assert_eq!(store.get_int("workers"), 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_watcher_panic_is_reported() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(backend)
        .watcher(PanickingWatcher)
        .parser(JsonParser::new())
        .store(ConfigStore::new())
        .build()
        .unwrap();
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    let exit = handle.join().await;

    assert_eq!(
        exit,
        SyncExit::Panicked {
            reason: "watcher exploded".to_string()
        }
    );
    assert_eq!(sync.state(), SyncState::Failed);
    wait_for_event(&mut events, |e| matches!(e, SyncEvent::Exited(SyncExit::Panicked { .. }))).await;
}

#[tokio::test]
async fn test_unreachable_store_fails_startup() {
    let sync = Synchronizer::builder()
        .key(KEY)
        .source(UnreachableSource)
        .watcher(FlakyWatcher::new(0))
        .store(ConfigStore::new())
        .build()
        .unwrap();

    let err = sync.start(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ConfigError::SourceError { .. }));
    assert_eq!(sync.state(), SyncState::Failed);
}

#[tokio::test]
async fn test_missing_key_fails_startup() {
    let sync = memory_sync(&MemoryStore::new(), &ConfigStore::new());
    let err = sync.start(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ConfigError::KeyNotFound { ref key } if key == KEY));
}

#[tokio::test]
async fn test_state_receiver_observes_transitions() {
    let backend = MemoryStore::new();
    backend.set(KEY, "{}");
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);
    let mut states = sync.state_receiver();
    assert_eq!(*states.borrow_and_update(), SyncState::Uninitialized);

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    states.changed().await.unwrap();
    assert_ne!(*states.borrow(), SyncState::Uninitialized);

    handle.shutdown().await;
    let mut final_states = sync.state_receiver();
    wait_until("stopped state", || *final_states.borrow_and_update() == SyncState::Stopped).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_whole_snapshots_during_reloads() {
    let backend = MemoryStore::new();
    backend.set(KEY, r#"{"pair": {"a": 0, "b": 0}}"#);
    let store = ConfigStore::new();
    let sync = memory_sync(&backend, &store);

    let handle = sync.start(CancellationToken::new()).await.unwrap();
    wait_for_watchers(&backend, 1).await;

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let store = store.clone();
            tokio::task::spawn_blocking(move || {
                for _ in 0..5_000 {
                    let snapshot = store.snapshot();
                    assert_eq!(snapshot.get_int64("pair.a"), snapshot.get_int64("pair.b"));
                }
            })
        })
        .collect();

    for i in 1..=50 {
        backend.set(KEY, format!(r#"{{"pair": {{"a": {i}, "b": {i}}}}}"#));
    }
    for reader in readers {
        reader.await.unwrap();
    }

    wait_until("last update", || store.get_int64("pair.a") == 50).await;
    handle.shutdown().await;
}
