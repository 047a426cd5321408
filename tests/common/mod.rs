// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helper utilities shared by the integration tests.
//!
//! Docker checks for the container-backed tests, polling helpers, and mock
//! implementations of the ports for driving the synchronizer into failure
//! paths that real stores only reach by accident.

#![allow(dead_code)]

pub mod mocks;

use remotecfg::adapters::MemoryStore;
use remotecfg::service::SyncEvent;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::broadcast;

/// How long any single wait in these tests may take.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Cached result of Docker availability check.
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\nSKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.\n");
}

/// Polls `condition` until it holds, panicking after [`TEST_TIMEOUT`].
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {}", what);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Waits until `store` has exactly `count` active subscriptions.
pub async fn wait_for_watchers(store: &MemoryStore, count: usize) {
    wait_until(&format!("{} watcher(s)", count), || store.watcher_count() == count).await;
}

/// Receives events until one matches `predicate` and returns it.
pub async fn wait_for_event(
    events: &mut broadcast::Receiver<SyncEvent>,
    predicate: impl Fn(&SyncEvent) -> bool,
) -> SyncEvent {
    let search = async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    };
    tokio::time::timeout(TEST_TIMEOUT, search)
        .await
        .expect("timed out waiting for synchronizer event")
}
