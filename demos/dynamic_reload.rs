// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamic configuration reload example.
//!
//! This example demonstrates:
//! - Watching a configuration file for changes
//! - Swapping in the new tree when a valid update lands
//! - Keeping the previous tree when an update is malformed
//!
//! To run this example:
//! ```bash
//! cargo run --example dynamic_reload --features yaml,reload
//! ```

#[cfg(all(feature = "reload", feature = "yaml"))]
use remotecfg::adapters::FileWatcher;
#[cfg(all(feature = "reload", feature = "yaml"))]
use remotecfg::prelude::*;
#[cfg(all(feature = "reload", feature = "yaml"))]
use std::time::Duration;

#[cfg(all(feature = "reload", feature = "yaml"))]
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== remotecfg: Dynamic Reload Example ===\n");

    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("app.yaml");
    std::fs::write(&path, "app:\n  name: InitialApp\n  port: 8080\n")?;
    println!("Watching {}", path.display());

    let config = ConfigStore::new();
    let sync = Synchronizer::builder()
        .key("app.yaml")
        .source(FileSource::new(dir.path()))
        .watcher(FileWatcher::new(dir.path(), Some(Duration::from_millis(200))))
        .store(config.clone())
        .build()?;
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await?;
    print_values(&config);

    let updates = [
        "app:\n  name: UpdatedApp\n  port: 9000\n",
        "app: [unclosed\n",
        "app:\n  name: FinalApp\n  port: 9100\n",
    ];

    for update in updates {
        // Give the watcher time to settle between writes.
        tokio::time::sleep(Duration::from_millis(500)).await;
        println!("\nWriting:\n{}", update);
        std::fs::write(&path, update)?;

        loop {
            match tokio::time::timeout(Duration::from_secs(5), events.recv()).await {
                Ok(Ok(SyncEvent::Applied)) => {
                    println!("Applied update");
                    break;
                }
                Ok(Ok(SyncEvent::Rejected { reason })) => {
                    println!("Rejected update: {}", reason);
                    break;
                }
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    println!("No change observed");
                    break;
                }
            }
        }
        print_values(&config);
    }

    println!("\nSynchronizer exited: {}", handle.shutdown().await);
    Ok(())
}

#[cfg(all(feature = "reload", feature = "yaml"))]
fn print_values(config: &ConfigStore) {
    println!(
        "  app.name = {}, app.port = {}",
        config.get_string("app.name"),
        config.get_int("app.port")
    );
}

#[cfg(not(all(feature = "reload", feature = "yaml")))]
fn main() {
    eprintln!("This example requires the 'reload' and 'yaml' features.");
    eprintln!("Run with: cargo run --example dynamic_reload --features yaml,reload");
}
