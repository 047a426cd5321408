// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example.
//!
//! This example demonstrates:
//! - Loading a YAML blob from a key-value store at startup
//! - Reading values through dotted paths with typed accessors
//! - Picking up a change published to the store
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

#[cfg(feature = "yaml")]
use remotecfg::prelude::*;

#[cfg(feature = "yaml")]
const INITIAL: &str = r#"
app:
  name: billing
  port: 8080
  tags: [payments, eu]
database:
  address: db.internal:3306
  maxOpenConns: 20
timeouts:
  request: 1.5s
  idle: 300
"#;

#[cfg(feature = "yaml")]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== remotecfg: Basic Usage Example ===\n");

    // Any store implementing ConfigSource + ConfigWatcher works here.
    let backend = MemoryStore::new();
    backend.set("services/billing", INITIAL);

    let config = ConfigStore::new();
    let sync = Synchronizer::builder()
        .key("services/billing")
        .backend(backend.clone())
        .store(config.clone())
        .build()?;
    let mut events = sync.subscribe();

    let handle = sync.start(CancellationToken::new()).await?;

    println!("app.name              = {}", config.get_string("app.name"));
    println!("app.port              = {}", config.get_uint32("app.port"));
    println!("app.tags              = {:?}", config.get_string_slice("app.tags"));
    println!("database.maxOpenConns = {}", config.get_int("database.maxOpenConns"));
    println!("timeouts.request      = {:?}", config.get_duration("timeouts.request"));
    println!("timeouts.idle         = {:?}", config.get_duration("timeouts.idle"));
    println!("missing.path          = {:?} (zero value)", config.get_string("missing.path"));

    println!("\nPublishing a new port...");
    backend.set("services/billing", INITIAL.replace("port: 8080", "port: 9090"));

    while let Ok(event) = events.recv().await {
        if event == SyncEvent::Applied {
            break;
        }
    }
    println!("app.port              = {}", config.get_uint32("app.port"));

    let exit = handle.shutdown().await;
    println!("\nSynchronizer exited: {}", exit);
    Ok(())
}

#[cfg(not(feature = "yaml"))]
fn main() {
    eprintln!("This example requires the 'yaml' feature.");
    eprintln!("Run with: cargo run --example basic_usage --features yaml");
}
