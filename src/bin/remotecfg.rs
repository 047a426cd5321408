// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator CLI: read, dump and follow a configuration blob in an external store.

use clap::{Parser, Subcommand, ValueEnum};
use remotecfg::adapters::{self, FileSource};
use remotecfg::domain::{ConfigError, ConfigTree, Result};
use remotecfg::ports::{ConfigParser, ConfigSource, ConfigWatcher};
use remotecfg::service::{ConfigStore, RetryPolicy, SyncEvent, Synchronizer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "remotecfg")]
#[command(about = "Inspect configuration stored in a key-value store", long_about = None)]
struct Cli {
    /// Store holding the configuration blob
    #[arg(short, long, value_enum, env = "REMOTECFG_BACKEND", default_value = "file")]
    backend: Backend,

    /// Directory for `file`, endpoint or URL for `etcd` and `redis`
    #[arg(short, long, env = "REMOTECFG_ENDPOINT", default_value = ".")]
    endpoint: String,

    /// Key of the configuration blob
    #[arg(short, long, env = "REMOTECFG_KEY")]
    key: String,

    /// Blob format (yaml or json)
    #[arg(short, long, default_value = "yaml")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    File,
    Etcd,
    Redis,
}

#[cfg(any(not(feature = "etcd"), not(feature = "redis"), not(feature = "reload")))]
fn not_built(feature: &str) -> ConfigError {
    ConfigError::InvalidState {
        message: format!("this binary was built without the `{}` feature", feature),
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a dotted path
    Get {
        /// Dotted path, e.g. `database.address`
        path: String,
    },
    /// Print the whole tree as JSON
    Dump,
    /// Follow changes until interrupted
    Watch {
        /// Print only this path after each change
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let parser = adapters::parser_for(&cli.format).ok_or_else(|| ConfigError::InvalidState {
        message: format!("unsupported format '{}'", cli.format),
    })?;

    match &cli.command {
        Commands::Get { path } => {
            let tree = fetch_tree(&cli, parser.as_ref()).await?;
            match tree.get(path) {
                Some(value) => println!("{}", value),
                None => {
                    eprintln!("{}: not found", path);
                    std::process::exit(1);
                }
            }
        }
        Commands::Dump => {
            let tree = fetch_tree(&cli, parser.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(tree.root_value())?);
        }
        Commands::Watch { path } => watch(&cli, parser, path.as_deref()).await?,
    }

    Ok(())
}

async fn fetch_tree(cli: &Cli, parser: &dyn ConfigParser) -> Result<ConfigTree> {
    let source = open_source(cli).await?;
    let bytes = source
        .fetch(&cli.key)
        .await?
        .ok_or_else(|| ConfigError::KeyNotFound {
            key: cli.key.clone(),
        })?;
    parser.parse(&bytes)
}

async fn watch(cli: &Cli, parser: Arc<dyn ConfigParser>, path: Option<&str>) -> Result<()> {
    let store = ConfigStore::new();
    let synchronizer = Synchronizer::builder()
        .key(&cli.key)
        .shared_source(open_source(cli).await?)
        .shared_watcher(open_watcher(cli).await?)
        .shared_parser(parser)
        .store(store.clone())
        .retry(RetryPolicy::default())
        .build()?;

    let mut events = synchronizer.subscribe();
    let cancel = CancellationToken::new();
    let handle = synchronizer.start(cancel.clone()).await?;
    print_current(&store, path);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SyncEvent::Applied) => print_current(&store, path),
                Ok(SyncEvent::Exited(exit)) => {
                    eprintln!("watch ended: {}", exit);
                    return Ok(());
                }
                Ok(other) => eprintln!("{:?}", other),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    eprintln!("missed {} events", skipped);
                    print_current(&store, path);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    let exit = handle.shutdown().await;
    eprintln!("watch ended: {}", exit);
    Ok(())
}

fn print_current(store: &ConfigStore, path: Option<&str>) {
    match path {
        Some(path) => match store.get(path) {
            Some(value) => println!("{} = {}", path, value),
            None => println!("{} is not set", path),
        },
        None => match serde_json::to_string_pretty(store.snapshot().root_value()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("cannot render configuration: {}", e),
        },
    }
}

async fn open_source(cli: &Cli) -> Result<Arc<dyn ConfigSource>> {
    let source: Arc<dyn ConfigSource> = match cli.backend {
        Backend::File => Arc::new(FileSource::new(&cli.endpoint)),
        #[cfg(feature = "etcd")]
        Backend::Etcd => Arc::new(adapters::EtcdSource::connect(vec![cli.endpoint.as_str()], None).await?),
        #[cfg(not(feature = "etcd"))]
        Backend::Etcd => return Err(not_built("etcd")),
        #[cfg(feature = "redis")]
        Backend::Redis => Arc::new(adapters::RedisSource::open(&cli.endpoint, "")?),
        #[cfg(not(feature = "redis"))]
        Backend::Redis => return Err(not_built("redis")),
    };
    Ok(source)
}

async fn open_watcher(cli: &Cli) -> Result<Arc<dyn ConfigWatcher>> {
    match cli.backend {
        #[cfg(feature = "reload")]
        Backend::File => Ok(Arc::new(adapters::FileWatcher::new(&cli.endpoint, None))),
        #[cfg(not(feature = "reload"))]
        Backend::File => Err(not_built("reload")),
        #[cfg(feature = "etcd")]
        Backend::Etcd => Ok(Arc::new(
            adapters::EtcdWatcher::connect(vec![cli.endpoint.as_str()], None).await?,
        )),
        #[cfg(feature = "redis")]
        Backend::Redis => {
            let watcher = adapters::RedisWatcher::open(&cli.endpoint, "")?;
            if let Err(e) = watcher.try_enable_keyspace_notifications().await {
                tracing::warn!(error = %e, "Could not enable keyspace notifications");
            }
            Ok(Arc::new(watcher))
        }
        #[cfg(not(feature = "etcd"))]
        Backend::Etcd => Err(not_built("etcd")),
        #[cfg(not(feature = "redis"))]
        Backend::Redis => Err(not_built("redis")),
    }
}
