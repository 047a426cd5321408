// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed access example.
//!
//! This example demonstrates:
//! - Lenient accessors that fall back to zero values
//! - `lookup` for telling a missing value from a mismatched one
//! - Settings structs built from well-known sections
//! - The return code envelope and registry
//!
//! To run this example:
//! ```bash
//! cargo run --example typed_access
//! ```

use remotecfg::domain::{codes, ReturnCode, ReturnCodeRegistry};
use remotecfg::prelude::*;
use remotecfg::settings::{DatabaseSettings, RedisSentinelSettings};

const CONFIG: &str = r#"{
    "database": {
        "username": "billing", "password": "s3cret", "address": "db:3306",
        "database": "billing", "dialect": "mysql", "maxIdleConns": "4", "maxOpenConns": 32
    },
    "redis": {"sentinel": {"masterName": "main", "addrs": "s1:26379 s2:26379", "db": 0}},
    "feature": {"launch": "2024-06-01", "enabled": "T", "ratio": "0.25"},
    "headers": "{\"x-team\": \"payments\"}"
}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== remotecfg: Typed Access Example ===\n");

    let config = ConfigStore::from_tree(JsonParser::new().parse(CONFIG.as_bytes())?);

    println!("feature.enabled = {}", config.get_bool("feature.enabled"));
    println!("feature.ratio   = {}", config.get_float64("feature.ratio"));
    println!("feature.launch  = {}", config.get_time("feature.launch"));
    println!("headers         = {:?}", config.get_string_map_string("headers"));

    println!("\n=== Absent vs. mismatched ===");
    for path in ["database.maxOpenConns", "database.dialect", "database.missing"] {
        println!(
            "{:<24} get_int = {:<4} lookup = {:?}",
            path,
            config.get_int(path),
            config.lookup::<i64>(path)
        );
    }

    println!("\n=== Settings ===");
    let database = DatabaseSettings::from_config(&config);
    println!("{:?}", database);
    println!("connecting to {}", database.redacted());
    println!("{:?}", RedisSentinelSettings::from_config(&config));

    println!("\n=== Return codes ===");
    let registry = ReturnCodeRegistry::builder_with_standard()
        .register(700, "err: quota exceeded")
        .build()?;
    for code in registry.iter() {
        println!("{:>4} {}", code.code(), code.message());
    }

    let ok = ReturnCode::success(RawValue::from("done"));
    println!("\n{}", ok.to_json()?);
    let failed = ReturnCode::of(codes::ARGUMENTS, "err: arguments").with_message("page must be positive");
    println!("{} (HTTP-ish status {})", failed.to_json()?, failed.status_code());

    Ok(())
}
