// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed settings read from the configuration tree.
//!
//! These structs are thin consumers of [`ConfigAccessor`](crate::domain::ConfigAccessor):
//! they pull a fixed set of paths once and hand plain values to whatever
//! constructs the actual connection. Missing values take their zero value.

pub mod database;
pub mod redis;

pub use database::DatabaseSettings;
pub use redis::RedisSentinelSettings;
