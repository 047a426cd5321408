// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis Sentinel settings under `redis.sentinel.*`.

use crate::domain::ConfigAccessor;
use std::fmt;

/// Failover client settings for a Sentinel-managed Redis deployment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RedisSentinelSettings {
    /// `redis.sentinel.masterName`
    pub master_name: String,
    /// `redis.sentinel.addrs`, a list or a whitespace separated string
    pub sentinel_addrs: Vec<String>,
    /// `redis.sentinel.password`
    pub password: String,
    /// `redis.sentinel.db`
    pub db: i64,
    /// `redis.sentinel.poolSize`
    pub pool_size: usize,
}

impl RedisSentinelSettings {
    /// Reads the `redis.sentinel.*` paths.
    pub fn from_config(config: &impl ConfigAccessor) -> Self {
        let settings = Self {
            master_name: config.get_string("redis.sentinel.masterName"),
            sentinel_addrs: config.get_string_slice("redis.sentinel.addrs"),
            password: config.get_string("redis.sentinel.password"),
            db: config.get_int64("redis.sentinel.db"),
            pool_size: config.get_uint("redis.sentinel.poolSize"),
        };

        tracing::info!(
            master = %settings.master_name,
            sentinels = settings.sentinel_addrs.len(),
            db = settings.db,
            "Read redis sentinel settings"
        );
        settings
    }
}

impl fmt::Debug for RedisSentinelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSentinelSettings")
            .field("master_name", &self.master_name)
            .field("sentinel_addrs", &self.sentinel_addrs)
            .field("password", &"***")
            .field("db", &self.db)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}
