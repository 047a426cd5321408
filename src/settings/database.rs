// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relational database connection settings under `database.*`.

use crate::domain::ConfigAccessor;
use std::fmt;

/// Connection settings for a MySQL-style database.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::ConfigTree;
/// use remotecfg::ports::ConfigParser;
/// use remotecfg::adapters::JsonParser;
/// use remotecfg::settings::DatabaseSettings;
///
/// let tree = JsonParser::new()
///     .parse(br#"{"database": {"username": "app", "password": "s3cret",
///         "address": "db:3306", "database": "orders", "maxOpenConns": 20}}"#)
///     .unwrap();
///
/// let settings = DatabaseSettings::from_config(&tree);
/// assert_eq!(settings.max_open_conns, 20);
/// assert_eq!(settings.redacted(), "***:***@tcp(db:3306)/orders");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// `database.username`
    pub username: String,
    /// `database.password`
    pub password: String,
    /// `database.address`, `host:port`
    pub address: String,
    /// `database.database`
    pub database: String,
    /// `database.dialect`, e.g. `mysql`
    pub dialect: String,
    /// `database.maxIdleConns`
    pub max_idle_conns: usize,
    /// `database.maxOpenConns`
    pub max_open_conns: usize,
    /// `database.logmode`
    pub log_mode: bool,
}

impl DatabaseSettings {
    /// Reads the `database.*` paths.
    pub fn from_config(config: &impl ConfigAccessor) -> Self {
        let settings = Self {
            username: config.get_string("database.username"),
            password: config.get_string("database.password"),
            address: config.get_string("database.address"),
            database: config.get_string("database.database"),
            dialect: config.get_string("database.dialect"),
            max_idle_conns: config.get_uint("database.maxIdleConns"),
            max_open_conns: config.get_uint("database.maxOpenConns"),
            log_mode: config.get_bool("database.logmode"),
        };

        tracing::info!(
            database = %settings.redacted(),
            max_idle_conns = settings.max_idle_conns,
            max_open_conns = settings.max_open_conns,
            "Read database settings"
        );
        settings
    }

    /// The driver connection string, password included.
    pub fn dsn(&self) -> String {
        format!(
            "{}:{}@tcp({})/{}?charset=utf8&parseTime=True&loc=Local",
            self.username, self.password, self.address, self.database
        )
    }

    /// A loggable form of the connection target with credentials masked.
    pub fn redacted(&self) -> String {
        format!("***:***@tcp({})/{}", self.address, self.database)
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("username", &self.username)
            .field("password", &"***")
            .field("address", &self.address)
            .field("database", &self.database)
            .field("dialect", &self.dialect)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_open_conns", &self.max_open_conns)
            .field("log_mode", &self.log_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonParser;
    use crate::domain::ConfigTree;
    use crate::ports::ConfigParser;

    fn tree(json: &str) -> ConfigTree {
        JsonParser::new().parse(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_config() {
        let config = tree(
            r#"{"database": {
                "username": "app", "password": "pw", "address": "10.0.0.5:3306",
                "database": "orders", "dialect": "mysql",
                "maxIdleConns": "5", "maxOpenConns": 50, "logmode": "true"
            }}"#,
        );

        let settings = DatabaseSettings::from_config(&config);
        assert_eq!(settings.username, "app");
        assert_eq!(settings.dialect, "mysql");
        assert_eq!(settings.max_idle_conns, 5);
        assert_eq!(settings.max_open_conns, 50);
        assert!(settings.log_mode);
        assert_eq!(
            settings.dsn(),
            "app:pw@tcp(10.0.0.5:3306)/orders?charset=utf8&parseTime=True&loc=Local"
        );
    }

    #[test]
    fn test_missing_section_uses_zero_values() {
        let settings = DatabaseSettings::from_config(&ConfigTree::empty());
        assert_eq!(settings, DatabaseSettings::default());
        assert_eq!(settings.redacted(), "***:***@tcp()/");
    }

    #[test]
    fn test_debug_hides_password() {
        let settings = DatabaseSettings {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
