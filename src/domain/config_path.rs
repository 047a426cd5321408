// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted configuration path newtype.
//!
//! A `ConfigPath` addresses a location inside a configuration tree, e.g.
//! `"database.maxOpenConns"`. Segments are matched case-sensitively and exactly
//! as stored.

use std::fmt;

/// The separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// A dotted address into a [`ConfigTree`](crate::domain::ConfigTree).
///
/// # Examples
///
/// ```
/// use remotecfg::domain::ConfigPath;
///
/// let path = ConfigPath::from("redis.sentinel.addrs");
/// assert_eq!(path.segments().collect::<Vec<_>>(), vec!["redis", "sentinel", "addrs"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigPath(String);

impl ConfigPath {
    /// Creates a new `ConfigPath` from a `String`.
    pub fn new(path: String) -> Self {
        ConfigPath(path)
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the path has no segments at all.
    ///
    /// Looking up an empty path yields the whole root mapping.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the path into its segments.
    ///
    /// An empty path has zero segments. Empty segments produced by doubled or
    /// trailing separators are kept, since they can only match an empty key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let source = if self.0.is_empty() { None } else { Some(&self.0) };
        source
            .into_iter()
            .flat_map(|s| s.split(PATH_SEPARATOR))
    }

    /// Appends a child segment, returning the longer path.
    ///
    /// # Examples
    ///
    /// ```
    /// use remotecfg::domain::ConfigPath;
    ///
    /// let path = ConfigPath::from("database").join("address");
    /// assert_eq!(path.as_str(), "database.address");
    /// ```
    pub fn join(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            ConfigPath(segment.to_string())
        } else {
            ConfigPath(format!("{}{}{}", self.0, PATH_SEPARATOR, segment))
        }
    }

    /// Converts the `ConfigPath` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigPath {
    fn from(s: String) -> Self {
        ConfigPath(s)
    }
}

impl From<&str> for ConfigPath {
    fn from(s: &str) -> Self {
        ConfigPath(s.to_string())
    }
}

impl From<ConfigPath> for String {
    fn from(path: ConfigPath) -> Self {
        path.0
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
