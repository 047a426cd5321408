// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns a serialized
//! configuration blob into a [`ConfigTree`].

use crate::domain::{ConfigTree, Result};

/// A trait for decoding configuration blobs.
///
/// Parsers must produce a tree with a string-keyed mapping at its root. Nested
/// mappings decoded with non-string keys have to be normalized to string keys
/// before the tree is built, since lookup only descends through string keys.
///
/// Parsing happens before a tree is installed, so a parser error never affects
/// the configuration readers currently see.
///
/// # Examples
///
/// ```rust
/// use remotecfg::domain::{ConfigTree, Mapping, RawValue, Result};
/// use remotecfg::ports::ConfigParser;
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &[u8]) -> Result<ConfigTree> {
///         let text = String::from_utf8_lossy(content);
///         let root: Mapping = text
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), RawValue::from(v.trim())))
///             .collect();
///         Ok(ConfigTree::from_mapping(root))
///     }
///
///     fn format_name(&self) -> &str {
///         "key-value"
///     }
/// }
///
/// let tree = KeyValueParser.parse(b"host = db1\nport = 5432").unwrap();
/// assert_eq!(tree.get("host"), Some(&RawValue::from("db1")));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Decodes `content` into a configuration tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`](crate::domain::ConfigError::ParseError)
    /// when the content is malformed or its root is not a mapping.
    fn parse(&self, content: &[u8]) -> Result<ConfigTree>;

    /// A short name of the format, used in log and error messages.
    fn format_name(&self) -> &str;
}
