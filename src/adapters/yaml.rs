// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML configuration parser.

use crate::domain::{ConfigError, ConfigTree, Mapping, RawValue, Result};
use crate::ports::ConfigParser;
use serde_yaml::Value;

/// Parser for YAML configuration blobs.
///
/// Mapping keys that are not strings are normalized: booleans and numbers use
/// their textual form, a null key becomes `""`, and sequence or mapping keys are
/// dropped. An empty document yields an empty tree.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::YamlParser;
/// use remotecfg::domain::{ConfigAccessor, RawValue};
/// use remotecfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let tree = parser.parse(b"database:\n  address: db:3306\n  maxOpenConns: 20").unwrap();
/// assert_eq!(tree.get_string("database.address"), "db:3306");
/// assert_eq!(tree.get("database.maxOpenConns"), Some(&RawValue::Int(20)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn convert(value: Value) -> RawValue {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    RawValue::UInt(u)
                } else {
                    RawValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => RawValue::String(s),
            Value::Sequence(seq) => RawValue::Sequence(seq.into_iter().map(Self::convert).collect()),
            Value::Mapping(map) => RawValue::Mapping(Self::convert_mapping(map)),
            Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn convert_mapping(map: serde_yaml::Mapping) -> Mapping {
        let mut result = Mapping::new();
        for (key, value) in map {
            match Self::normalize_key(key) {
                Some(key) => {
                    if result.contains_key(&key) {
                        tracing::debug!(key = %key, "YAML keys collide after normalization, keeping the later entry");
                    }
                    result.insert(key, Self::convert(value));
                }
                None => tracing::debug!("Dropping YAML entry with a non-scalar key"),
            }
        }
        result
    }

    fn normalize_key(key: Value) -> Option<String> {
        match key {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => Some(String::new()),
            Value::Tagged(tagged) => Self::normalize_key(tagged.value),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &[u8]) -> Result<ConfigTree> {
        let value: Value = serde_yaml::from_slice(content).map_err(|e| ConfigError::parse("YAML", e))?;

        match Self::convert(value) {
            RawValue::Mapping(root) => Ok(ConfigTree::from_mapping(root)),
            RawValue::Null => Ok(ConfigTree::empty()),
            other => Err(ConfigError::ParseError {
                message: format!("YAML root must be a mapping, found a {}", other.kind()),
                source: None,
            }),
        }
    }

    fn format_name(&self) -> &str {
        "yaml"
    }
}
