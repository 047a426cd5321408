// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON configuration parser.

use crate::domain::{ConfigError, ConfigTree, RawValue, Result};
use crate::ports::ConfigParser;
use serde_json::Value;

/// Parser for JSON configuration blobs. The root must be an object.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::JsonParser;
/// use remotecfg::domain::ConfigAccessor;
/// use remotecfg::ports::ConfigParser;
///
/// let tree = JsonParser::new().parse(br#"{"redis": {"sentinel": {"db": 2}}}"#).unwrap();
/// assert_eq!(tree.get_int("redis.sentinel.db"), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
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
            Value::Array(items) => RawValue::Sequence(items.into_iter().map(Self::convert).collect()),
            Value::Object(map) => RawValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::convert(value)))
                    .collect(),
            ),
        }
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &[u8]) -> Result<ConfigTree> {
        let value: Value = serde_json::from_slice(content).map_err(|e| ConfigError::parse("JSON", e))?;

        match Self::convert(value) {
            RawValue::Mapping(root) => Ok(ConfigTree::from_mapping(root)),
            other => Err(ConfigError::ParseError {
                message: format!("JSON root must be an object, found a {}", other.kind()),
                source: None,
            }),
        }
    }

    fn format_name(&self) -> &str {
        "json"
    }
}
