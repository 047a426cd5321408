// SPDX-License-Identifier: MIT OR Apache-2.0

//! Untyped configuration values.
//!
//! This module provides the `RawValue` type, a tagged variant holding whatever a
//! configuration blob decoded to. Typed views over it live in
//! [`coerce`](crate::domain::coerce).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A string-keyed mapping of raw values.
pub type Mapping = BTreeMap<String, RawValue>;

/// An untyped node of a parsed configuration tree.
///
/// Values are immutable once a tree has been built; updates always build a new
/// tree. `UInt` only ever holds integers that do not fit in an `i64`.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::RawValue;
///
/// let value = RawValue::from(vec![RawValue::from("a"), RawValue::from(1)]);
/// assert_eq!(value.to_string(), "[a, 1]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// An explicit null or an empty value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer above `i64::MAX`.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<RawValue>),
    /// A nested mapping with string keys.
    Mapping(Mapping),
}

impl RawValue {
    /// Returns `true` for [`RawValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns the nested mapping, if this value is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            RawValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string slice, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence, if this value is one.
    pub fn as_sequence(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// A short name for the variant, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) | RawValue::UInt(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::Sequence(_) => "sequence",
            RawValue::Mapping(_) => "mapping",
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Int(i64::from(n))
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<u64> for RawValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => RawValue::Int(n),
            Err(_) => RawValue::UInt(n),
        }
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(seq: Vec<RawValue>) -> Self {
        RawValue::Sequence(seq)
    }
}

impl From<Mapping> for RawValue {
    fn from(map: Mapping) -> Self {
        RawValue::Mapping(map)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => Ok(()),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::UInt(n) => write!(f, "{}", n),
            RawValue::Float(n) => write!(f, "{}", n),
            RawValue::String(s) => f.write_str(s),
            RawValue::Sequence(seq) => {
                f.write_str("[")?;
                for (i, item) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            RawValue::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                f.write_str("}")
            }
        }
    }
}
