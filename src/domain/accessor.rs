// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed accessors over dotted configuration paths.
//!
//! The `get_*` methods never fail. A missing path and a value that cannot be
//! converted both give the zero value of the requested type. Use
//! [`ConfigAccessor::lookup`] when the two cases need to be told apart.

use crate::domain::coerce::{coerce, try_coerce, FromRawValue};
use crate::domain::raw_value::{Mapping, RawValue};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Read access to a configuration tree by dotted path.
///
/// Implementors only supply [`with_value`](ConfigAccessor::with_value); every
/// typed getter is derived from it.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::{ConfigAccessor, ConfigTree, Mapping, RawValue};
///
/// let tree = ConfigTree::from_mapping(Mapping::from([
///     ("port".to_string(), RawValue::from("8080")),
/// ]));
///
/// assert_eq!(tree.get_int("port"), 8080);
/// assert_eq!(tree.get_string("missing"), "");
/// assert_eq!(tree.lookup::<u16>("missing"), None);
/// ```
pub trait ConfigAccessor {
    /// Resolves `path` and hands the value, if any, to `f`.
    fn with_value<R, F>(&self, path: &str, f: F) -> R
    where
        F: FnOnce(Option<&RawValue>) -> R;

    /// Returns a copy of the raw value at `path`.
    fn get_raw(&self, path: &str) -> Option<RawValue> {
        self.with_value(path, |value| value.cloned())
    }

    /// Returns `true` if `path` resolves to a value, including null.
    fn has(&self, path: &str) -> bool {
        self.with_value(path, |value| value.is_some())
    }

    /// Converts the value at `path`, or returns `None` if it is absent or
    /// cannot be converted.
    fn lookup<T: FromRawValue>(&self, path: &str) -> Option<T> {
        self.with_value(path, try_coerce)
    }

    /// Converts the value at `path`, falling back to `T::default()`.
    fn get_as<T: FromRawValue + Default>(&self, path: &str) -> T {
        self.with_value(path, coerce)
    }

    /// Returns the value as a string.
    fn get_string(&self, path: &str) -> String {
        self.get_as(path)
    }

    /// Returns the value as a boolean.
    fn get_bool(&self, path: &str) -> bool {
        self.get_as(path)
    }

    /// Returns the value as a platform-width signed integer.
    fn get_int(&self, path: &str) -> isize {
        self.get_as(path)
    }

    /// Returns the value as an `i32`.
    fn get_int32(&self, path: &str) -> i32 {
        self.get_as(path)
    }

    /// Returns the value as an `i64`.
    fn get_int64(&self, path: &str) -> i64 {
        self.get_as(path)
    }

    /// Returns the value as a platform-width unsigned integer.
    fn get_uint(&self, path: &str) -> usize {
        self.get_as(path)
    }

    /// Returns the value as a `u32`.
    fn get_uint32(&self, path: &str) -> u32 {
        self.get_as(path)
    }

    /// Returns the value as a `u64`.
    fn get_uint64(&self, path: &str) -> u64 {
        self.get_as(path)
    }

    /// Returns the value as an `f64`.
    fn get_float64(&self, path: &str) -> f64 {
        self.get_as(path)
    }

    /// Returns the value as a UTC timestamp. Defaults to the unix epoch.
    fn get_time(&self, path: &str) -> DateTime<Utc> {
        self.get_as(path)
    }

    /// Returns the value as a duration.
    fn get_duration(&self, path: &str) -> Duration {
        self.get_as(path)
    }

    /// Returns the value as a list of strings.
    fn get_string_slice(&self, path: &str) -> Vec<String> {
        self.get_as(path)
    }

    /// Returns the value as a mapping of raw values.
    fn get_string_map(&self, path: &str) -> Mapping {
        self.get_as(path)
    }

    /// Returns the value as a mapping of strings.
    fn get_string_map_string(&self, path: &str) -> BTreeMap<String, String> {
        self.get_as(path)
    }

    /// Returns the value as a mapping of string lists.
    fn get_string_map_string_slice(&self, path: &str) -> BTreeMap<String, Vec<String>> {
        self.get_as(path)
    }
}

impl ConfigAccessor for crate::domain::ConfigTree {
    fn with_value<R, F>(&self, path: &str, f: F) -> R
    where
        F: FnOnce(Option<&RawValue>) -> R,
    {
        f(self.get(path))
    }
}
