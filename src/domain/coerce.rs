// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort conversions from [`RawValue`] to concrete Rust types.
//!
//! Every conversion is total: [`coerce`] returns the target type's zero value
//! (`Default`) when the input is absent or cannot be converted. The strict form,
//! [`FromRawValue::from_raw`], returns `None` in the same situations so callers can
//! tell "absent or mismatched" apart from a stored zero.
//!
//! Numeric conversions cross kinds freely: a stored float requested as an integer
//! truncates toward zero, a stored integer requested as a float widens, and values
//! that do not fit the requested width give the zero value.

use crate::domain::raw_value::{Mapping, RawValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Naive timestamp layouts accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Conversion from an untyped configuration value.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::{FromRawValue, RawValue};
///
/// assert_eq!(i32::from_raw(&RawValue::Float(7.9)), Some(7));
/// assert_eq!(u8::from_raw(&RawValue::Int(-1)), None);
/// assert_eq!(bool::from_raw(&RawValue::from("True")), Some(true));
/// ```
pub trait FromRawValue: Sized {
    /// Converts the value, or returns `None` on a type mismatch.
    fn from_raw(value: &RawValue) -> Option<Self>;
}

/// Converts an optional value, returning `None` when absent or mismatched.
pub fn try_coerce<T: FromRawValue>(value: Option<&RawValue>) -> Option<T> {
    value.and_then(T::from_raw)
}

/// Converts an optional value, falling back to the zero value of `T`.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::{coerce, RawValue};
///
/// let port: u16 = coerce(Some(&RawValue::from("8080")));
/// assert_eq!(port, 8080);
///
/// let missing: String = coerce(None);
/// assert_eq!(missing, "");
/// ```
pub fn coerce<T: FromRawValue + Default>(value: Option<&RawValue>) -> T {
    try_coerce(value).unwrap_or_default()
}

impl FromRawValue for RawValue {
    fn from_raw(value: &RawValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromRawValue for bool {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Bool(b) => Some(*b),
            RawValue::Int(n) => Some(*n != 0),
            RawValue::UInt(n) => Some(*n != 0),
            RawValue::Float(f) => Some(*f != 0.0),
            RawValue::String(s) => parse_bool(s.trim()),
            _ => None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl FromRawValue for String {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Null => None,
            RawValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Widens any integer-like value to `i128` so narrowing can be range-checked once.
fn integer(value: &RawValue) -> Option<i128> {
    match value {
        RawValue::Int(n) => Some(i128::from(*n)),
        RawValue::UInt(n) => Some(i128::from(*n)),
        RawValue::Float(f) if f.is_finite() => Some(f.trunc() as i128),
        RawValue::Bool(b) => Some(i128::from(*b)),
        RawValue::String(s) => parse_integer(s.trim()),
        _ => None,
    }
}

fn parse_integer(s: &str) -> Option<i128> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    // One sign only, and never after a radix prefix.
    let unsigned = |body: &str| !body.starts_with(['+', '-']);
    if !unsigned(digits) {
        return None;
    }

    let radix_parsed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| {
            digits
                .strip_prefix(prefix)
                .map(|body| {
                    if unsigned(body) {
                        i128::from_str_radix(body, *radix).ok()
                    } else {
                        None
                    }
                })
        });

    let magnitude = match radix_parsed {
        Some(parsed) => parsed,
        None => digits.parse::<i128>().ok(),
    };

    match magnitude {
        Some(n) if negative => n.checked_neg(),
        Some(n) => Some(n),
        None => s
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i128),
    }
}

macro_rules! impl_from_raw_integer {
    ($($t:ty),*) => {
        $(
            impl FromRawValue for $t {
                fn from_raw(value: &RawValue) -> Option<Self> {
                    integer(value).and_then(|n| <$t>::try_from(n).ok())
                }
            }
        )*
    };
}

impl_from_raw_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromRawValue for f64 {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Float(f) => Some(*f),
            RawValue::Int(n) => Some(*n as f64),
            RawValue::UInt(n) => Some(*n as f64),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl FromRawValue for f32 {
    fn from_raw(value: &RawValue) -> Option<Self> {
        f64::from_raw(value).map(|f| f as f32)
    }
}

impl FromRawValue for DateTime<Utc> {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::String(s) => parse_time(s.trim()),
            RawValue::Int(secs) => Utc.timestamp_opt(*secs, 0).single(),
            RawValue::UInt(secs) => Utc.timestamp_opt(i64::try_from(*secs).ok()?, 0).single(),
            RawValue::Float(f) if f.is_finite() => {
                let secs = f.floor();
                let nanos = ((f - secs) * 1e9) as u32;
                Utc.timestamp_opt(secs as i64, nanos).single()
            }
            _ => None,
        }
    }
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl FromRawValue for Duration {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Int(secs) => u64::try_from(*secs).ok().map(Duration::from_secs),
            RawValue::UInt(secs) => Some(Duration::from_secs(*secs)),
            RawValue::Float(secs) => seconds(*secs),
            RawValue::String(s) => {
                let s = s.trim();
                match s.parse::<f64>() {
                    Ok(secs) => seconds(secs),
                    Err(_) => parse_duration_literal(s),
                }
            }
            _ => None,
        }
    }
}

fn seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

/// Parses literals such as `1h30m`, `1.5s` or `250ms`.
///
/// Accepted units are `ns`, `us` (`µs`), `ms`, `s`, `m` and `h`. A leading `-`
/// is only accepted for a zero duration.
fn parse_duration_literal(s: &str) -> Option<Duration> {
    let (negative, mut rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let unit_nanos: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return None,
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return None;
        }

        let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut nanos = whole.checked_mul(unit_nanos)?;
        if !fraction.is_empty() {
            let digits = fraction.len().min(18);
            let value: u128 = fraction[..digits].parse().ok()?;
            nanos = nanos.checked_add(value * unit_nanos / 10u128.pow(digits as u32))?;
        }

        total = total.checked_add(nanos)?;
        rest = next;
    }

    if negative && total > 0 {
        return None;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

impl FromRawValue for Vec<String> {
    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Sequence(items) => Some(
                items
                    .iter()
                    .map(|item| String::from_raw(item).unwrap_or_default())
                    .collect(),
            ),
            RawValue::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),
            RawValue::Null | RawValue::Mapping(_) => None,
            scalar => Some(vec![scalar.to_string()]),
        }
    }
}

/// Resolves a value to a mapping, decoding inline JSON objects held in strings.
fn mapping(value: &RawValue) -> Option<Mapping> {
    match value {
        RawValue::Mapping(map) => Some(map.clone()),
        RawValue::String(s) => serde_json::from_str::<Mapping>(s.trim()).ok(),
        _ => None,
    }
}

impl FromRawValue for Mapping {
    fn from_raw(value: &RawValue) -> Option<Self> {
        mapping(value)
    }
}

impl FromRawValue for BTreeMap<String, String> {
    fn from_raw(value: &RawValue) -> Option<Self> {
        mapping(value).map(|map| {
            map.into_iter()
                .map(|(key, item)| (key, String::from_raw(&item).unwrap_or_default()))
                .collect()
        })
    }
}

impl FromRawValue for BTreeMap<String, Vec<String>> {
    fn from_raw(value: &RawValue) -> Option<Self> {
        mapping(value).map(|map| {
            map.into_iter()
                .map(|(key, item)| {
                    let items = match item {
                        RawValue::String(s) => vec![s],
                        other => Vec::<String>::from_raw(&other).unwrap_or_default(),
                    };
                    (key, items)
                })
                .collect()
        })
    }
}
