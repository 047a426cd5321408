// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response envelopes with globally unique numeric codes.
//!
//! A [`ReturnCode`] pairs a numeric code with a message and an optional payload
//! and serializes to the JSON envelope `{"Code": .., "Message": .., "Data": ..}`.
//! Codes are registered once at startup through [`ReturnCodeRegistry`], which
//! reports every duplicate in a single error.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::raw_value::RawValue;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;

/// Well-known code values.
pub mod codes {
    /// 200 OK.
    pub const OK: i32 = 200;
    /// 201 Created.
    pub const CREATED: i32 = 201;
    /// 226 IM Used, the last code counted as success.
    pub const IM_USED: i32 = 226;
    /// 400 Bad Request.
    pub const BAD_REQUEST: i32 = 400;
    /// 408 Request Timeout.
    pub const REQUEST_TIMEOUT: i32 = 408;
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: i32 = 500;
    /// Invalid request arguments.
    pub const ARGUMENTS: i32 = 600;
    /// A unique key was duplicated.
    pub const UNIQUE_KEY_DUPLICATED: i32 = 601;
    /// HTTP status used for every business error code at or above it.
    pub const BUSINESS_ERROR: i32 = 999;
}

const STANDARD_CODES: &[(i32, &str)] = &[
    (codes::OK, "OK"),
    (codes::CREATED, "Created"),
    (codes::BAD_REQUEST, "Bad Request"),
    (codes::REQUEST_TIMEOUT, "Request Timeout"),
    (codes::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    (codes::ARGUMENTS, "err: arguments"),
    (codes::UNIQUE_KEY_DUPLICATED, "err: unique key duplicated"),
];

static STANDARD: Lazy<ReturnCodeRegistry> = Lazy::new(|| ReturnCodeRegistry {
    codes: STANDARD_CODES
        .iter()
        .map(|(code, message)| (*code, ReturnCode::of(*code, *message)))
        .collect(),
});

/// A response envelope.
///
/// # Examples
///
/// ```
/// use remotecfg::domain::{RawValue, ReturnCode};
///
/// let rc = ReturnCode::success(RawValue::from("done"));
/// assert!(rc.is_success());
/// assert_eq!(rc.to_json().unwrap(), r#"{"Code":200,"Data":"done"}"#);
///
/// let err = ReturnCode::of(600, "err: arguments").with_message("page must be positive");
/// assert_eq!(err.message(), "err: arguments:page must be positive");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnCode {
    #[serde(rename = "Code")]
    code: i32,
    #[serde(rename = "Message", default, skip_serializing_if = "String::is_empty")]
    message: String,
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    data: Option<RawValue>,
}

impl ReturnCode {
    /// Creates an unregistered return code.
    pub fn of(code: i32, message: impl Into<String>) -> Self {
        ReturnCode {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// A 200 envelope carrying `data` and no message.
    pub fn success(data: impl Into<RawValue>) -> Self {
        ReturnCode {
            code: codes::OK,
            message: String::new(),
            data: Some(data.into()),
        }
    }

    /// A 500 envelope whose message is the error's text.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::of(codes::INTERNAL_SERVER_ERROR, err.to_string())
    }

    /// The numeric code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The payload, if any.
    pub fn data(&self) -> Option<&RawValue> {
        self.data.as_ref()
    }

    /// Returns a copy with `detail` appended to the message after a `:`.
    ///
    /// The payload is not carried over.
    pub fn with_message(&self, detail: impl fmt::Display) -> Self {
        Self::of(self.code, format!("{}:{}", self.message, detail))
    }

    /// Returns a copy carrying `data`.
    pub fn with_data(mut self, data: impl Into<RawValue>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// `true` for codes in the HTTP success range 200 to 226.
    pub fn is_success(&self) -> bool {
        (codes::OK..=codes::IM_USED).contains(&self.code)
    }

    /// The HTTP status to answer with. Business codes collapse to 999.
    pub fn status_code(&self) -> i32 {
        self.code.min(codes::BUSINESS_ERROR)
    }

    /// Serializes the envelope as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ConfigError::parse("JSON", e))
    }

    /// Parses an envelope from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::parse("JSON", e))
    }

    /// Reads and parses an envelope, e.g. from an HTTP response body.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| ConfigError::parse("JSON", e))
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ReturnCode {}

impl From<ConfigError> for ReturnCode {
    fn from(err: ConfigError) -> Self {
        ReturnCode::from_error(&err)
    }
}

/// The set of registered return codes, each code unique.
#[derive(Clone, Debug, Default)]
pub struct ReturnCodeRegistry {
    codes: BTreeMap<i32, ReturnCode>,
}

impl ReturnCodeRegistry {
    /// Starts an empty registration pass.
    pub fn builder() -> ReturnCodeRegistryBuilder {
        ReturnCodeRegistryBuilder::default()
    }

    /// Starts a registration pass pre-filled with the standard codes.
    pub fn builder_with_standard() -> ReturnCodeRegistryBuilder {
        let mut builder = Self::builder();
        for (code, message) in STANDARD_CODES {
            builder = builder.register(*code, *message);
        }
        builder
    }

    /// The standard codes: 200, 201, 400, 408, 500, 600 and 601.
    pub fn standard() -> &'static ReturnCodeRegistry {
        &STANDARD
    }

    /// Looks up a registered code.
    pub fn get(&self, code: i32) -> Option<&ReturnCode> {
        self.codes.get(&code)
    }

    /// Iterates over the registered codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &ReturnCode> {
        self.codes.values()
    }

    /// The number of registered codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Collects registrations and checks them for duplicates in one pass.
#[derive(Debug, Default)]
pub struct ReturnCodeRegistryBuilder {
    entries: Vec<ReturnCode>,
}

impl ReturnCodeRegistryBuilder {
    /// Queues a code for registration.
    pub fn register(mut self, code: i32, message: impl Into<String>) -> Self {
        self.entries.push(ReturnCode::of(code, message));
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateReturnCodes`] listing every code that was
    /// registered more than once.
    pub fn build(self) -> Result<ReturnCodeRegistry> {
        let mut codes = BTreeMap::new();
        let mut duplicates = BTreeSet::new();

        for entry in self.entries {
            let code = entry.code;
            if codes.insert(code, entry).is_some() {
                duplicates.insert(code);
            }
        }

        if !duplicates.is_empty() {
            tracing::error!(codes = ?duplicates, "Duplicate return codes registered");
            return Err(ConfigError::DuplicateReturnCodes {
                codes: duplicates.into_iter().collect(),
            });
        }

        Ok(ReturnCodeRegistry { codes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(ReturnCode::of(200, "").is_success());
        assert!(ReturnCode::of(226, "").is_success());
        assert!(!ReturnCode::of(227, "").is_success());
        assert!(!ReturnCode::of(199, "").is_success());
        assert!(!ReturnCode::of(600, "").is_success());
    }

    #[test]
    fn test_status_code_collapses_business_codes() {
        assert_eq!(ReturnCode::of(404, "").status_code(), 404);
        assert_eq!(ReturnCode::of(999, "").status_code(), 999);
        assert_eq!(ReturnCode::of(10_001, "").status_code(), 999);
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let rc = ReturnCode::of(400, "Bad Request");
        assert_eq!(rc.to_json().unwrap(), r#"{"Code":400,"Message":"Bad Request"}"#);
        assert_eq!(ReturnCode::of(200, "").to_json().unwrap(), r#"{"Code":200}"#);
    }

    #[test]
    fn test_from_reader() {
        let body = br#"{"Code":601,"Message":"err: unique key duplicated","Data":{"id":3}}"#;
        let rc = ReturnCode::from_reader(&body[..]).unwrap();
        assert_eq!(rc.code(), 601);
        assert_eq!(rc.to_string(), "err: unique key duplicated");
        assert!(rc.data().and_then(RawValue::as_mapping).is_some());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ReturnCode::from_json("{").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_with_message_drops_data() {
        let rc = ReturnCode::of(600, "err: arguments")
            .with_data(RawValue::Int(1))
            .with_message(format_args!("field {}", "page"));
        assert_eq!(rc.message(), "err: arguments:field page");
        assert!(rc.data().is_none());
    }

    #[test]
    fn test_from_error() {
        let err = ConfigError::KeyNotFound {
            key: "svc".to_string(),
        };
        let rc = ReturnCode::from(err);
        assert_eq!(rc.code(), codes::INTERNAL_SERVER_ERROR);
        assert_eq!(rc.message(), "Configuration key not found: svc");
    }

    #[test]
    fn test_standard_registry() {
        let registry = ReturnCodeRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.get(codes::ARGUMENTS).unwrap().message(), "err: arguments");
        assert!(registry.get(404).is_none());
        assert!(ReturnCodeRegistry::builder_with_standard().build().is_ok());
    }

    #[test]
    fn test_duplicates_reported_together() {
        let err = ReturnCodeRegistry::builder_with_standard()
            .register(700, "custom")
            .register(600, "again")
            .register(400, "again")
            .register(600, "third time")
            .build()
            .unwrap_err();

        match err {
            ConfigError::DuplicateReturnCodes { codes } => assert_eq!(codes, vec![400, 600]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_registry() {
        let registry = ReturnCodeRegistry::builder()
            .register(1001, "err: quota exceeded")
            .build()
            .unwrap();
        let rc = registry.get(1001).unwrap();
        assert_eq!(rc.status_code(), 999);
        assert_eq!(registry.iter().count(), 1);
    }
}
