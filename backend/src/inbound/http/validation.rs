//! Shared validation helpers for inbound HTTP adapters.
//!
//! The legacy API is deliberately lenient with query input: malformed
//! numbers coerce to absent values rather than rejecting the request.
//! Required body fields, by contrast, produce a structured validation
//! error naming the field.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

/// Build the standard missing-field validation error.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Lenient integer parse: anything that is not a plain integer is absent.
pub(crate) fn lenient_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
}

/// Lenient integer coercion for supplied-but-malformed values: present
/// input that fails to parse becomes 0, absent input stays absent so the
/// caller's default applies.
pub(crate) fn coerced_i64(raw: Option<&str>) -> Option<i64> {
    raw.map(|raw| raw.trim().parse::<i64>().unwrap_or(0))
}

/// Lenient boolean-ish flag parse used by query parameters.
pub(crate) fn lenient_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|raw| {
        let raw = raw.trim();
        raw == "1" || raw.eq_ignore_ascii_case("true")
    })
}

/// Boolean-ish JSON value: legacy clients send `0`/`1` where newer ones
/// send real booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(flag) => flag,
            Self::Int(value) => value != 0,
        }
    }
}
