//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses and to the legacy `success`/`error` envelope; the taxonomy
//! mirrors the failure categories of the feed API rather than HTTP status
//! semantics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::middleware::trace::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or missing a required field.
    InvalidRequest,
    /// Authentication failed or is missing. Login mismatches use this code
    /// with a deliberately generic message to avoid user enumeration.
    Unauthorized,
    /// The requested resource does not exist.
    NotFound,
    /// The user already holds the maximum number of custom categories.
    QuotaExceeded,
    /// A custom category with the same name already exists for this user.
    DuplicateName,
    /// The supplied custom category name is empty once trimmed.
    EmptyName,
    /// The persistence store is unreachable or not yet provisioned.
    /// Read paths degrade to placeholder data instead of raising this.
    StoreUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty; constructors take `impl Into<String>` from
///   call sites that always supply literal or formatted text.
///
/// Construction captures the current [`TraceId`] when one is in scope so
/// error payloads correlate with request logs automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "missing required field: article_id")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured at construction, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier to the error.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::QuotaExceeded`].
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::QuotaExceeded, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateName`].
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateName, message)
    }

    /// Convenience constructor for [`ErrorCode::EmptyName`].
    pub fn empty_name(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptyName, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreUnavailable`].
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quota(ErrorCode::QuotaExceeded, "\"quota_exceeded\"")]
    #[case::duplicate(ErrorCode::DuplicateName, "\"duplicate_name\"")]
    #[case::store(ErrorCode::StoreUnavailable, "\"store_unavailable\"")]
    fn error_codes_serialize_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
        let serialized = serde_json::to_string(&code).expect("serialize code");
        assert_eq!(serialized, expected);
    }

    #[rstest]
    fn display_uses_the_message() {
        let error = Error::quota_exceeded("custom categories are limited to 10");
        assert_eq!(error.to_string(), "custom categories are limited to 10");
        assert_eq!(error.code(), ErrorCode::QuotaExceeded);
    }

    #[rstest]
    fn details_round_trip() {
        let error =
            Error::invalid_request("bad").with_details(serde_json::json!({ "field": "name" }));
        let details = error.details().and_then(Value::as_object).expect("details");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("name"));
    }

    #[rstest]
    fn trace_id_is_absent_outside_a_request_scope() {
        let error = Error::internal("boom");
        assert!(error.trace_id().is_none());
        let serialized = serde_json::to_value(&error).expect("serialize error");
        assert!(serialized.get("trace_id").is_none());
    }
}
