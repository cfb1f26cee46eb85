//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while giving every endpoint
//! the legacy failure envelope: a flat body with `success: false`, an
//! `error` message, and a machine-readable `code`. Status codes are set
//! faithfully but clients treat the body as authoritative.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::EmptyName => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::QuotaExceeded | ErrorCode::DuplicateName => StatusCode::CONFLICT,
        ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(error: &Error) -> &str {
    // Internal details never reach clients.
    if matches!(error.code(), ErrorCode::InternalError) {
        "internal server error"
    } else {
        error.message()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        let mut body = json!({
            "success": false,
            "error": public_message(self),
            "code": self.code(),
        });
        if let Some(id) = self.trace_id() {
            body["trace_id"] = json!(id);
        }
        builder.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    async fn body_of(error: &Error) -> Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[rstest]
    #[case::invalid(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case::quota(Error::quota_exceeded("full"), StatusCode::CONFLICT)]
    #[case::duplicate(Error::duplicate_name("taken"), StatusCode::CONFLICT)]
    #[case::store(Error::store_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    fn status_codes_follow_the_error_code(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn failure_envelope_carries_success_false_and_error() {
        let body = body_of(&Error::quota_exceeded("custom categories are limited to 10")).await;
        assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some("custom categories are limited to 10")
        );
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("quota_exceeded")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let body = body_of(&Error::internal("connection string leaked")).await;
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some("internal server error")
        );
    }
}
