//! Error taxonomy for the content API client.
//!
//! # Design
//! Every failure, whether a non-2xx response, a transport failure or a
//! decode problem, ends up as a single `ApiError` shape: a message, the HTTP
//! status (0 when no response was received), a machine-readable `ErrorCode`
//! and the optional response body for debugging.
//!
//! `handle_api_error` is idempotent: feeding it an `ApiError` returns the
//! same value, so call sites can normalize without checking first.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::transport::TransportError;

/// Machine-readable error code carried by every `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimit,
    Internal,
    ServiceUnavailable,
    /// Any other non-2xx status, rendered as `HTTP_<status>`.
    Http(u16),
    /// The request never produced a response.
    Network,
    /// Decode failures and anything else without an HTTP status.
    Unknown,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            422 => ErrorCode::Validation,
            429 => ErrorCode::RateLimit,
            500 => ErrorCode::Internal,
            503 => ErrorCode::ServiceUnavailable,
            other => ErrorCode::Http(other),
        }
    }

    pub fn as_str(&self) -> Cow<'static, str> {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST".into(),
            ErrorCode::Unauthorized => "UNAUTHORIZED".into(),
            ErrorCode::Forbidden => "FORBIDDEN".into(),
            ErrorCode::NotFound => "NOT_FOUND".into(),
            ErrorCode::Validation => "VALIDATION_ERROR".into(),
            ErrorCode::RateLimit => "RATE_LIMIT".into(),
            ErrorCode::Internal => "INTERNAL_ERROR".into(),
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE".into(),
            ErrorCode::Http(status) => format!("HTTP_{status}").into(),
            ErrorCode::Network => "NETWORK".into(),
            ErrorCode::Unknown => "UNKNOWN_ERROR".into(),
        }
    }

    fn default_message(&self) -> Cow<'static, str> {
        match self {
            ErrorCode::BadRequest => "Invalid request parameters".into(),
            ErrorCode::Unauthorized => "Unauthorized, please sign in again".into(),
            ErrorCode::Forbidden => "You do not have access to this resource".into(),
            ErrorCode::NotFound => "Resource not found".into(),
            ErrorCode::Validation => "Validation failed".into(),
            ErrorCode::RateLimit => "Too many requests, please try again later".into(),
            ErrorCode::Internal => "Internal server error".into(),
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable".into(),
            ErrorCode::Http(status) => format!("HTTP error: {status}").into(),
            ErrorCode::Network => "Network request failed".into(),
            ErrorCode::Unknown => "Unknown error".into(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

/// The single error shape returned by every client operation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status,
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A status-0 `UNKNOWN_ERROR`, used for decode and serialization failures.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::new(ErrorCode::Unknown.default_message(), 0, ErrorCode::Unknown);
        }
        Self::new(message, 0, ErrorCode::Unknown)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// Normalize any failure into an `ApiError`.
///
/// An `ApiError` passes through unchanged. A `TransportError` becomes a
/// status-0 `NETWORK` error. Everything else (serde errors, plain strings)
/// becomes a status-0 `UNKNOWN_ERROR` carrying the failure's message.
pub fn handle_api_error<E>(error: E) -> ApiError
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let error = error.into();
    let error = match error.downcast::<ApiError>() {
        Ok(api) => return *api,
        Err(other) => other,
    };
    match error.downcast::<TransportError>() {
        Ok(transport) => ApiError::new(transport.to_string(), 0, ErrorCode::Network),
        Err(other) => ApiError::unknown(other.to_string()),
    }
}

/// Map a non-2xx status and its (optional) JSON error body to an `ApiError`.
///
/// A `detail` field in the body overrides the default message for the code.
/// String details are used verbatim; structured details (such as a list of
/// validation failures) are rendered as JSON text. The body is kept in
/// `details`.
pub fn handle_http_error(status: u16, body: Option<&Value>) -> ApiError {
    let code = ErrorCode::from_status(status);
    let message = match body.and_then(|b| b.get("detail")) {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail) if !detail.is_null() => detail.to_string(),
        _ => code.default_message().into_owned(),
    };
    let error = ApiError::new(message, status, code);
    match body {
        Some(body) => error.with_details(body.clone()),
        None => error,
    }
}

/// Side channel that surfaces errors to the user (toast, notification,
/// console). Interceptors call it for every reportable failure.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &ApiError);
}

/// Reports errors as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &ApiError) {
        tracing::error!(
            message = %error.message,
            status = error.status,
            code = %error.code,
            "API error",
        );
        if error.code == ErrorCode::Unauthorized {
            tracing::warn!("Credentials rejected; the caller should re-authenticate");
        }
    }
}

/// Drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ErrorReporter for SilentReporter {
    fn report(&self, _error: &ApiError) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_table_maps_to_codes() {
        let cases = [
            (400, "BAD_REQUEST"),
            (401, "UNAUTHORIZED"),
            (403, "FORBIDDEN"),
            (404, "NOT_FOUND"),
            (422, "VALIDATION_ERROR"),
            (429, "RATE_LIMIT"),
            (500, "INTERNAL_ERROR"),
            (503, "SERVICE_UNAVAILABLE"),
            (418, "HTTP_418"),
            (502, "HTTP_502"),
        ];
        for (status, code) in cases {
            let err = handle_http_error(status, None);
            assert_eq!(err.status, status);
            assert_eq!(err.code.as_str(), code, "status {status}");
            assert!(err.details.is_none());
        }
    }

    #[test]
    fn detail_overrides_default_message() {
        let body = json!({ "detail": "Topic not found: xyz" });
        let err = handle_http_error(404, Some(&body));
        assert_eq!(err.message, "Topic not found: xyz");
        assert_eq!(err.details, Some(body));
    }

    #[test]
    fn detail_overrides_even_for_fixed_messages() {
        let body = json!({ "detail": "slow down" });
        let err = handle_http_error(429, Some(&body));
        assert_eq!(err.message, "slow down");
        assert_eq!(err.code, ErrorCode::RateLimit);
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body = json!({ "detail": [{ "loc": ["body", "status"], "msg": "bad" }] });
        let err = handle_http_error(422, Some(&body));
        assert!(err.message.starts_with('['));
        assert!(err.message.contains("\"msg\":\"bad\""));
    }

    #[test]
    fn missing_detail_uses_default_message() {
        let err = handle_http_error(500, Some(&json!({ "error": "boom" })));
        assert_eq!(err.message, "Internal server error");
        let err = handle_http_error(418, None);
        assert_eq!(err.message, "HTTP error: 418");
    }

    #[test]
    fn handle_api_error_is_idempotent() {
        let original = handle_http_error(429, Some(&json!({ "detail": "later" })));
        let once = handle_api_error(original.clone());
        let twice = handle_api_error(once.clone());
        assert_eq!(once, original);
        assert_eq!(twice, once);
    }

    #[test]
    fn transport_failure_becomes_network_error() {
        let err = handle_api_error(TransportError::Network("connection refused".to_string()));
        assert_eq!(err.status, 0);
        assert_eq!(err.code, ErrorCode::Network);
        assert!(err.message.contains("connection refused"));
    }

    #[test]
    fn other_failures_become_unknown() {
        let decode = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = handle_api_error(decode);
        assert_eq!(err.status, 0);
        assert_eq!(err.code.as_str(), "UNKNOWN_ERROR");

        let err = handle_api_error("something odd");
        assert_eq!(err.message, "something odd");
        assert_eq!(err.code, ErrorCode::Unknown);
    }

    #[test]
    fn error_serializes_code_as_string() {
        let err = handle_http_error(503, None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(json["status"], 503);
        assert!(json.get("details").is_none());
    }
}
