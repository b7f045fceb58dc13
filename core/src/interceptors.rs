//! Request and response transforms applied to every API call.
//!
//! # Design
//! The request side is a pure function from one `RequestConfig` to a new
//! one; the caller's config is never touched. The response side turns an
//! `HttpResponse` into either a JSON value or an `ApiError`, reporting the
//! error through an `ErrorReporter` on the way out.
//!
//! Three response shapes are supported:
//! - `response_interceptor` unwraps `{ "data": X }` envelopes to `X`.
//! - `pagination_response_interceptor` always yields `data` + `pagination`.
//! - `envelope_interceptor` returns the body untouched, for endpoints whose
//!   `data` has meaningful siblings.

use serde::Serialize;
use serde_json::Value;

use crate::auth::TokenProvider;
use crate::error::{handle_api_error, handle_http_error, ApiError, ErrorReporter};
use crate::http::{HttpMethod, HttpResponse};
use crate::types::PageInfo;

const JSON: &str = "application/json";

/// Everything needed to issue one request, before interception.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Do not attach the bearer token.
    pub skip_auth: bool,
    /// Do not report failures through the `ErrorReporter`.
    pub skip_error_handler: bool,
}

impl RequestConfig {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn patch() -> Self {
        Self::new(HttpMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// Serialize `payload` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_string(payload).map_err(handle_api_error)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    pub fn skip_error_handler(mut self) -> Self {
        self.skip_error_handler = true;
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }
}

/// Attach auth and content negotiation headers.
///
/// Unless `skip_auth` is set, a bearer token from `tokens` is attached when
/// one exists. `Content-Type` defaults to JSON when absent and `Accept` is
/// always JSON.
pub fn request_interceptor(config: &RequestConfig, tokens: &dyn TokenProvider) -> RequestConfig {
    let mut out = config.clone();

    if !out.skip_auth {
        if let Some(token) = tokens.bearer_token() {
            out.set_header("Authorization", format!("Bearer {token}"));
        }
    }
    if !out.has_header("Content-Type") {
        out.set_header("Content-Type", JSON.to_string());
    }
    out.set_header("Accept", JSON.to_string());

    out
}

/// Parse a success body, or map a failure to an `ApiError`.
///
/// 2xx bodies without a JSON content type yield `None`. JSON bodies that
/// are an object with a `data` key yield that value; other bodies are
/// returned whole. A JSON `null` result is reported as `None`.
pub fn response_interceptor(
    response: &HttpResponse,
    skip_error_handler: bool,
    reporter: &dyn ErrorReporter,
) -> Result<Option<Value>, ApiError> {
    let body = envelope_interceptor(response, skip_error_handler, reporter)?;
    Ok(body.and_then(unwrap_data))
}

/// Like `response_interceptor`, but leaves `{ "data": ... }` envelopes intact.
pub fn envelope_interceptor(
    response: &HttpResponse,
    skip_error_handler: bool,
    reporter: &dyn ErrorReporter,
) -> Result<Option<Value>, ApiError> {
    check_response(response, skip_error_handler, reporter)?;

    if !response.is_json() {
        return Ok(None);
    }
    let body: Value = serde_json::from_str(&response.body).map_err(handle_api_error)?;
    Ok(Some(body).filter(|v| !v.is_null()))
}

/// The two fields of a paginated list response, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageEnvelope {
    pub data: Vec<Value>,
    pub pagination: PageInfo,
}

/// Parse a paginated list response.
///
/// Missing, `null` or non-array `data` becomes an empty list; missing or
/// `null` `pagination` becomes an empty `PageInfo`. An empty or non-JSON
/// body counts as `{}`.
pub fn pagination_response_interceptor(
    response: &HttpResponse,
    skip_error_handler: bool,
    reporter: &dyn ErrorReporter,
) -> Result<PageEnvelope, ApiError> {
    check_response(response, skip_error_handler, reporter)?;

    if !response.is_json() || response.body.trim().is_empty() {
        return Ok(PageEnvelope::default());
    }
    let mut body: Value = serde_json::from_str(&response.body).map_err(handle_api_error)?;

    let data = match body.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let pagination = match body.get_mut("pagination").map(Value::take) {
        Some(Value::Null) | None => PageInfo::default(),
        Some(info) => serde_json::from_value(info).map_err(handle_api_error)?,
    };

    Ok(PageEnvelope { data, pagination })
}

fn unwrap_data(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").filter(|v| !v.is_null())
        }
        other => Some(other),
    }
}

/// Fail on non-2xx, reporting the error unless suppressed. 404 is never
/// reported: callers render "not found" themselves.
fn check_response(
    response: &HttpResponse,
    skip_error_handler: bool,
    reporter: &dyn ErrorReporter,
) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }

    let body = serde_json::from_str::<Value>(&response.body)
        .unwrap_or_else(|_| serde_json::json!({ "detail": response.status_text() }));
    let error = handle_http_error(response.status, Some(&body));

    if !skip_error_handler && response.status != 404 {
        reporter.report(&error);
    }
    Err(error)
}
