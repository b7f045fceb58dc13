//! Shared fetch helper used by every resource client.
//!
//! # Design
//! `ApiClient` holds the base URL plus three pluggable collaborators: the
//! `Transport` that performs I/O, the `TokenProvider` read by the request
//! interceptor, and the `ErrorReporter` used by the response interceptor.
//! All three are chosen once at construction. The client carries no
//! per-call state, so it is cheap to clone and safe to share across threads.
//!
//! Each call is split the way the rest of the crate is: `build_request`
//! produces an `HttpRequest` without touching the network, the transport
//! executes it, and an interceptor parses the `HttpResponse`. Every failure
//! is normalized through `handle_api_error` and logged before it is returned.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    ContentsApi, DiscoverApi, ImagesApi, InteractionsApi, LegacyApi, RecommendationsApi,
    SchedulesApi, TopicsApi, ValidateApi,
};
use crate::auth::{NoToken, TokenProvider};
use crate::config::{self, ClientConfig};
use crate::error::{handle_api_error, ApiError, ErrorCode, ErrorReporter, LogReporter};
use crate::http::{HttpRequest, HttpResponse};
use crate::interceptors::{
    envelope_interceptor, pagination_response_interceptor, request_interceptor,
    response_interceptor, PageEnvelope, RequestConfig,
};
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    reporter: Arc<dyn ErrorReporter>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Network-backed client with no auth token and log-based reporting.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Arc::new(UreqTransport::new()))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            tokens: Arc::new(NoToken),
            reporter: Arc::new(LogReporter),
        }
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Resource clients
    // -----------------------------------------------------------------------

    pub fn topics(&self) -> TopicsApi<'_> {
        TopicsApi::new(self)
    }

    pub fn contents(&self) -> ContentsApi<'_> {
        ContentsApi::new(self)
    }

    pub fn images(&self) -> ImagesApi<'_> {
        ImagesApi::new(self)
    }

    pub fn schedules(&self) -> SchedulesApi<'_> {
        SchedulesApi::new(self)
    }

    pub fn interactions(&self) -> InteractionsApi<'_> {
        InteractionsApi::new(self)
    }

    pub fn recommendations(&self) -> RecommendationsApi<'_> {
        RecommendationsApi::new(self)
    }

    pub fn discover(&self) -> DiscoverApi<'_> {
        DiscoverApi::new(self)
    }

    pub fn validate(&self) -> ValidateApi<'_> {
        ValidateApi::new(self)
    }

    /// Backward-compatible flat facade.
    pub fn legacy(&self) -> LegacyApi<'_> {
        LegacyApi::new(self)
    }

    // -----------------------------------------------------------------------
    // Fetch helpers
    // -----------------------------------------------------------------------

    /// Build the request for `endpoint` (a path relative to the base URL,
    /// query string included) after running the request interceptor.
    pub fn build_request(&self, endpoint: &str, config: &RequestConfig) -> HttpRequest {
        let config = request_interceptor(config, self.tokens.as_ref());
        HttpRequest {
            method: config.method,
            path: format!("{}{endpoint}", self.base_url),
            headers: config.headers,
            body: config.body,
        }
    }

    /// Execute a request and unwrap its `data` envelope.
    pub fn fetch_api(&self, endpoint: &str, config: RequestConfig) -> Result<Option<Value>, ApiError> {
        let skip = config.skip_error_handler;
        self.fetch_with(endpoint, &config, |resp| {
            response_interceptor(resp, skip, self.reporter.as_ref())
        })
    }

    /// Execute a request for a paginated list.
    pub fn fetch_api_with_pagination(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<PageEnvelope, ApiError> {
        let skip = config.skip_error_handler;
        self.fetch_with(endpoint, &config, |resp| {
            pagination_response_interceptor(resp, skip, self.reporter.as_ref())
        })
    }

    /// Execute a request and return the JSON body without unwrapping `data`.
    pub fn fetch_envelope(&self, endpoint: &str, config: RequestConfig) -> Result<Option<Value>, ApiError> {
        let skip = config.skip_error_handler;
        self.fetch_with(endpoint, &config, |resp| {
            envelope_interceptor(resp, skip, self.reporter.as_ref())
        })
    }

    /// `fetch_api` decoded into `T`. An empty result is a decode error.
    pub(crate) fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        match self.fetch_api(endpoint, config)? {
            Some(value) => decode(value),
            None => Err(ApiError::unknown(format!("empty response from {endpoint}"))),
        }
    }

    /// `fetch_api` decoded into `T`, with "no body" as `None`.
    pub(crate) fn fetch_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        self.fetch_api(endpoint, config)?.map(decode).transpose()
    }

    fn fetch_with<R>(
        &self,
        endpoint: &str,
        config: &RequestConfig,
        parse: impl FnOnce(&HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let request = self.build_request(endpoint, config);
        tracing::debug!(method = request.method.as_str(), url = %request.path, "API request");

        let result = self
            .transport
            .execute(&request)
            .map_err(handle_api_error)
            .and_then(|response| parse(&response));

        result.map_err(|error| {
            self.log_failure(endpoint, &request.path, &error);
            error
        })
    }

    fn log_failure(&self, endpoint: &str, url: &str, error: &ApiError) {
        if error.is_not_found() {
            tracing::debug!(endpoint, url, "API resource not found");
            return;
        }
        tracing::warn!(
            endpoint,
            url,
            status = error.status,
            code = %error.code,
            message = %error.message,
            "API request failed",
        );
        if error.code == ErrorCode::Network {
            tracing::warn!(
                health_url = %config::health_url(&self.base_url),
                base_url = %self.base_url,
                "Backend unreachable; check that it is running, that VITE_API_URL is correct, and network connectivity",
            );
        }
    }
}

/// Decode a JSON value into `T`, normalizing failures.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(handle_api_error)
}

/// Decode each element of a page.
pub(crate) fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, ApiError> {
    values.into_iter().map(decode).collect()
}
