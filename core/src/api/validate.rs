//! Source verification: fetching cited sources, cross-source consistency
//! and per-source health.

use serde::{Deserialize, Serialize};

use super::segment;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SourceRef {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateSourcesRequest {
    pub topic_id: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSource {
    pub valid: bool,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub fetched_at: String,
    #[serde(default)]
    pub reliability: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSummary {
    pub total_sources: u32,
    pub verified_sources: u32,
    pub failed_sources: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSource {
    pub source: SourceRef,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateSourcesResponse {
    pub topic_id: String,
    #[serde(default)]
    pub validated_sources: Vec<ValidatedSource>,
    #[serde(default)]
    pub validation_summary: ValidationSummary,
    #[serde(default)]
    pub failed_sources: Vec<FailedSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateConsistencyRequest {
    pub keyword: String,
    pub category: Category,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    pub valid: bool,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub consistency_score: f64,
    #[serde(default)]
    pub sources_verified: u32,
    #[serde(default)]
    pub is_factual: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceHealth {
    pub health_score: f64,
    pub status: HealthStatus,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ValidateApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ValidateApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn validate_sources(&self, request: &ValidateSourcesRequest) -> Result<ValidateSourcesResponse, ApiError> {
        self.client
            .fetch_json("/validate/sources", RequestConfig::post().json(request)?)
    }

    pub fn validate_topic_consistency(&self, request: &ValidateConsistencyRequest) -> Result<ConsistencyResult, ApiError> {
        self.client
            .fetch_json("/validate/topic-consistency", RequestConfig::post().json(request)?)
    }

    pub fn check_source_health(&self, source_url: &str) -> Result<SourceHealth, ApiError> {
        let encoded = segment(source_url);
        self.client
            .fetch_json(&format!("/validate/source-health/{encoded}"), RequestConfig::get())
    }
}
