//! Per-user topic recommendations.

use serde::{Deserialize, Serialize};

use super::{segment, Query};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effectiveness {
    High,
    Medium,
    Low,
}

/// What the user did with a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub action: String,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub keyword: String,
    /// 0.0 to 1.0.
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_result: Option<InteractionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<Effectiveness>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    pub user_id: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationHistory {
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<Recommendation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationQuery {
    pub category: Option<Category>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub struct RecommendationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RecommendationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_recommendations(
        &self,
        user_id: &str,
        query: &RecommendationQuery,
    ) -> Result<RecommendationList, ApiError> {
        let endpoint = Query::new()
            .push_opt("category", query.category.map(|c| c.as_str()))
            .push_opt("limit", query.limit.filter(|l| *l > 0))
            .finish(&format!("/recommendations/{}", segment(user_id)));
        self.client.fetch_json(&endpoint, RequestConfig::get())
    }

    pub fn get_recommendation_history(
        &self,
        user_id: &str,
        query: &HistoryQuery,
    ) -> Result<RecommendationHistory, ApiError> {
        let endpoint = Query::new()
            .push_opt("start_date", query.start_date.as_deref().filter(|d| !d.is_empty()))
            .push_opt("end_date", query.end_date.as_deref().filter(|d| !d.is_empty()))
            .finish(&format!("/recommendations/{}/history", segment(user_id)));
        self.client.fetch_json(&endpoint, RequestConfig::get())
    }
}
