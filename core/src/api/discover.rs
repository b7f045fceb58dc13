//! Topic discovery from external trend sources, and keyword rankings.

use serde::{Deserialize, Serialize};

use super::Query;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverTopicsRequest {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// `HH:MM` slot the topics are meant for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
}

impl DiscoverTopicsRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            region: None,
            count: None,
            time_slot: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fetched_at: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub reliability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredTopic {
    pub title: String,
    pub keyword: String,
    pub category: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub sources: Vec<TopicSource>,
    /// Set when the backend used a fallback generator instead of live sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<TopicValidation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverTopicsResponse {
    #[serde(default)]
    pub timestamp: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub topics: Vec<DiscoveredTopic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingsQuery {
    pub region: Option<String>,
    /// `YYYY-MM-DD`; the backend uses today when unset.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u32,
    pub keyword: String,
    #[serde(default)]
    pub search_volume: u64,
    pub trend: Trend,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingsResponse {
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub rankings: Vec<Ranking>,
}

pub struct DiscoverApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DiscoverApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn auto_discover_topics(&self, request: &DiscoverTopicsRequest) -> Result<DiscoverTopicsResponse, ApiError> {
        self.discover("/discover/topics/auto", request)
    }

    pub fn manual_discover_topics(&self, request: &DiscoverTopicsRequest) -> Result<DiscoverTopicsResponse, ApiError> {
        self.discover("/discover/topics/manual", request)
    }

    pub fn get_rankings(&self, category: Category, query: &RankingsQuery) -> Result<RankingsResponse, ApiError> {
        let endpoint = Query::new()
            .push("category", category.as_str())
            .push_opt("region", query.region.as_deref().filter(|r| !r.is_empty()))
            .push_opt("date", query.date.as_deref().filter(|d| !d.is_empty()))
            .finish("/discover/topics/rankings");
        self.client.fetch_json(&endpoint, RequestConfig::get())
    }

    fn discover(&self, endpoint: &str, request: &DiscoverTopicsRequest) -> Result<DiscoverTopicsResponse, ApiError> {
        tracing::info!(endpoint, category = request.category.as_str(), "Discovering topics");
        self.client
            .fetch_json(endpoint, RequestConfig::post().json(request)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::testing::{endpoint, fixture_client};
    use crate::http::{HttpMethod, HttpResponse};

    #[test]
    fn auto_discover_posts_request() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(
            200,
            &json!({
                "timestamp": "2026-03-01T07:00:00",
                "category": "fashion",
                "time_slot": "07:00",
                "region": "TW",
                "topics": [{
                    "title": "Spring trench coats",
                    "keyword": "trench coat",
                    "category": "fashion",
                    "source": "google_trends",
                    "sources": [{
                        "type": "trend", "name": "Google Trends", "url": "https://trends.example",
                        "title": "Trench", "fetched_at": "2026-03-01T06:59:00",
                        "verified": true, "reliability": "high"
                    }],
                    "validation": { "valid": true, "consistency_score": 0.9 }
                }]
            }),
        ));

        let mut request = DiscoverTopicsRequest::new(Category::Fashion);
        request.count = Some(3);
        let response = client.discover().auto_discover_topics(&request).unwrap();
        let topic = &response.topics[0];
        assert_eq!(topic.sources[0].kind, "trend");
        assert!(topic.sources[0].verified);
        assert_eq!(topic.fallback, None);
        assert_eq!(topic.validation.as_ref().and_then(|v| v.consistency_score), Some(0.9));

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(endpoint(&req), "/discover/topics/auto");
        assert_eq!(req.json_body(), Some(json!({ "category": "fashion", "count": 3 })));
    }

    #[test]
    fn rankings_always_send_category() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(
            200,
            &json!({ "date": "2026-03-01", "category": "food", "region": "TW", "rankings": [
                { "rank": 1, "keyword": "ramen", "search_volume": 12000, "trend": "up", "source": "google" }
            ] }),
        ));

        let query = RankingsQuery {
            region: Some("TW".to_string()),
            date: None,
        };
        let rankings = client.discover().get_rankings(Category::Food, &query).unwrap();
        assert_eq!(rankings.rankings[0].trend, Trend::Up);
        assert_eq!(
            endpoint(&transport.last_request().unwrap()),
            "/discover/topics/rankings?category=food&region=TW"
        );
    }
}
