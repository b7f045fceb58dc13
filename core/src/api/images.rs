//! Images attached to a topic, provider search and article-based matching.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{segment, Query};
use crate::client::{decode, ApiClient};
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::{Image, ImageRecord, ImageSource, PageInfo, Pagination};

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
/// Images requested by `match_photos` when the caller has no preference.
pub const DEFAULT_MATCH_COUNT: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSearchParams {
    pub keywords: String,
    /// Restrict to one provider; the backend falls back across providers
    /// when unset.
    pub source: Option<ImageSource>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ImageSearchParams {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            source: None,
            page: None,
            limit: None,
        }
    }

    fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_SEARCH_LIMIT)
    }

    fn endpoint(&self) -> String {
        Query::new()
            .push("keywords", &self.keywords)
            .push("page", self.page())
            .push("limit", self.limit())
            .push_opt("source", self.source.map(|s| s.backend_name()))
            .finish("/images/search")
    }
}

/// One provider attempt made by the backend while searching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchAttempt {
    pub source: String,
    /// `success`, `no_results`, `error`, `unavailable` or `exception`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchResponse {
    pub data: Vec<Image>,
    pub pagination: Pagination,
    /// Provider that produced the results.
    pub source: Option<String>,
    pub attempts: Vec<ImageSearchAttempt>,
    pub trace_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<Vec<ImageRecord>>,
    #[serde(default)]
    pagination: Option<PageInfo>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    attempts: Option<Vec<ImageSearchAttempt>>,
    #[serde(default)]
    trace_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCreate {
    pub url: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    topic_id: &'a str,
    #[serde(flatten)]
    image: &'a ImageCreate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// Position of one image in a reorder request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    pub image_id: String,
    pub order: u32,
}

impl ImageOrder {
    /// Orders `0..n` for image ids given in their new display order.
    pub fn sequence<S: AsRef<str>>(image_ids: &[S]) -> Vec<ImageOrder> {
        image_ids
            .iter()
            .zip(0u32..)
            .map(|(id, order)| ImageOrder {
                image_id: id.as_ref().to_string(),
                order,
            })
            .collect()
    }
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    image_orders: &'a [ImageOrder],
}

#[derive(Serialize)]
struct ValidateMatchBody<'a> {
    topic_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    article_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchValidationItem {
    pub mentioned_item: String,
    pub has_matching_photo: bool,
    #[serde(default)]
    pub photo_id: String,
    #[serde(default)]
    pub match_score: f64,
}

/// How well a topic's photos cover the items its article mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchValidation {
    pub topic_id: String,
    #[serde(default)]
    pub validation_results: Vec<MatchValidationItem>,
    pub overall_match: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}

pub struct ImagesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ImagesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Images of a topic in stored order.
    pub fn get_images(&self, topic_id: &str) -> Result<Vec<Image>, ApiError> {
        self.image_list(&format!("/images/{}", segment(topic_id)), RequestConfig::get())
    }

    pub fn search_images(&self, params: &ImageSearchParams) -> Result<ImageSearchResponse, ApiError> {
        let body = self
            .client
            .fetch_envelope(&params.endpoint(), RequestConfig::get())?;
        let envelope: SearchEnvelope = match body {
            Some(body) => decode(body)?,
            None => decode(Value::Object(Default::default()))?,
        };

        let data: Vec<Image> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Image::from)
            .collect();
        let pagination = Pagination::normalize(
            &envelope.pagination.unwrap_or_default(),
            params.page(),
            params.limit(),
            data.len(),
        );
        tracing::debug!(
            keywords = %params.keywords,
            results = data.len(),
            source = envelope.source.as_deref().unwrap_or(""),
            "Image search completed",
        );

        Ok(ImageSearchResponse {
            data,
            pagination,
            source: envelope.source,
            attempts: envelope.attempts.unwrap_or_default(),
            trace_id: envelope.trace_id,
        })
    }

    pub fn create_image(&self, topic_id: &str, image: &ImageCreate) -> Result<Image, ApiError> {
        let body = CreateBody { topic_id, image };
        let record: ImageRecord = self
            .client
            .fetch_json(&format!("/images/{}", segment(topic_id)), RequestConfig::post().json(&body)?)?;
        Ok(record.into())
    }

    pub fn update_image(&self, topic_id: &str, image_id: &str, update: &ImageUpdate) -> Result<Image, ApiError> {
        let record: ImageRecord = self.client.fetch_json(
            &format!("/images/{}/{}", segment(topic_id), segment(image_id)),
            RequestConfig::put().json(update)?,
        )?;
        Ok(record.into())
    }

    pub fn delete_image(&self, topic_id: &str, image_id: &str) -> Result<(), ApiError> {
        self.client
            .fetch_api(&format!("/images/{}/{}", segment(topic_id), segment(image_id)), RequestConfig::delete())?;
        Ok(())
    }

    /// Replace the whole ordering of a topic's images. `orders` must cover
    /// every image; see `ImageOrder::sequence`.
    pub fn reorder_images(&self, topic_id: &str, orders: &[ImageOrder]) -> Result<(), ApiError> {
        let body = ReorderBody { image_orders: orders };
        self.client.fetch_api(
            &format!("/images/{}/reorder", segment(topic_id)),
            RequestConfig::put().json(&body)?,
        )?;
        Ok(())
    }

    /// Let the backend pick at least `min_count` images matching the
    /// topic's article.
    pub fn match_photos(&self, topic_id: &str, min_count: u32) -> Result<Vec<Image>, ApiError> {
        let endpoint = Query::new()
            .push("min_count", min_count)
            .finish(&format!("/images/{}/match", segment(topic_id)));
        self.image_list(&endpoint, RequestConfig::post())
    }

    pub fn validate_match(&self, topic_id: &str, article_id: Option<&str>) -> Result<MatchValidation, ApiError> {
        let body = ValidateMatchBody { topic_id, article_id };
        self.client
            .fetch_json("/images/validate-match", RequestConfig::post().json(&body)?)
    }

    fn image_list(&self, endpoint: &str, config: RequestConfig) -> Result<Vec<Image>, ApiError> {
        let records: Vec<ImageRecord> = self
            .client
            .fetch_optional(endpoint, config)?
            .unwrap_or_default();
        Ok(records.into_iter().map(Image::from).collect())
    }
}
