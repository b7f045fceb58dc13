//! Generated article/script content for a topic.

use serde::{Deserialize, Serialize};

use super::{not_found_as_none, segment};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::{Content, ContentRecord};

pub const DEFAULT_ARTICLE_LENGTH: u32 = 500;
/// Seconds.
pub const DEFAULT_SCRIPT_DURATION: u32 = 30;

/// What the backend should generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Article,
    Script,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateContentParams {
    pub kind: GenerationType,
    /// Target article length in characters; 500 when unset.
    pub article_length: Option<u32>,
    /// Target script duration in seconds; 30 when unset.
    pub script_duration: Option<u32>,
}

impl GenerateContentParams {
    pub fn new(kind: GenerationType) -> Self {
        Self {
            kind,
            article_length: None,
            script_duration: None,
        }
    }
}

#[derive(Serialize)]
struct GenerateBody {
    #[serde(rename = "type")]
    kind: GenerationType,
    article_length: u32,
    script_duration: u32,
}

impl From<&GenerateContentParams> for GenerateBody {
    fn from(p: &GenerateContentParams) -> Self {
        Self {
            kind: p.kind,
            article_length: p
                .article_length
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_ARTICLE_LENGTH),
            script_duration: p
                .script_duration
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SCRIPT_DURATION),
        }
    }
}

/// Manual edits to the current content; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

pub struct ContentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ContentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Current content of a topic, `None` if nothing has been generated.
    pub fn get_content(&self, topic_id: &str) -> Result<Option<Content>, ApiError> {
        let record = not_found_as_none(
            self.client
                .fetch_optional::<ContentRecord>(&format!("/contents/{}", segment(topic_id)), RequestConfig::get()),
        )?;
        Ok(record.map(Content::from))
    }

    /// Ask the backend to generate content; returns the new version.
    pub fn generate_content(
        &self,
        topic_id: &str,
        params: &GenerateContentParams,
    ) -> Result<Content, ApiError> {
        self.post_generation(&format!("/contents/{}/generate", segment(topic_id)), params)
    }

    pub fn update_content(&self, topic_id: &str, update: &ContentUpdate) -> Result<Content, ApiError> {
        let record: ContentRecord = self
            .client
            .fetch_json(&format!("/contents/{}", segment(topic_id)), RequestConfig::put().json(update)?)?;
        Ok(record.into())
    }

    /// Every stored version, as ordered by the backend.
    pub fn get_content_versions(&self, topic_id: &str) -> Result<Vec<Content>, ApiError> {
        let records: Vec<ContentRecord> = self
            .client
            .fetch_optional(&format!("/contents/{}/versions", segment(topic_id)), RequestConfig::get())?
            .unwrap_or_default();
        Ok(records.into_iter().map(Content::from).collect())
    }

    pub fn regenerate_content(
        &self,
        topic_id: &str,
        params: &GenerateContentParams,
    ) -> Result<Content, ApiError> {
        self.post_generation(&format!("/contents/{}/regenerate", segment(topic_id)), params)
    }

    fn post_generation(&self, endpoint: &str, params: &GenerateContentParams) -> Result<Content, ApiError> {
        tracing::info!(endpoint, kind = ?params.kind, "Requesting content generation");
        let body = GenerateBody::from(params);
        let record: ContentRecord = self
            .client
            .fetch_json(endpoint, RequestConfig::post().json(&body)?)?;
        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::testing::{endpoint, fixture_client};
    use crate::http::{HttpMethod, HttpResponse};

    fn content_json(version: u32) -> serde_json::Value {
        json!({
            "id": format!("c{version}"),
            "topic_id": "t1",
            "article": "Trench coats are back.",
            "script": "Open on a rainy street.",
            "word_count": 480,
            "estimated_duration": 30,
            "model_used": "qwen2.5",
            "version": version
        })
    }

    #[test]
    fn generate_content_applies_default_lengths() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(200, &content_json(2)));

        let content = client
            .contents()
            .generate_content("t1", &GenerateContentParams::new(GenerationType::Both))
            .unwrap();
        assert_eq!(content.version, 2);
        assert_eq!(content.topic_id, "t1");

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(endpoint(&req), "/contents/t1/generate");
        assert_eq!(
            req.json_body(),
            Some(json!({ "type": "both", "article_length": 500, "script_duration": 30 }))
        );
    }

    #[test]
    fn regenerate_content_passes_explicit_lengths() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(200, &json!({ "data": content_json(3) })));

        let params = GenerateContentParams {
            kind: GenerationType::Article,
            article_length: Some(800),
            script_duration: Some(60),
        };
        client.contents().regenerate_content("t1", &params).unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(endpoint(&req), "/contents/t1/regenerate");
        assert_eq!(
            req.json_body(),
            Some(json!({ "type": "article", "article_length": 800, "script_duration": 60 }))
        );
    }

    #[test]
    fn get_content_not_found_is_none() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(404, &json!({ "detail": "no content" })));
        assert_eq!(client.contents().get_content("t1").unwrap(), None);
    }

    #[test]
    fn get_content_versions_accepts_bare_and_wrapped_lists() {
        let (client, transport) = fixture_client();
        transport
            .push_response(HttpResponse::json(200, &json!([content_json(1), content_json(2)])))
            .push_response(HttpResponse::json(200, &json!({ "data": [content_json(1)] })));

        assert_eq!(client.contents().get_content_versions("t1").unwrap().len(), 2);
        assert_eq!(client.contents().get_content_versions("t1").unwrap().len(), 1);
    }

    #[test]
    fn update_content_sends_only_set_fields() {
        let (client, transport) = fixture_client();
        transport.push_response(HttpResponse::json(200, &content_json(1)));

        let update = ContentUpdate {
            script: Some("New script".to_string()),
            ..ContentUpdate::default()
        };
        client.contents().update_content("t1", &update).unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.json_body(), Some(json!({ "script": "New script" })));
    }
}
