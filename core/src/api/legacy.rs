//! Flat facade kept for older call sites.
//!
//! Everything here forwards to a resource client. Only `generate_content`
//! and `search_images` take positional arguments and build the parameter
//! struct themselves.

use super::contents::{ContentUpdate, GenerateContentParams, GenerationType};
use super::images::{ImageCreate, ImageOrder, ImageSearchParams, ImageUpdate, DEFAULT_MATCH_COUNT};
use super::schedules::{GenerateTopicsResult, SchedulerAck, SchedulerStatus};
use super::topics::{TopicFilters, TopicUpdate};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Category, Content, Image, Paginated, Schedule, Topic, TopicStatus};

pub struct LegacyApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LegacyApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn get_topics(&self, filters: &TopicFilters) -> Result<Paginated<Topic>, ApiError> {
        self.client.topics().get_topics(filters)
    }

    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>, ApiError> {
        self.client.topics().get_topic(id)
    }

    pub fn update_topic(&self, id: &str, update: &TopicUpdate) -> Result<Topic, ApiError> {
        self.client.topics().update_topic(id, update)
    }

    pub fn update_topic_status(&self, id: &str, status: TopicStatus) -> Result<Topic, ApiError> {
        self.client.topics().update_topic_status(id, status)
    }

    pub fn delete_topic(&self, id: &str) -> Result<(), ApiError> {
        self.client.topics().delete_topic(id)
    }

    pub fn get_content(&self, topic_id: &str) -> Result<Option<Content>, ApiError> {
        self.client.contents().get_content(topic_id)
    }

    /// Unset lengths fall back to 500 characters and 30 seconds.
    pub fn generate_content(
        &self,
        topic_id: &str,
        kind: GenerationType,
        article_length: Option<u32>,
        script_duration: Option<u32>,
    ) -> Result<Content, ApiError> {
        let params = GenerateContentParams {
            kind,
            article_length,
            script_duration,
        };
        self.client.contents().generate_content(topic_id, &params)
    }

    pub fn update_content(&self, topic_id: &str, update: &ContentUpdate) -> Result<Content, ApiError> {
        self.client.contents().update_content(topic_id, update)
    }

    pub fn get_content_versions(&self, topic_id: &str) -> Result<Vec<Content>, ApiError> {
        self.client.contents().get_content_versions(topic_id)
    }

    pub fn regenerate_content(&self, topic_id: &str, params: &GenerateContentParams) -> Result<Content, ApiError> {
        self.client.contents().regenerate_content(topic_id, params)
    }

    pub fn get_images(&self, topic_id: &str) -> Result<Vec<Image>, ApiError> {
        self.client.images().get_images(topic_id)
    }

    /// Search and return only the images; pagination and provider
    /// diagnostics are dropped.
    pub fn search_images(&self, keywords: &str, page: Option<u32>, limit: Option<u32>) -> Result<Vec<Image>, ApiError> {
        let params = ImageSearchParams {
            page,
            limit,
            ..ImageSearchParams::new(keywords)
        };
        Ok(self.client.images().search_images(&params)?.data)
    }

    pub fn create_image(&self, topic_id: &str, image: &ImageCreate) -> Result<Image, ApiError> {
        self.client.images().create_image(topic_id, image)
    }

    pub fn update_image(&self, topic_id: &str, image_id: &str, update: &ImageUpdate) -> Result<Image, ApiError> {
        self.client.images().update_image(topic_id, image_id, update)
    }

    pub fn delete_image(&self, topic_id: &str, image_id: &str) -> Result<(), ApiError> {
        self.client.images().delete_image(topic_id, image_id)
    }

    pub fn reorder_images(&self, topic_id: &str, orders: &[ImageOrder]) -> Result<(), ApiError> {
        self.client.images().reorder_images(topic_id, orders)
    }

    /// `min_count` defaults to 8.
    pub fn match_photos(&self, topic_id: &str, min_count: Option<u32>) -> Result<Vec<Image>, ApiError> {
        self.client
            .images()
            .match_photos(topic_id, min_count.unwrap_or(DEFAULT_MATCH_COUNT))
    }

    pub fn get_schedules(&self, date: Option<&str>) -> Result<Vec<Schedule>, ApiError> {
        self.client.schedules().get_schedules(date)
    }

    pub fn manual_generate_topics(&self, category: Category, count: u32) -> Result<GenerateTopicsResult, ApiError> {
        self.client.schedules().manual_generate_topics(category, count)
    }

    pub fn start_scheduler(&self) -> Result<SchedulerAck, ApiError> {
        self.client.schedules().start_scheduler()
    }

    pub fn stop_scheduler(&self) -> Result<SchedulerAck, ApiError> {
        self.client.schedules().stop_scheduler()
    }

    pub fn get_scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        self.client.schedules().get_scheduler_status()
    }
}
