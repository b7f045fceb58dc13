//! Topic listing, lookup and lifecycle updates.

use serde::Serialize;

use super::{not_found_as_none, segment, Query};
use crate::client::{decode_all, ApiClient};
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::{Category, Paginated, Pagination, SortOrder, Topic, TopicRecord, TopicStatus};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 12;

/// Filters for `get_topics`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilters {
    pub category: Option<Category>,
    pub status: Option<TopicStatus>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl TopicFilters {
    fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// `/topics` with the query for these filters. Page and limit are always
    /// present; a blank search is dropped.
    pub fn endpoint(&self) -> String {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        Query::new()
            .push_opt("category", self.category.map(|c| c.as_str()))
            .push_opt("status", self.status.map(|s| s.as_str()))
            .push_opt("date", self.date.as_deref())
            .push_opt("search", search)
            .push("page", self.page())
            .push("limit", self.limit())
            .push_opt("sort", self.sort.as_deref())
            .push_opt("order", self.order.map(|o| o.as_str()))
            .finish("/topics")
    }
}

/// Partial topic update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Serialize)]
struct StatusBody {
    status: TopicStatus,
}

pub struct TopicsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TopicsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of topics. Pagination is completed locally from the request
    /// and the page contents when the server leaves fields out.
    pub fn get_topics(&self, filters: &TopicFilters) -> Result<Paginated<Topic>, ApiError> {
        let page = self
            .client
            .fetch_api_with_pagination(&filters.endpoint(), RequestConfig::get())?;
        let records: Vec<TopicRecord> = decode_all(page.data)?;
        let pagination =
            Pagination::normalize(&page.pagination, filters.page(), filters.limit(), records.len());
        Ok(Paginated {
            data: records.into_iter().map(Topic::from).collect(),
            pagination,
        })
    }

    /// `None` when the topic does not exist.
    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>, ApiError> {
        let record = not_found_as_none(
            self.client
                .fetch_optional::<TopicRecord>(&format!("/topics/{}", segment(id)), RequestConfig::get()),
        )?;
        if record.is_none() {
            tracing::debug!(topic_id = id, "Topic not found");
        }
        Ok(record.map(Topic::from))
    }

    pub fn update_topic(&self, id: &str, update: &TopicUpdate) -> Result<Topic, ApiError> {
        let record: TopicRecord = self
            .client
            .fetch_json(&format!("/topics/{}", segment(id)), RequestConfig::put().json(update)?)?;
        Ok(record.into())
    }

    /// Change only the lifecycle status.
    pub fn update_topic_status(&self, id: &str, status: TopicStatus) -> Result<Topic, ApiError> {
        let record: TopicRecord = self.client.fetch_json(
            &format!("/topics/{}/status", segment(id)),
            RequestConfig::patch().json(&StatusBody { status })?,
        )?;
        Ok(record.into())
    }

    pub fn delete_topic(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .fetch_api(&format!("/topics/{}", segment(id)), RequestConfig::delete())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The topic list's filter selection and the currently selected topic.
///
/// Owned by whichever view drives the topic list; nothing here is global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicFilterState {
    pub category: Option<Category>,
    pub status: Option<TopicStatus>,
    pub date: Option<String>,
    pub selected: Option<Topic>,
}

/// A partial change to `TopicFilterState`. The outer `Option` says whether
/// the field changes; the inner one is the new value (`None` clears it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub category: Option<Option<Category>>,
    pub status: Option<Option<TopicStatus>>,
    pub date: Option<Option<String>>,
}

impl TopicFilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    /// Clear the filters; the selected topic is kept.
    pub fn reset(&mut self) {
        self.category = None;
        self.status = None;
        self.date = None;
    }

    pub fn select(&mut self, topic: Option<Topic>) {
        self.selected = topic;
    }

    pub fn to_filters(&self, page: u32, limit: u32) -> TopicFilters {
        TopicFilters {
            category: self.category,
            status: self.status,
            date: self.date.clone(),
            page: Some(page),
            limit: Some(limit),
            ..TopicFilters::default()
        }
    }
}
