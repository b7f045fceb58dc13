//! User interaction tracking: likes, edits, views and their statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{segment, Query};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::PageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionAction {
    Like,
    Dislike,
    Edit,
    Replace,
    View,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::Like => "like",
            InteractionAction::Dislike => "dislike",
            InteractionAction::Edit => "edit",
            InteractionAction::Replace => "replace",
            InteractionAction::View => "view",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateInteraction {
    pub user_id: String,
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    pub action: InteractionAction,
    /// Seconds spent, for `view`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl CreateInteraction {
    pub fn new(user_id: impl Into<String>, topic_id: impl Into<String>, action: InteractionAction) -> Self {
        Self {
            user_id: user_id.into(),
            topic_id: topic_id.into(),
            article_id: None,
            photo_id: None,
            script_id: None,
            action,
            duration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub user_id: String,
    pub topic_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    pub action: InteractionAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Filters for the interaction history; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionQuery {
    pub action: Option<InteractionAction>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl InteractionQuery {
    fn endpoint(&self, user_id: &str) -> String {
        Query::new()
            .push_opt("action", self.action.map(|a| a.as_str()))
            .push_opt("category", self.category.as_deref().filter(|c| !c.is_empty()))
            .push_opt("start_date", self.start_date.as_deref().filter(|d| !d.is_empty()))
            .push_opt("end_date", self.end_date.as_deref().filter(|d| !d.is_empty()))
            .push_opt("page", self.page.filter(|p| *p > 0))
            .push_opt("limit", self.limit.filter(|l| *l > 0))
            .finish(&format!("/interactions/{}", segment(user_id)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionList {
    pub user_id: String,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub pagination: PageInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFeedback {
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInteractionStats {
    pub total_likes: u32,
    pub total_dislikes: u32,
    pub total_edits: u32,
    pub total_replaces: u32,
    pub total_views: u32,
    /// Seconds.
    pub avg_view_time: f64,
    pub category_distribution: BTreeMap<String, CategoryFeedback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionStats {
    pub user_id: String,
    #[serde(default)]
    pub stats: UserInteractionStats,
}

pub struct InteractionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InteractionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn create_interaction(&self, interaction: &CreateInteraction) -> Result<Interaction, ApiError> {
        self.client
            .fetch_json("/interactions", RequestConfig::post().json(interaction)?)
    }

    pub fn get_interactions(&self, user_id: &str, query: &InteractionQuery) -> Result<InteractionList, ApiError> {
        self.client
            .fetch_json(&query.endpoint(user_id), RequestConfig::get())
    }

    pub fn get_interaction_stats(&self, user_id: &str) -> Result<InteractionStats, ApiError> {
        self.client
            .fetch_json(&format!("/interactions/{}/stats", segment(user_id)), RequestConfig::get())
    }
}
