//! Daily generation schedule and the backend scheduler service.

use serde::{Deserialize, Serialize};

use super::Query;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::interceptors::RequestConfig;
use crate::types::{Category, Schedule};

/// Topics generated per manual run when the caller passes zero.
pub const DEFAULT_GENERATE_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTopicsResult {
    #[serde(default)]
    pub message: String,
    pub category: String,
    pub count: u32,
}

/// Reply to start/stop requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerAck {
    #[serde(default)]
    pub message: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerJob {
    pub id: String,
    #[serde(default)]
    pub next_run_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub status: String,
    #[serde(default)]
    pub jobs: Vec<SchedulerJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTodayResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub expected_count: u32,
    #[serde(default)]
    pub existing_count: u32,
}

#[derive(Serialize)]
struct GenerateBody {
    category: Category,
    count: u32,
}

#[derive(Serialize)]
struct GenerateTodayBody {
    force: bool,
}

pub struct SchedulesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SchedulesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Schedule slots, optionally for a single `YYYY-MM-DD` date.
    pub fn get_schedules(&self, date: Option<&str>) -> Result<Vec<Schedule>, ApiError> {
        let endpoint = Query::new().push_opt("date", date).finish("/schedules");
        Ok(self
            .client
            .fetch_optional(&endpoint, RequestConfig::get())?
            .unwrap_or_default())
    }

    pub fn manual_generate_topics(&self, category: Category, count: u32) -> Result<GenerateTopicsResult, ApiError> {
        let count = if count == 0 { DEFAULT_GENERATE_COUNT } else { count };
        tracing::info!(category = category.as_str(), count, "Triggering manual topic generation");
        let body = GenerateBody { category, count };
        self.client
            .fetch_json("/schedules/generate", RequestConfig::post().json(&body)?)
    }

    pub fn start_scheduler(&self) -> Result<SchedulerAck, ApiError> {
        self.client.fetch_json("/schedules/start", RequestConfig::post())
    }

    pub fn stop_scheduler(&self) -> Result<SchedulerAck, ApiError> {
        self.client.fetch_json("/schedules/stop", RequestConfig::post())
    }

    pub fn get_scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        self.client.fetch_json("/schedules/status", RequestConfig::get())
    }

    /// Generate every category for today. Without `force` the backend skips
    /// slots that already have topics.
    pub fn generate_today_all_topics(&self, force: bool) -> Result<GenerateTodayResult, ApiError> {
        let body = GenerateTodayBody { force };
        self.client
            .fetch_json("/schedules/generate-today", RequestConfig::post().json(&body)?)
    }
}
