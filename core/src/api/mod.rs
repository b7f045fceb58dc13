//! Resource clients, one per backend resource.
//!
//! Each client borrows the shared `ApiClient` and turns typed parameters
//! into an endpoint path, query string and JSON body, then converts the
//! response into the crate's models. Errors are propagated unchanged; the
//! only interception is turning 404 into `None` where "not found" is a
//! valid answer.

mod contents;
mod discover;
mod images;
mod interactions;
mod legacy;
mod recommendations;
mod schedules;
mod topics;
mod validate;

pub use contents::{ContentUpdate, ContentsApi, GenerateContentParams, GenerationType};
pub use discover::{
    DiscoverApi, DiscoverTopicsRequest, DiscoverTopicsResponse, DiscoveredTopic, Ranking,
    RankingsQuery, RankingsResponse, TopicSource, TopicValidation, Trend,
};
pub use images::{
    ImageCreate, ImageOrder, ImageSearchAttempt, ImageSearchParams, ImageSearchResponse,
    ImageUpdate, ImagesApi, MatchValidation, MatchValidationItem,
};
pub use interactions::{
    CategoryFeedback, CreateInteraction, Interaction, InteractionAction, InteractionList,
    InteractionQuery, InteractionStats, InteractionsApi, UserInteractionStats,
};
pub use legacy::LegacyApi;
pub use recommendations::{
    Effectiveness, HistoryQuery, InteractionResult, Recommendation, RecommendationHistory,
    RecommendationList, RecommendationQuery, RecommendationsApi,
};
pub use schedules::{
    GenerateTodayResult, GenerateTopicsResult, SchedulerAck, SchedulerJob, SchedulerStatus,
    SchedulesApi,
};
pub use topics::{FilterPatch, TopicFilterState, TopicFilters, TopicUpdate, TopicsApi};
pub use validate::{
    ConsistencyResult, FailedSource, HealthStatus, SourceHealth, SourceRef, ValidateApi,
    ValidateConsistencyRequest, ValidateSourcesRequest, ValidateSourcesResponse,
    ValidatedSource, ValidationSummary,
};

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use url::form_urlencoded;

use crate::error::ApiError;

/// Characters escaped in a single path segment. Leaves the unreserved
/// marks `- _ . ! ~ * ' ( )` alone.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `value` escaped for use as one path segment: an ID or a whole URL.
pub(crate) fn segment(value: &str) -> PercentEncode<'_> {
    utf8_percent_encode(value, SEGMENT)
}

/// Accumulates query parameters, skipping the ones that are unset.
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub(crate) fn push_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// `path` with the encoded query appended, or `path` alone when empty.
    pub(crate) fn finish(self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{path}?{query}")
    }
}

/// Turn a 404 into `Ok(None)`; every other outcome passes through.
pub(crate) fn not_found_as_none<T>(result: Result<Option<T>, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Err(e) if e.is_not_found() => Ok(None),
        other => other,
    }
}
