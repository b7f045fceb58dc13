//! Domain models shared by the resource clients.
//!
//! # Design
//! Each entity has two shapes. The `*Record` type mirrors what the backend
//! sends (snake_case, most fields optional); the public type is what callers
//! see (camelCase when serialized, every field present). Converting a record
//! applies the defaults exactly once, at the boundary, so nothing downstream
//! has to guess whether a count or a license may be missing.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fashion,
    Food,
    Trend,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Food => "food",
            Category::Trend => "trend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Pending,
    Confirmed,
    Deleted,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Pending => "pending",
            TopicStatus::Confirmed => "confirmed",
            TopicStatus::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Completed,
    Processing,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Image providers the backend can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Unsplash,
    Pexels,
    Pixabay,
    GoogleCustomSearch,
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
}

impl ImageSource {
    /// The display name the backend expects in the `source` query parameter.
    pub fn backend_name(&self) -> &'static str {
        match self {
            ImageSource::Unsplash => "Unsplash",
            ImageSource::Pexels => "Pexels",
            ImageSource::Pixabay => "Pixabay",
            ImageSource::GoogleCustomSearch => "Google Custom Search",
            ImageSource::DuckDuckGo => "DuckDuckGo",
        }
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub status: TopicStatus,
    pub source: String,
    pub generated_at: String,
    pub updated_at: String,
    pub image_count: u32,
    pub word_count: u32,
}

/// Topic as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicRecord {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub status: TopicStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, alias = "generatedAt", deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(default, alias = "updatedAt", deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default)]
    pub image_count: Option<u32>,
    #[serde(default)]
    pub word_count: Option<u32>,
}

impl From<TopicRecord> for Topic {
    fn from(r: TopicRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            category: r.category,
            status: r.status,
            source: r.source,
            generated_at: r.generated_at,
            updated_at: r.updated_at,
            image_count: r.image_count.unwrap_or(0),
            word_count: r.word_count.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub topic_id: String,
    pub article: String,
    pub script: String,
    pub word_count: u32,
    /// Seconds.
    pub estimated_duration: u32,
    pub model_used: String,
    pub version: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub article: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub script: String,
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model_used: String,
    #[serde(default)]
    pub version: Option<u32>,
}

impl From<ContentRecord> for Content {
    fn from(r: ContentRecord) -> Self {
        Self {
            id: r.id,
            topic_id: r.topic_id,
            article: r.article,
            script: r.script,
            word_count: r.word_count.unwrap_or(0),
            estimated_duration: r.estimated_duration.unwrap_or(0),
            model_used: r.model_used,
            version: r.version.filter(|v| *v > 0).unwrap_or(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub topic_id: String,
    pub url: String,
    /// Provider display name, e.g. `"Unsplash"`.
    pub source: String,
    pub photographer: String,
    pub license: String,
    /// Display and playback position within the topic.
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_id: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photographer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub license: String,
    #[serde(default)]
    pub order: Option<u32>,
}

impl From<ImageRecord> for Image {
    fn from(r: ImageRecord) -> Self {
        Self {
            id: r.id,
            topic_id: r.topic_id,
            url: r.url,
            source: r.source,
            photographer: r.photographer,
            license: r.license,
            order: r.order.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// One time slot of the daily generation schedule. The backend already
/// emits these fields in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub date: String,
    pub time_slot: String,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub topics_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination block exactly as the server sent it; any field may be absent.
/// Accepts both `totalPages` and the backend's `total_pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, alias = "total_pages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

/// Fully populated pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Fill the gaps in `info` from the request and the page contents.
    ///
    /// Zero values count as missing: the requested page and limit stand in
    /// for page and limit, the item count for the total, and the page count
    /// is derived from the total.
    pub fn normalize(info: &PageInfo, page: u32, limit: u32, item_count: usize) -> Self {
        let page = info.page.filter(|p| *p > 0).unwrap_or(page);
        let limit = info.limit.filter(|l| *l > 0).unwrap_or(limit);
        let total = info.total.filter(|t| *t > 0).unwrap_or(item_count as u64);
        let total_pages = info
            .total_pages
            .filter(|t| *t > 0)
            .unwrap_or_else(|| match limit {
                0 => 0,
                limit => total.div_ceil(u64::from(limit)),
            });
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of items with normalized pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
