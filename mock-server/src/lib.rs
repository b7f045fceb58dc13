//! In-memory stand-in for the content pipeline backend.
//!
//! Serves the REST surface under `/api/v1` with a small seeded data set.
//! Errors follow the backend's convention of a JSON `{ "detail": ... }`
//! body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";

const CATEGORIES: [&str; 3] = ["fashion", "food", "trend"];
const TOPIC_STATUSES: [&str; 3] = ["pending", "confirmed", "deleted"];
const SEARCH_RESULTS: u32 = 45;
const SEARCH_PROVIDERS: [&str; 3] = ["Unsplash", "Pexels", "Pixabay"];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: String,
    pub source: String,
    pub generated_at: String,
    pub updated_at: String,
    pub image_count: u32,
    pub word_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub topic_id: String,
    pub article: String,
    pub script: String,
    pub word_count: u32,
    pub estimated_duration: u32,
    pub model_used: String,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub topic_id: String,
    pub url: String,
    pub source: String,
    pub photographer: Option<String>,
    pub license: String,
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub date: String,
    pub time_slot: String,
    pub status: String,
    pub topics_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub user_id: String,
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Default)]
pub struct Store {
    /// Insertion order is the default listing order.
    pub topics: Vec<Topic>,
    /// Content versions per topic, oldest first.
    pub contents: HashMap<String, Vec<Content>>,
    pub images: HashMap<String, Vec<Image>>,
    pub schedules: Vec<Schedule>,
    pub interactions: Vec<Interaction>,
    pub scheduler_running: bool,
}

impl Store {
    /// Five topics across all categories. `topic-1` has one content version
    /// and three images.
    pub fn seeded() -> Self {
        let seeds = [
            ("topic-1", "Spring trench coats", "fashion", "pending", "2026-03-01T07:00:00"),
            ("topic-2", "Late-night ramen spots", "food", "confirmed", "2026-03-01T07:00:00"),
            ("topic-3", "Retro sneakers are back", "trend", "pending", "2026-03-01T19:00:00"),
            ("topic-4", "Street food markets", "food", "pending", "2026-02-28T19:00:00"),
            ("topic-5", "Minimalist wardrobes", "fashion", "confirmed", "2026-02-28T07:00:00"),
        ];
        let topics = seeds
            .iter()
            .map(|(id, title, category, status, at)| Topic {
                id: id.to_string(),
                title: title.to_string(),
                category: category.to_string(),
                status: status.to_string(),
                source: "google_trends".to_string(),
                generated_at: at.to_string(),
                updated_at: at.to_string(),
                image_count: 0,
                word_count: 0,
            })
            .collect();

        let mut store = Store {
            topics,
            scheduler_running: true,
            ..Store::default()
        };

        let content = generated_content("topic-1", "Spring trench coats", 1, 30);
        store.contents.insert("topic-1".to_string(), vec![content]);

        let images = (0..3u32)
            .map(|i| Image {
                id: format!("img-{}", i + 1),
                topic_id: "topic-1".to_string(),
                url: format!("https://images.example/trench-{}.jpg", i + 1),
                source: "Unsplash".to_string(),
                photographer: Some("Mika".to_string()),
                license: "Unsplash License".to_string(),
                order: i,
            })
            .collect();
        store.images.insert("topic-1".to_string(), images);

        for (date, slot, status, count, completed) in [
            ("2026-03-01", "07:00", "completed", 3, Some("2026-03-01T07:04:10")),
            ("2026-03-01", "19:00", "pending", 0, None),
            ("2026-02-28", "19:00", "completed", 3, Some("2026-02-28T19:03:55")),
        ] {
            store.schedules.push(Schedule {
                date: date.to_string(),
                time_slot: slot.to_string(),
                status: status.to_string(),
                topics_count: count,
                completed_at: completed.map(str::to_string),
            });
        }

        store.refresh_counts();
        store
    }

    fn topic(&self, id: &str) -> Result<&Topic, ApiFailure> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Topic {id} not found")))
    }

    fn topic_mut(&mut self, id: &str) -> Result<&mut Topic, ApiFailure> {
        self.topics
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiFailure::not_found(format!("Topic {id} not found")))
    }

    /// Derived per-topic counters.
    fn refresh_counts(&mut self) {
        for topic in &mut self.topics {
            topic.image_count = self.images.get(&topic.id).map_or(0, |v| v.len() as u32);
            topic.word_count = self
                .contents
                .get(&topic.id)
                .and_then(|v| v.last())
                .map_or(0, |c| c.word_count);
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error response in the backend's `{ "detail": ... }` format.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    fn invalid(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, detail = %self.detail, "Request rejected");
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiFailure>;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/topics", get(list_topics))
        .route("/topics/{id}", get(get_topic).put(update_topic).delete(delete_topic))
        .route("/topics/{id}/status", patch(update_topic_status))
        .route("/contents/{topic_id}", get(get_content).put(update_content))
        .route("/contents/{topic_id}/generate", post(generate_content))
        .route("/contents/{topic_id}/regenerate", post(generate_content))
        .route("/contents/{topic_id}/versions", get(content_versions))
        .route("/images/search", get(search_images))
        .route("/images/{topic_id}", get(list_images).post(create_image))
        .route("/images/{topic_id}/reorder", put(reorder_images))
        .route("/images/{topic_id}/match", post(match_images))
        .route("/images/{topic_id}/{image_id}", put(update_image).delete(delete_image))
        .route("/schedules", get(list_schedules))
        .route("/schedules/status", get(scheduler_status))
        .route("/schedules/start", post(start_scheduler))
        .route("/schedules/stop", post(stop_scheduler))
        .route("/schedules/generate", post(generate_topics))
        .route("/schedules/generate-today", post(generate_today))
        .route("/interactions", post(create_interaction))
        .route("/interactions/{user_id}", get(list_interactions))
        .route("/interactions/{user_id}/stats", get(interaction_stats))
        .with_state(db);

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn now() -> String {
    "2026-03-01T12:00:00".to_string()
}

fn pagination(page: u32, limit: u32, total: usize) -> Value {
    let total = total as u32;
    json!({
        "page": page,
        "limit": limit,
        "total": total,
        "total_pages": total.div_ceil(limit.max(1)),
    })
}

fn page_slice<T: Clone>(items: &[T], page: u32, limit: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    items.iter().skip(start).take(limit as usize).cloned().collect()
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TopicQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

async fn list_topics(State(db): State<Db>, Query(q): Query<TopicQuery>) -> Json<Value> {
    let store = db.read().await;
    let search = q.search.as_deref().map(str::to_lowercase);

    let mut topics: Vec<Topic> = store
        .topics
        .iter()
        .filter(|t| q.category.as_deref().map_or(true, |c| t.category == c))
        .filter(|t| match q.status.as_deref() {
            Some(s) => t.status == s,
            None => t.status != "deleted",
        })
        .filter(|t| q.date.as_deref().map_or(true, |d| t.generated_at.starts_with(d)))
        .filter(|t| {
            search
                .as_deref()
                .map_or(true, |s| t.title.to_lowercase().contains(s))
        })
        .cloned()
        .collect();

    if q.sort.as_deref() == Some("generated_at") {
        topics.sort_by(|a, b| a.generated_at.cmp(&b.generated_at));
        if q.order.as_deref() != Some("asc") {
            topics.reverse();
        }
    }

    let page = q.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = q.limit.filter(|l| *l > 0).unwrap_or(12);
    Json(json!({
        "data": page_slice(&topics, page, limit),
        "pagination": pagination(page, limit, topics.len()),
    }))
}

async fn get_topic(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Topic> {
    let store = db.read().await;
    Ok(Json(store.topic(&id)?.clone()))
}

#[derive(Debug, Deserialize)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

async fn update_topic(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<TopicPatch>,
) -> ApiResult<Topic> {
    if let Some(category) = input.category.as_deref() {
        check_category(category)?;
    }
    if let Some(status) = input.status.as_deref() {
        check_status(status)?;
    }
    let mut store = db.write().await;
    let topic = store.topic_mut(&id)?;
    if let Some(title) = input.title {
        topic.title = title;
    }
    if let Some(category) = input.category {
        topic.category = category;
    }
    if let Some(status) = input.status {
        topic.status = status;
    }
    topic.updated_at = now();
    Ok(Json(topic.clone()))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

async fn update_topic_status(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<StatusBody>,
) -> ApiResult<Value> {
    check_status(&input.status)?;
    let mut store = db.write().await;
    let topic = store.topic_mut(&id)?;
    topic.status = input.status;
    topic.updated_at = now();
    tracing::info!(topic = %id, status = %topic.status, "Topic status updated");
    Ok(Json(json!({ "message": "Topic status updated", "data": topic.clone() })))
}

async fn delete_topic(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Value> {
    let mut store = db.write().await;
    store.topic(&id)?;
    store.topics.retain(|t| t.id != id);
    store.contents.remove(&id);
    store.images.remove(&id);
    tracing::info!(topic = %id, "Topic deleted");
    Ok(Json(json!({ "message": "Topic deleted" })))
}

fn check_category(category: &str) -> Result<(), ApiFailure> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ApiFailure::invalid(format!("Invalid category: {category}")))
    }
}

fn check_status(status: &str) -> Result<(), ApiFailure> {
    if TOPIC_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiFailure::invalid(format!("Invalid status: {status}")))
    }
}

// ---------------------------------------------------------------------------
// Contents
// ---------------------------------------------------------------------------

fn generated_content(topic_id: &str, title: &str, version: u32, script_duration: u32) -> Content {
    let article = format!("{title}: what is new this season and why it matters.");
    Content {
        id: Uuid::new_v4().to_string(),
        topic_id: topic_id.to_string(),
        word_count: article.split_whitespace().count() as u32,
        article,
        script: format!("Open on {title}. Close on a question."),
        estimated_duration: script_duration,
        model_used: "mock-llm".to_string(),
        version,
    }
}

async fn get_content(State(db): State<Db>, Path(topic_id): Path<String>) -> ApiResult<Content> {
    let store = db.read().await;
    store.topic(&topic_id)?;
    store
        .contents
        .get(&topic_id)
        .and_then(|v| v.last())
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Content not found"))
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub article_length: Option<u32>,
    pub script_duration: Option<u32>,
}

async fn generate_content(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(input): Json<GenerateBody>,
) -> ApiResult<Content> {
    if !["article", "script", "both"].contains(&input.kind.as_str()) {
        return Err(ApiFailure::invalid(format!("Invalid type: {}", input.kind)));
    }
    let mut store = db.write().await;
    let title = store.topic(&topic_id)?.title.clone();
    let versions = store.contents.entry(topic_id.clone()).or_default();
    let content = generated_content(
        &topic_id,
        &title,
        versions.len() as u32 + 1,
        input.script_duration.unwrap_or(30),
    );
    versions.push(content.clone());
    store.refresh_counts();
    tracing::info!(
        topic = %topic_id,
        version = content.version,
        article_length = input.article_length.unwrap_or(500),
        "Content generated",
    );
    Ok(Json(content))
}

#[derive(Debug, Deserialize)]
pub struct ContentPatch {
    pub article: Option<String>,
    pub script: Option<String>,
}

async fn update_content(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(input): Json<ContentPatch>,
) -> ApiResult<Content> {
    let mut store = db.write().await;
    store.topic(&topic_id)?;
    let content = store
        .contents
        .get_mut(&topic_id)
        .and_then(|v| v.last_mut())
        .ok_or_else(|| ApiFailure::not_found("Content not found"))?;
    if let Some(article) = input.article {
        content.word_count = article.split_whitespace().count() as u32;
        content.article = article;
    }
    if let Some(script) = input.script {
        content.script = script;
    }
    let content = content.clone();
    store.refresh_counts();
    Ok(Json(content))
}

async fn content_versions(State(db): State<Db>, Path(topic_id): Path<String>) -> ApiResult<Vec<Content>> {
    let store = db.read().await;
    store.topic(&topic_id)?;
    Ok(Json(store.contents.get(&topic_id).cloned().unwrap_or_default()))
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

async fn list_images(State(db): State<Db>, Path(topic_id): Path<String>) -> ApiResult<Value> {
    let store = db.read().await;
    store.topic(&topic_id)?;
    let mut images = store.images.get(&topic_id).cloned().unwrap_or_default();
    images.sort_by_key(|i| i.order);
    Ok(Json(json!({ "data": images })))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub source: Option<String>,
}

async fn search_images(Query(q): Query<SearchQuery>) -> ApiResult<Value> {
    let keywords = q
        .keywords
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiFailure::invalid("keywords is required"))?;
    let page = q.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = q.limit.filter(|l| *l > 0).unwrap_or(20);

    let providers: Vec<&str> = match q.source.as_deref() {
        Some(source) => vec![source],
        None => SEARCH_PROVIDERS.to_vec(),
    };
    // The first provider answers; any others are never tried.
    let provider = providers[0];
    let slug = keywords.replace(' ', "-");
    let all: Vec<Image> = (0..SEARCH_RESULTS)
        .map(|i| Image {
            id: format!("search-{slug}-{i}"),
            topic_id: String::new(),
            url: format!("https://images.example/{slug}/{i}.jpg"),
            source: provider.to_string(),
            photographer: None,
            license: format!("{provider} License"),
            order: i,
        })
        .collect();

    Ok(Json(json!({
        "data": page_slice(&all, page, limit),
        "pagination": pagination(page, limit, all.len()),
        "source": provider,
        "attempts": [{ "source": provider, "status": "success", "count": all.len() }],
        "trace_id": Uuid::new_v4().simple().to_string(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct NewImage {
    pub topic_id: Option<String>,
    pub url: String,
    pub source: String,
    pub photographer: Option<String>,
    pub license: String,
    pub order: Option<u32>,
}

async fn create_image(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(input): Json<NewImage>,
) -> ApiResult<Image> {
    if input.topic_id.as_deref().is_some_and(|t| t != topic_id) {
        return Err(ApiFailure::invalid("topic_id does not match path"));
    }
    let mut store = db.write().await;
    store.topic(&topic_id)?;
    let images = store.images.entry(topic_id.clone()).or_default();
    let image = Image {
        id: Uuid::new_v4().to_string(),
        topic_id: topic_id.clone(),
        url: input.url,
        source: input.source,
        photographer: input.photographer,
        license: input.license,
        order: input.order.unwrap_or(images.len() as u32),
    };
    images.push(image.clone());
    store.refresh_counts();
    Ok(Json(image))
}

#[derive(Debug, Deserialize)]
pub struct ImagePatch {
    pub url: Option<String>,
    pub source: Option<String>,
    pub photographer: Option<String>,
    pub license: Option<String>,
    pub order: Option<u32>,
}

async fn update_image(
    State(db): State<Db>,
    Path((topic_id, image_id)): Path<(String, String)>,
    Json(input): Json<ImagePatch>,
) -> ApiResult<Image> {
    let mut store = db.write().await;
    let image = store
        .images
        .get_mut(&topic_id)
        .and_then(|v| v.iter_mut().find(|i| i.id == image_id))
        .ok_or_else(|| ApiFailure::not_found(format!("Image {image_id} not found")))?;
    if let Some(url) = input.url {
        image.url = url;
    }
    if let Some(source) = input.source {
        image.source = source;
    }
    if input.photographer.is_some() {
        image.photographer = input.photographer;
    }
    if let Some(license) = input.license {
        image.license = license;
    }
    if let Some(order) = input.order {
        image.order = order;
    }
    Ok(Json(image.clone()))
}

async fn delete_image(
    State(db): State<Db>,
    Path((topic_id, image_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    let images = store
        .images
        .get_mut(&topic_id)
        .ok_or_else(|| ApiFailure::not_found(format!("Image {image_id} not found")))?;
    let before = images.len();
    images.retain(|i| i.id != image_id);
    if images.len() == before {
        return Err(ApiFailure::not_found(format!("Image {image_id} not found")));
    }
    store.refresh_counts();
    Ok(Json(json!({ "message": "Image deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub image_orders: Vec<ImageOrder>,
}

#[derive(Debug, Deserialize)]
pub struct ImageOrder {
    pub image_id: String,
    pub order: u32,
}

/// The new orders must name every image of the topic exactly once and form
/// the sequence `0..n`.
async fn reorder_images(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Json(input): Json<ReorderBody>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    store.topic(&topic_id)?;
    let images = store.images.entry(topic_id.clone()).or_default();

    let mut orders: Vec<u32> = input.image_orders.iter().map(|o| o.order).collect();
    orders.sort_unstable();
    let contiguous = orders.iter().zip(0u32..).all(|(o, i)| *o == i);
    let covers_all = input.image_orders.len() == images.len()
        && images
            .iter()
            .all(|img| input.image_orders.iter().filter(|o| o.image_id == img.id).count() == 1);
    if !contiguous || !covers_all {
        return Err(ApiFailure::invalid(
            "image_orders must list every image once with orders 0..n",
        ));
    }

    for img in images.iter_mut() {
        if let Some(o) = input.image_orders.iter().find(|o| o.image_id == img.id) {
            img.order = o.order;
        }
    }
    tracing::info!(topic = %topic_id, count = orders.len(), "Images reordered");
    Ok(Json(json!({ "message": "Images reordered", "data": { "topic_id": topic_id } })))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub min_count: Option<u32>,
}

/// Top the topic up with stock images until it has at least `min_count`.
async fn match_images(
    State(db): State<Db>,
    Path(topic_id): Path<String>,
    Query(q): Query<MatchQuery>,
) -> ApiResult<Value> {
    let min_count = q.min_count.unwrap_or(8);
    let mut store = db.write().await;
    store.topic(&topic_id)?;
    let images = store.images.entry(topic_id.clone()).or_default();
    while (images.len() as u32) < min_count {
        let order = images.len() as u32;
        images.push(Image {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.clone(),
            url: format!("https://images.example/{topic_id}/match-{order}.jpg"),
            source: "Pexels".to_string(),
            photographer: None,
            license: "Pexels License".to_string(),
            order,
        });
    }
    let mut matched = images.clone();
    matched.sort_by_key(|i| i.order);
    store.refresh_counts();
    Ok(Json(json!({ "data": matched })))
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

async fn list_schedules(State(db): State<Db>, Query(q): Query<ScheduleQuery>) -> Json<Value> {
    let store = db.read().await;
    let schedules: Vec<&Schedule> = store
        .schedules
        .iter()
        .filter(|s| q.date.as_deref().map_or(true, |d| s.date == d))
        .collect();
    Json(json!({ "data": schedules }))
}

async fn scheduler_status(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    if store.scheduler_running {
        Json(json!({
            "status": "running",
            "jobs": [
                { "id": "daily-07", "next_run_time": "2026-03-02T07:00:00" },
                { "id": "daily-19", "next_run_time": "2026-03-01T19:00:00" },
            ],
        }))
    } else {
        Json(json!({ "status": "stopped", "jobs": [] }))
    }
}

async fn start_scheduler(State(db): State<Db>) -> Json<Value> {
    db.write().await.scheduler_running = true;
    tracing::info!("Scheduler started");
    Json(json!({ "message": "Scheduler started", "status": "running" }))
}

async fn stop_scheduler(State(db): State<Db>) -> Json<Value> {
    db.write().await.scheduler_running = false;
    tracing::info!("Scheduler stopped");
    Json(json!({ "message": "Scheduler stopped", "status": "stopped" }))
}

#[derive(Debug, Deserialize)]
pub struct GenerateTopicsBody {
    pub category: String,
    #[serde(default)]
    pub count: Option<u32>,
}

async fn generate_topics(State(db): State<Db>, Json(input): Json<GenerateTopicsBody>) -> ApiResult<Value> {
    check_category(&input.category)?;
    let count = input.count.unwrap_or(3);
    let mut store = db.write().await;
    for n in 0..count {
        store.topics.push(Topic {
            id: Uuid::new_v4().to_string(),
            title: format!("Generated {} topic {}", input.category, n + 1),
            category: input.category.clone(),
            status: "pending".to_string(),
            source: "manual".to_string(),
            generated_at: now(),
            updated_at: now(),
            image_count: 0,
            word_count: 0,
        });
    }
    tracing::info!(category = %input.category, count, "Topics generated");
    Ok(Json(json!({
        "message": "Topic generation completed",
        "category": input.category,
        "count": count,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateTodayBody {
    #[serde(default)]
    pub force: bool,
}

async fn generate_today(State(db): State<Db>, Json(input): Json<GenerateTodayBody>) -> Json<Value> {
    let store = db.read().await;
    let now = now();
    let today = &now[..10];
    let existing = store
        .topics
        .iter()
        .filter(|t| t.generated_at.starts_with(today))
        .count();
    let message = if input.force || existing == 0 {
        "Generation started for all categories"
    } else {
        "Topics already exist for today"
    };
    Json(json!({
        "message": message,
        "categories": CATEGORIES,
        "expected_count": CATEGORIES.len() * 3,
        "existing_count": existing,
    }))
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NewInteraction {
    pub user_id: String,
    pub topic_id: String,
    pub article_id: Option<String>,
    pub photo_id: Option<String>,
    pub script_id: Option<String>,
    pub action: String,
    pub duration: Option<f64>,
}

async fn create_interaction(State(db): State<Db>, Json(input): Json<NewInteraction>) -> ApiResult<Interaction> {
    if !["like", "dislike", "edit", "replace", "view"].contains(&input.action.as_str()) {
        return Err(ApiFailure::invalid(format!("Invalid action: {}", input.action)));
    }
    let mut store = db.write().await;
    let category = store.topic(&input.topic_id)?.category.clone();
    let interaction = Interaction {
        id: Uuid::new_v4().to_string(),
        user_id: input.user_id,
        topic_id: input.topic_id,
        article_id: input.article_id,
        photo_id: input.photo_id,
        script_id: input.script_id,
        action: input.action,
        duration: input.duration,
        category: Some(category),
        created_at: now(),
    };
    store.interactions.push(interaction.clone());
    Ok(Json(interaction))
}

#[derive(Debug, Deserialize)]
pub struct InteractionFilter {
    pub action: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

async fn list_interactions(
    State(db): State<Db>,
    Path(user_id): Path<String>,
    Query(q): Query<InteractionFilter>,
) -> Json<Value> {
    let store = db.read().await;
    let matching: Vec<Interaction> = store
        .interactions
        .iter()
        .filter(|i| i.user_id == user_id)
        .filter(|i| q.action.as_deref().map_or(true, |a| i.action == a))
        .filter(|i| q.category.is_none() || i.category == q.category)
        .cloned()
        .collect();
    let page = q.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = q.limit.filter(|l| *l > 0).unwrap_or(20);
    let total = matching.len() as u32;
    Json(json!({
        "user_id": user_id,
        "interactions": page_slice(&matching, page, limit),
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "totalPages": total.div_ceil(limit),
        },
    }))
}

async fn interaction_stats(State(db): State<Db>, Path(user_id): Path<String>) -> Json<Value> {
    let store = db.read().await;
    let mine: Vec<&Interaction> = store.interactions.iter().filter(|i| i.user_id == user_id).collect();
    let count = |action: &str| mine.iter().filter(|i| i.action == action).count();

    let views: Vec<f64> = mine
        .iter()
        .filter(|i| i.action == "view")
        .filter_map(|i| i.duration)
        .collect();
    let avg_view_time = if views.is_empty() {
        0.0
    } else {
        views.iter().sum::<f64>() / views.len() as f64
    };

    let mut distribution: HashMap<String, (u32, u32)> = HashMap::new();
    for i in &mine {
        let Some(category) = i.category.clone() else { continue };
        let entry = distribution.entry(category).or_default();
        match i.action.as_str() {
            "like" => entry.0 += 1,
            "dislike" => entry.1 += 1,
            _ => {}
        }
    }
    let distribution: serde_json::Map<String, Value> = distribution
        .into_iter()
        .map(|(k, (likes, dislikes))| (k, json!({ "likes": likes, "dislikes": dislikes })))
        .collect();

    Json(json!({
        "user_id": user_id,
        "stats": {
            "total_likes": count("like"),
            "total_dislikes": count("dislike"),
            "total_edits": count("edit"),
            "total_replaces": count("replace"),
            "total_views": count("view"),
            "avg_view_time": avg_view_time,
            "category_distribution": distribution,
        },
    }))
}
