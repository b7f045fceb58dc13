use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Content, Image, Topic};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- topics ---

#[tokio::test]
async fn list_topics_returns_envelope_with_pagination() {
    let resp = app()
        .oneshot(get_request("/api/v1/topics?page=1&limit=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn list_topics_filters_by_category_and_search() {
    let resp = app()
        .oneshot(get_request("/api/v1/topics?category=food&search=RAMEN"))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    let topics: Vec<Topic> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].id, "topic-2");
}

#[tokio::test]
async fn get_topic_not_found_has_detail() {
    let resp = app().oneshot(get_request("/api/v1/topics/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Topic missing not found");
}

#[tokio::test]
async fn update_status_rejects_unknown_value() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/api/v1/topics/topic-1/status",
            r#"{"status":"archived"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid status: archived");
}

// --- contents ---

#[tokio::test]
async fn content_missing_for_topic_without_generation() {
    let resp = app().oneshot(get_request("/api/v1/contents/topic-2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_content_rejects_bad_type() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/contents/topic-1/generate",
            r#"{"type":"poem"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- images ---

#[tokio::test]
async fn search_reports_provider_and_attempts() {
    let resp = app()
        .oneshot(get_request(
            "/api/v1/images/search?keywords=street+food&page=3&limit=20&source=Pexels",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["source"], "Pexels");
    assert_eq!(body["attempts"][0]["status"], "success");
    assert!(body["trace_id"].is_string());
}

#[tokio::test]
async fn search_requires_keywords() {
    let resp = app()
        .oneshot(get_request("/api/v1/images/search?keywords=%20"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reorder_rejects_gaps() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/v1/images/topic-1/reorder",
            r#"{"image_orders":[
                {"image_id":"img-1","order":0},
                {"image_id":"img-2","order":2},
                {"image_id":"img-3","order":3}
            ]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reorder_rejects_partial_lists() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/v1/images/topic-1/reorder",
            r#"{"image_orders":[{"image_id":"img-1","order":0}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn match_tops_up_to_min_count() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v1/images/topic-1/match?min_count=5", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    let images: Vec<Image> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(images.len(), 5);
    let orders: Vec<u32> = images.iter().map(|i| i.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
}

// --- schedules ---

#[tokio::test]
async fn schedules_filter_by_date() {
    let resp = app()
        .oneshot(get_request("/api/v1/schedules?date=2026-02-28"))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["timeSlot"], "19:00");
}

#[tokio::test]
async fn health_is_outside_api_prefix() {
    let resp = app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full lifecycle ---

#[tokio::test]
async fn content_and_image_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // generate a second version
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/contents/topic-1/generate",
            r#"{"type":"both","article_length":500,"script_duration":45}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content: Content = body_json(resp).await;
    assert_eq!(content.version, 2);
    assert_eq!(content.estimated_duration, 45);

    // versions, oldest first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/contents/topic-1/versions"))
        .await
        .unwrap();
    let versions: Vec<Content> = body_json(resp).await;
    let numbers: Vec<u32> = versions.iter().map(|c| c.version).collect();
    assert_eq!(numbers, vec![1, 2]);

    // add an image at the end
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/images/topic-1",
            r#"{"topic_id":"topic-1","url":"https://images.example/new.jpg","source":"Pixabay","license":"Pixabay License"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Image = body_json(resp).await;
    assert_eq!(created.order, 3);

    // move it to the front
    let body = format!(
        r#"{{"image_orders":[
            {{"image_id":"{}","order":0}},
            {{"image_id":"img-1","order":1}},
            {{"image_id":"img-2","order":2}},
            {{"image_id":"img-3","order":3}}
        ]}}"#,
        created.id
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/v1/images/topic-1/reorder", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/images/topic-1"))
        .await
        .unwrap();
    let listed: Value = body_json(resp).await;
    let images: Vec<Image> = serde_json::from_value(listed["data"].clone()).unwrap();
    assert_eq!(images[0].id, created.id);
    assert_eq!(images.len(), 4);

    // topic counters follow
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/topics/topic-1"))
        .await
        .unwrap();
    let topic: Topic = body_json(resp).await;
    assert_eq!(topic.image_count, 4);

    // delete the topic; its content goes with it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/topics/topic-1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/contents/topic-1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
