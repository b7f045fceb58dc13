//! End-to-end lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the resource clients
//! over real HTTP through `UreqTransport`. Validates that request building,
//! envelope unwrapping, pagination normalization and error mapping agree
//! with the actual server.

use std::sync::Arc;

use assert_matches::assert_matches;
use content_api::api::{
    CreateInteraction, GenerateContentParams, GenerationType, ImageOrder, ImageSearchParams,
    InteractionAction, InteractionQuery, TopicFilters,
};
use content_api::error::SilentReporter;
use content_api::{ApiClient, Category, ErrorCode, ImageSource, TopicStatus};

/// Start the mock server on a random port and return its API base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
    });

    format!("http://{addr}/api/v1")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url).with_reporter(Arc::new(SilentReporter))
}

#[test]
fn topic_lifecycle() {
    let client = client(&start_server());
    let topics = client.topics();

    // list with defaults
    let page = topics.get_topics(&TopicFilters::default()).unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.limit, 12);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 1);

    // filtered and paged
    let filters = TopicFilters {
        category: Some(Category::Food),
        limit: Some(1),
        ..TopicFilters::default()
    };
    let page = topics.get_topics(&filters).unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.pagination.total_pages, 2);

    // lookup
    let topic = topics.get_topic("topic-1").unwrap().unwrap();
    assert_eq!(topic.image_count, 3);
    assert_eq!(topics.get_topic("missing").unwrap(), None);
    assert_eq!(topics.get_topic("no such topic").unwrap(), None);

    // status change unwraps the `data` envelope
    let updated = topics
        .update_topic_status("topic-3", TopicStatus::Confirmed)
        .unwrap();
    assert_eq!(updated.status, TopicStatus::Confirmed);

    // delete, then it is gone
    topics.delete_topic("topic-5").unwrap();
    assert_eq!(topics.get_topic("topic-5").unwrap(), None);
    let err = topics.delete_topic("topic-5").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[test]
fn content_lifecycle() {
    let client = client(&start_server());
    let contents = client.contents();

    assert_eq!(contents.get_content("topic-2").unwrap(), None);

    let params = GenerateContentParams::new(GenerationType::Both);
    let first = contents.generate_content("topic-2", &params).unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(first.estimated_duration, 30);

    let second = client
        .legacy()
        .generate_content("topic-2", GenerationType::Script, None, Some(60))
        .unwrap();
    assert_eq!(second.version, 2);
    assert_eq!(second.estimated_duration, 60);

    let versions = contents.get_content_versions("topic-2").unwrap();
    assert_eq!(versions.len(), 2);

    let current = contents.get_content("topic-2").unwrap().unwrap();
    assert_eq!(current.version, 2);

    let err = contents
        .generate_content("missing", &params)
        .unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.message, "Topic missing not found");
}

#[test]
fn image_lifecycle() {
    let client = client(&start_server());
    let images = client.images();

    let current = images.get_images("topic-1").unwrap();
    let ids: Vec<&str> = current.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["img-1", "img-2", "img-3"]);

    // reverse the order
    images
        .reorder_images("topic-1", &ImageOrder::sequence(&["img-3", "img-2", "img-1"]))
        .unwrap();
    let reordered = images.get_images("topic-1").unwrap();
    assert_eq!(reordered[0].id, "img-3");
    assert_eq!(reordered[2].id, "img-1");

    // a partial order list is rejected by the server
    let err = images
        .reorder_images("topic-1", &ImageOrder::sequence(&["img-1"]))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.status, 422);

    // search keeps provider diagnostics
    let params = ImageSearchParams {
        source: Some(ImageSource::Pexels),
        page: Some(3),
        ..ImageSearchParams::new("street food")
    };
    let found = images.search_images(&params).unwrap();
    assert_eq!(found.data.len(), 5);
    assert_eq!(found.pagination.total, 45);
    assert_eq!(found.pagination.total_pages, 3);
    assert_eq!(found.source.as_deref(), Some("Pexels"));
    assert_eq!(found.attempts.len(), 1);
    assert!(found.trace_id.is_some());

    // matching tops the topic up to the legacy default of eight
    let matched = client.legacy().match_photos("topic-1", None).unwrap();
    assert_eq!(matched.len(), 8);
}

#[test]
fn scheduler_and_interactions() {
    let client = client(&start_server());
    let schedules = client.schedules();

    assert_eq!(schedules.get_schedules(Some("2026-03-01")).unwrap().len(), 2);
    assert_eq!(schedules.get_schedules(None).unwrap().len(), 3);

    let status = schedules.get_scheduler_status().unwrap();
    assert_eq!(status.status, "running");
    assert_eq!(status.jobs.len(), 2);

    let ack = schedules.stop_scheduler().unwrap();
    assert_eq!(ack.status, "stopped");
    assert!(schedules.get_scheduler_status().unwrap().jobs.is_empty());

    let generated = schedules.manual_generate_topics(Category::Trend, 2).unwrap();
    assert_eq!(generated.count, 2);

    let interactions = client.interactions();
    interactions
        .create_interaction(&CreateInteraction::new("u1", "topic-2", InteractionAction::Like))
        .unwrap();
    let mut view = CreateInteraction::new("u1", "topic-1", InteractionAction::View);
    view.duration = Some(20.0);
    interactions.create_interaction(&view).unwrap();

    let likes = interactions
        .get_interactions(
            "u1",
            &InteractionQuery {
                action: Some(InteractionAction::Like),
                ..InteractionQuery::default()
            },
        )
        .unwrap();
    assert_eq!(likes.interactions.len(), 1);
    assert_eq!(likes.interactions[0].category.as_deref(), Some("food"));

    let stats = interactions.get_interaction_stats("u1").unwrap();
    assert_eq!(stats.stats.total_likes, 1);
    assert_eq!(stats.stats.total_views, 1);
    assert_eq!(stats.stats.avg_view_time, 20.0);
    assert_eq!(stats.stats.category_distribution["food"].likes, 1);
}

#[test]
fn unreachable_backend_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = client(&format!("http://127.0.0.1:{port}/api/v1"));

    let err = client.topics().get_topics(&TopicFilters::default()).unwrap_err();
    assert_matches!(err.code, ErrorCode::Network);
    assert_eq!(err.status, 0);
}
