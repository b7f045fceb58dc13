//! Verify error mapping, envelope handling and query building against JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each vector file lists inputs and the expected normalized result.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use content_api::api::TopicFilters;
use content_api::error::SilentReporter;
use content_api::interceptors::{pagination_response_interceptor, response_interceptor};
use content_api::types::PageInfo;
use content_api::{handle_http_error, ApiClient, FixtureTransport, HttpResponse, RequestConfig};
use serde_json::Value;
use std::sync::Arc;

const BASE_URL: &str = "http://localhost:8000/api/v1";

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn http_error_vectors() {
    let vectors = load(include_str!("../../test-vectors/http-errors.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = Some(&case["body"]).filter(|b| !b.is_null());
        let expected = &case["expected"];

        let error = handle_http_error(status, body);
        assert_eq!(error.code.as_str(), expected["code"].as_str().unwrap(), "{name}: code");
        assert_eq!(u64::from(error.status), expected["status"].as_u64().unwrap(), "{name}: status");
        if let Some(message) = expected["message"].as_str() {
            assert_eq!(error.message, message, "{name}: message");
        } else {
            assert!(!error.message.is_empty(), "{name}: default message");
        }
        assert_eq!(error.details.as_ref(), body, "{name}: details");
    }
}

#[test]
fn http_error_vectors_through_client() {
    let vectors = load(include_str!("../../test-vectors/http-errors.json"));
    let transport = Arc::new(FixtureTransport::new());
    let client = ApiClient::with_transport(BASE_URL, transport.clone())
        .with_reporter(Arc::new(SilentReporter));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        transport.push_response(HttpResponse::json(status, &case["body"]));

        let error = client.fetch_api("/topics", RequestConfig::get()).unwrap_err();
        assert_eq!(error.code.as_str(), case["expected"]["code"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn unwrap_vectors() {
    let vectors = load(include_str!("../../test-vectors/envelopes.json"));

    for case in vectors["unwrap"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::json(200, &case["body"]);
        let value = response_interceptor(&response, false, &SilentReporter).unwrap();
        let expected = Some(case["expected"].clone()).filter(|v| !v.is_null());
        assert_eq!(value, expected, "{name}");
    }
}

#[test]
fn pagination_vectors() {
    let vectors = load(include_str!("../../test-vectors/envelopes.json"));

    for case in vectors["pagination"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::json(200, &case["body"]);
        let page = pagination_response_interceptor(&response, false, &SilentReporter).unwrap();

        let expected: PageInfo = serde_json::from_value(case["expected_pagination"].clone()).unwrap();
        assert_eq!(page.data.len() as u64, case["expected_len"].as_u64().unwrap(), "{name}: data");
        assert_eq!(page.pagination, expected, "{name}: pagination");
    }
}

// ---------------------------------------------------------------------------
// Topic queries
// ---------------------------------------------------------------------------

fn filters_from(value: &Value) -> TopicFilters {
    let text = |key: &str| value[key].as_str().map(str::to_string);
    let number = |key: &str| value[key].as_u64().map(|n| n as u32);
    TopicFilters {
        category: serde_json::from_value(value["category"].clone()).unwrap(),
        status: serde_json::from_value(value["status"].clone()).unwrap(),
        date: text("date"),
        search: text("search"),
        page: number("page"),
        limit: number("limit"),
        sort: text("sort"),
        order: serde_json::from_value(value["order"].clone()).unwrap(),
    }
}

#[test]
fn topic_query_vectors() {
    let vectors = load(include_str!("../../test-vectors/topic-queries.json"));
    let transport = Arc::new(FixtureTransport::new());
    let client = ApiClient::with_transport(BASE_URL, transport.clone());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let filters = filters_from(&case["filters"]);
        let expected = case["expected_path"].as_str().unwrap();

        assert_eq!(filters.endpoint(), expected, "{name}: endpoint");

        transport.push_response(HttpResponse::json(200, &serde_json::json!({ "data": [] })));
        client.topics().get_topics(&filters).unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.path, format!("{BASE_URL}{expected}"), "{name}: request path");
    }
}
