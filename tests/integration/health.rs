//! Health, metrics, docs and landing page tests

use axum::http::{header, StatusCode};
use serde_json::Value;

use crate::common::TestHarness;

#[tokio::test]
async fn test_health_endpoint_returns_proper_structure() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["checks"]["session_store"]["status"], "healthy");
    assert_eq!(body["checks"]["provider"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_without_provider_key() {
    let harness = TestHarness::start_with(|config| config.openai_api_key = None).await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["provider"]["status"], "degraded");
}

#[tokio::test]
async fn test_readiness_and_liveness() {
    let harness = TestHarness::start().await;

    let ready = harness.server.get("/health/ready").await;
    ready.assert_status_ok();
    let body: Value = ready.json();
    assert_eq!(body["status"], "healthy");

    let live = harness.server.get("/health/live").await;
    live.assert_status_ok();
}

#[tokio::test]
async fn test_public_routes_do_not_start_sessions() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/health/live").await;

    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_index_text() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("/api/get-api-key"));
}

#[tokio::test]
async fn test_openapi_document() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let doc: Value = response.json();
    assert_eq!(doc["info"]["title"], "Blogsmith API");
    assert!(doc["paths"]["/api/generate-by-broad-topic/{broadtopic}"].is_object());
}

#[tokio::test]
async fn test_unknown_route() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
