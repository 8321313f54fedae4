//! API key issuance and session gate tests

use axum::http::{header, HeaderValue, StatusCode};
use serde_json::{json, Value};

use crate::common::{cookie_pair, TestHarness};
use crate::mocks::prompts;

fn outline_body() -> Value {
    json!({"broad_topic": "composting", "topics": ["worm bins"]})
}

#[tokio::test]
async fn test_get_api_key_sets_session_cookie() {
    let harness = TestHarness::start().await;

    let response = harness.server.get("/api/get-api-key").await;
    response.assert_status_ok();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Set-Cookie header")
        .to_string();
    assert!(set_cookie.starts_with("blogsmith.sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));

    let body: Value = response.json();
    let key = body["apiKey"].as_str().unwrap();
    assert_eq!(key.len(), 32);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let harness = TestHarness::start_with(|config| config.production = true).await;

    let response = harness.server.get("/api/get-api-key").await;
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();

    assert!(set_cookie.to_str().unwrap().contains("Secure"));
}

#[tokio::test]
async fn test_configured_key_length() {
    let harness = TestHarness::start_with(|config| config.api_key_length = 48).await;

    let credentials = harness.credentials().await;

    assert_eq!(credentials.api_key.len(), 48);
}

#[tokio::test]
async fn test_existing_session_keeps_cookie_and_rotates_key() {
    let harness = TestHarness::start().await;
    let first = harness.credentials().await;

    let response = harness
        .server
        .get("/api/get-api-key")
        .add_header(header::COOKIE, HeaderValue::from_str(&first.cookie).unwrap())
        .await;
    response.assert_status_ok();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let second: Value = response.json();
    let second_key = second["apiKey"].as_str().unwrap().to_string();
    assert_ne!(second_key, first.api_key);

    // The old key no longer matches the session
    let stale = harness
        .post("/api/generate-outline", &first, &outline_body())
        .await;
    stale.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_key_rejected() {
    let harness = TestHarness::start().await;
    let credentials = harness.credentials().await;

    let response = harness
        .server
        .post("/api/generate-outline")
        .add_header(header::COOKIE, HeaderValue::from_str(&credentials.cookie).unwrap())
        .json(&outline_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "No API key provided");
}

#[tokio::test]
async fn test_key_without_session_rejected() {
    let harness = TestHarness::start().await;
    let credentials = harness.credentials().await;

    let response = harness
        .server
        .post("/api/generate-outline")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&credentials.api_key).unwrap(),
        )
        .json(&outline_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "No session found");
    // A session is still started for the caller
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_session_without_key_rejected() {
    let harness = TestHarness::start().await;

    // A well-formed cookie the server never bound a key to
    let response = harness
        .server
        .post("/api/generate-outline")
        .add_header(
            header::COOKIE,
            HeaderValue::from_static("blogsmith.sid=0b6f5f0e-6f5e-4c57-9d0c-3f4a2f1b7e11"),
        )
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("some-key"))
        .json(&outline_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "No session found");
}

#[tokio::test]
async fn test_wrong_key_rejected() {
    let harness = TestHarness::start().await;
    let mut credentials = harness.credentials().await;
    credentials.api_key.push('x');

    let response = harness
        .post("/api/generate-outline", &credentials, &outline_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid API key");
    assert_eq!(harness.openai.request_count("/completions").await, 0);
}

#[tokio::test]
async fn test_key_from_another_session_rejected() {
    let harness = TestHarness::start().await;
    let alice = harness.credentials().await;
    let bob = harness.credentials().await;

    let response = harness
        .server
        .post("/api/generate-outline")
        .add_header(header::COOKIE, HeaderValue::from_str(&alice.cookie).unwrap())
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&bob.api_key).unwrap(),
        )
        .json(&outline_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid API key");
}

#[tokio::test]
async fn test_raw_header_and_query_param_accepted() {
    let harness = TestHarness::start().await;
    harness
        .openai
        .mock_completion(prompts::OUTLINE, "I. Intro\nII. Bins")
        .await;
    let credentials = harness.credentials().await;

    let raw_header = harness
        .server
        .post("/api/generate-outline")
        .add_header(header::COOKIE, HeaderValue::from_str(&credentials.cookie).unwrap())
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&credentials.api_key).unwrap(),
        )
        .json(&outline_body())
        .await;
    raw_header.assert_status_ok();

    let lowercase_scheme = harness
        .server
        .post("/api/generate-outline")
        .add_header(header::COOKIE, HeaderValue::from_str(&credentials.cookie).unwrap())
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("bearer {}", credentials.api_key)).unwrap(),
        )
        .json(&outline_body())
        .await;
    lowercase_scheme.assert_status_ok();

    let query = harness
        .server
        .post("/api/generate-outline")
        .add_query_param("apiKey", &credentials.api_key)
        .add_header(header::COOKIE, HeaderValue::from_str(&credentials.cookie).unwrap())
        .json(&outline_body())
        .await;
    query.assert_status_ok();
    let outline: String = query.json();
    assert_eq!(outline, "I. Intro\nII. Bins");
}

#[test]
fn test_cookie_pair_helper() {
    assert_eq!(
        cookie_pair("blogsmith.sid=abc; Path=/; HttpOnly"),
        "blogsmith.sid=abc"
    );
}
