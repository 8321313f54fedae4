//! Content assembly and full-pipeline tests

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestHarness;

#[tokio::test]
async fn test_blog_content_text_headings() {
    let harness = TestHarness::start().await;
    harness.openai.mock_chat("A short paragraph.").await;
    let credentials = harness.credentials().await;

    let response = harness
        .post(
            "/api/generate-blog-content",
            &credentials,
            &json!({
                "headings": [
                    {"type": "h2", "content": "Intro"},
                    {"type": "h3", "content": "Worms"},
                    {"type": "h2", "content": "Wrap up"}
                ],
                "outline": "I. Intro\nII. Worms\nIII. Wrap up",
                "topic": "composting",
                "title": "Black Gold",
                "keywords": ["worms"]
            }),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let items = body["blogContent"].as_array().unwrap();
    assert_eq!(items.len(), 1 + 2 * 3);
    assert_eq!(items[0], json!({"kind": "title", "value": "Black Gold"}));
    assert_eq!(
        items[1],
        json!({"kind": "heading", "level": "h2", "value": "Intro"})
    );
    assert_eq!(
        items[2],
        json!({"kind": "paragraph", "value": "A short paragraph."})
    );
    assert_eq!(items[3]["level"], "h3");
    assert_eq!(harness.openai.request_count("/chat/completions").await, 3);
}

#[tokio::test]
async fn test_blog_content_image_heading_resolves_url() {
    let harness = TestHarness::start().await;
    harness.openai.mock_chat("A short paragraph.").await;
    let credentials = harness.credentials().await;

    let response = harness
        .post(
            "/api/generate-blog-content",
            &credentials,
            &json!({
                "headings": [
                    {"kind": "heading", "level": "h2", "text": "Intro"},
                    {"kind": "image", "description": "compost heap"}
                ],
                "outline": "I. Intro",
                "topic": "composting",
                "title": "Black Gold"
            }),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let items = body["blogContent"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[3], json!({"kind": "caption", "value": "compost heap"}));
    assert_eq!(items[4]["kind"], "image");
    assert_eq!(items[4]["value"], harness.images.photo_url());

    assert_eq!(
        harness.images.lookup_queries().await,
        vec!["compost%20heap".to_string()]
    );
    assert_eq!(harness.openai.request_count("/chat/completions").await, 1);
}

#[tokio::test]
async fn test_blog_content_empty_headings() {
    let harness = TestHarness::start().await;
    let credentials = harness.credentials().await;

    let response = harness
        .post(
            "/api/generate-blog-content",
            &credentials,
            &json!({"headings": [], "outline": "", "topic": "composting", "title": "Black Gold"}),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"blogContent": []}));
}

#[tokio::test]
async fn test_generate_by_broad_topic_gardening() {
    let harness = TestHarness::start().await;
    harness.openai.mock_gardening_post().await;
    let credentials = harness.credentials().await;

    let response = harness
        .get(
            "/api/generate-by-broad-topic/gardening?exclude=gardening,plants",
            &credentials,
        )
        .await;

    response.assert_status_ok();
    let post: Value = response.json();

    let keywords = post["keywords"].as_array().unwrap();
    assert_eq!(
        keywords,
        &vec![
            json!("raised beds"),
            json!("companion planting"),
            json!("soil health")
        ]
    );

    let topic = post["topic"].as_str().unwrap();
    assert!(["Building raised beds on a budget", "Testing your soil at home"].contains(&topic));

    assert!(!post["outline"].as_str().unwrap().is_empty());
    assert_eq!(post["title"], "Grow More in Less Space");

    // 4 headings: 3 text, 1 image
    let items = post["content"]["blogContent"].as_array().unwrap();
    assert_eq!(items.len(), 1 + 2 * 4);
    assert_eq!(items[0]["kind"], "title");
    assert_eq!(items[3]["kind"], "caption");
    assert_eq!(items[4]["kind"], "image");
    assert_eq!(items[4]["value"], harness.images.photo_url());

    let meta = post["meta"].as_array().unwrap();
    assert_eq!(meta.len(), 2);
    assert_eq!(meta[1]["name"], "description");

    // keywords, topics, outline, title, headings, meta
    assert_eq!(harness.openai.request_count("/completions").await, 6);
    assert_eq!(harness.openai.request_count("/chat/completions").await, 3);

    let prompts: Vec<String> = harness
        .openai
        .request_bodies("/completions")
        .await
        .iter()
        .filter_map(|b| b["prompt"].as_str().map(str::to_string))
        .collect();
    assert!(prompts[0].contains("[gardening,plants]"));
}
