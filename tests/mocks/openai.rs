//! Mock OpenAI-compatible API for testing
//!
//! Completions are routed by a fragment of the prompt, so one server can
//! answer every pipeline step with its own canned text.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants::TEST_OPENAI_API_KEY;

/// Prompt fragments identifying each completion step
pub mod prompts {
    pub const KEYWORDS: &str = "Generate diverse, relevant keywords";
    pub const TOPICS: &str = "Generate a list of topics";
    pub const OUTLINE: &str = "Create a concise search engine optimised outline";
    pub const TITLE: &str = "Generate a blog title";
    pub const HEADINGS: &str = "Generate a list of headings and images";
    pub const META: &str = "Generate a list of html meta data";
}

/// Completion response body with a single choice
pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "model": "gpt-3.5-turbo-instruct",
        "choices": [{"text": text, "index": 0, "finish_reason": "stop"}]
    })
}

/// Chat completion response body with a single choice
pub fn chat_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// Mock OpenAI server wrapper
pub struct MockOpenAI {
    server: MockServer,
}

impl MockOpenAI {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer completions whose prompt contains `fragment`
    pub async fn mock_completion(&self, fragment: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path("/completions"))
            .and(header(
                "Authorization",
                format!("Bearer {}", TEST_OPENAI_API_KEY).as_str(),
            ))
            .and(body_string_contains(fragment))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Answer the first `times` matching completions with `text`, ahead of
    /// any other mock for the same fragment
    pub async fn mock_completion_times(&self, fragment: &str, text: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path("/completions"))
            .and(body_string_contains(fragment))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(text)))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Fail every completion with the given status
    pub async fn mock_completion_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": "The server had an error", "type": "server_error"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer every chat completion with `content`
    pub async fn mock_chat(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header(
                "Authorization",
                format!("Bearer {}", TEST_OPENAI_API_KEY).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(content)))
            .mount(&self.server)
            .await;
    }

    /// Canned answers for every step of a gardening post
    pub async fn mock_gardening_post(&self) {
        self.mock_completion(
            prompts::KEYWORDS,
            "\n\n1. raised beds\n2. companion planting\n3. soil health",
        )
        .await;
        self.mock_completion(
            prompts::TOPICS,
            "\n\n1. Building raised beds on a budget\n2. Testing your soil at home",
        )
        .await;
        self.mock_completion(
            prompts::OUTLINE,
            "\n\nI. Introduction\nII. Materials\nIII. Maintenance\nIV. Conclusion",
        )
        .await;
        self.mock_completion(prompts::TITLE, "\n\n\"Grow More in Less Space\"")
            .await;
        self.mock_completion(
            prompts::HEADINGS,
            r#"[
                {"type": "h2", "content": "Why raised beds"},
                {"type": "image", "image_description": "cedar raised bed"},
                {"type": "h3", "content": "Choosing materials"},
                {"type": "h2", "content": "Keeping soil healthy"}
            ]"#,
        )
        .await;
        self.mock_completion(
            prompts::META,
            r#"[{"name": "title", "content": "Grow More in Less Space"}, {"name": "description", "content": "A guide to raised beds"}]"#,
        )
        .await;
        self.mock_chat("Raised beds warm up early and drain well.").await;
    }

    /// Number of requests received on `request_path`
    pub async fn request_count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }

    /// JSON bodies of requests received on `request_path`
    pub async fn request_bodies(&self, request_path: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
