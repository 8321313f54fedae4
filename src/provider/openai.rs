//! OpenAI-compatible provider
//!
//! Calls `/completions` and `/chat/completions` on any API that speaks the
//! OpenAI wire format.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    provider::{ChatMessage, SamplingParams, TextGenerator},
};

/// Text completion request
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// OpenAI-compatible text generator
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    completion_model: String,
    chat_model: String,
}

impl OpenAIProvider {
    /// Create a new provider from configuration
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            completion_model: config.completion_model.clone(),
            chat_model: config.chat_model.clone(),
        }
    }

    /// Make a POST request to the provider
    async fn post<T: Serialize, R: DeserializeOwned>(&self, path: &str, body: &T) -> AppResult<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending request to provider");

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Failed to send request to provider");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Provider request failed");
            return Err(AppError::UpstreamError(format!(
                "Provider error {}: {}",
                status, text
            )));
        }

        let result = response.json().await?;
        Ok(result)
    }

    /// Build default headers for provider requests
    fn default_headers(&self) -> AppResult<HeaderMap> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("OPENAI_API_KEY is not configured".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Invalid provider API key: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl TextGenerator for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, prompt), fields(model = %self.completion_model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> AppResult<String> {
        let request = CompletionRequest {
            model: &self.completion_model,
            prompt,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            n: 1,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        };

        let response: CompletionResponse = self.post("/completions", &request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .unwrap_or_default())
    }

    #[instrument(skip(self, messages), fields(model = %self.chat_model, messages = messages.len()))]
    async fn chat(&self, messages: &[ChatMessage], params: &SamplingParams) -> AppResult<String> {
        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            n: 1,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        };

        let response: ChatCompletionResponse = self.post("/chat/completions", &request).await?;
        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}
