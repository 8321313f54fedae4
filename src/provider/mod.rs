//! Text-generation and image providers
//!
//! Defines the traits the pipeline talks to, so the OpenAI-compatible
//! backend and the stock-image redirector can be swapped or faked.

pub mod images;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub use images::{ImageSource, StockImageClient};
pub use openai::OpenAIProvider;

/// Sampling parameters sent with every generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
}

impl SamplingParams {
    pub const fn new(temperature: f64, max_tokens: u32, top_p: f64) -> Self {
        Self {
            temperature,
            max_tokens,
            top_p,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    pub const fn with_penalties(mut self, frequency: f64, presence: f64) -> Self {
        self.frequency_penalty = Some(frequency);
        self.presence_penalty = Some(presence);
        self
    }
}

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Trait defining the interface for text-generation backends
///
/// Every call asks for a single choice and returns its text, or an empty
/// string when the provider sent none.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Plain text completion of a single prompt
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> AppResult<String>;

    /// Chat completion over a list of messages
    async fn chat(&self, messages: &[ChatMessage], params: &SamplingParams) -> AppResult<String>;
}
