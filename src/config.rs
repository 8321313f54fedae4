//! Configuration management for Blogsmith
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Production mode marks session cookies as `Secure`
    pub production: bool,

    /// Redis connection URL (session storage)
    pub redis_url: String,
    /// Session lifetime (in seconds)
    pub session_ttl_seconds: u64,
    /// Length of issued API keys
    pub api_key_length: usize,

    /// OpenAI-compatible API URL
    pub openai_api_url: String,
    /// OpenAI API key (required for generation calls)
    pub openai_api_key: Option<String>,
    /// Model used for plain completions
    pub completion_model: String,
    /// Model used for chat completions (paragraphs)
    pub chat_model: String,

    /// Stock-image redirector base URL
    pub image_api_url: String,
    /// Image dimensions requested from the redirector, e.g. `900x600`
    pub image_size: String,

    /// Maximum calls for steps whose response must parse as JSON
    pub max_parse_attempts: u32,
    /// Timeout for outbound HTTP calls (in seconds)
    pub upstream_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let max_parse_attempts: u32 = env::var("MAX_PARSE_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .context("Invalid MAX_PARSE_ATTEMPTS")?;
        let session_ttl_seconds: u64 = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .context("Invalid SESSION_TTL_SECONDS")?;
        let api_key_length: usize = env::var("API_KEY_LENGTH")
            .unwrap_or_else(|_| "32".to_string())
            .parse()
            .context("Invalid API_KEY_LENGTH")?;

        Ok(Self {
            host: env::var("BLOGSMITH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BLOGSMITH_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid BLOGSMITH_PORT")?,
            production: env::var("BLOGSMITH_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            session_ttl_seconds: non_zero("SESSION_TTL_SECONDS", session_ttl_seconds)?,
            api_key_length: non_zero("API_KEY_LENGTH", api_key_length)?,

            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo-instruct".to_string()),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),

            image_api_url: env::var("IMAGE_API_URL")
                .unwrap_or_else(|_| "https://source.unsplash.com".to_string()),
            image_size: env::var("IMAGE_SIZE").unwrap_or_else(|_| "900x600".to_string()),

            max_parse_attempts: non_zero("MAX_PARSE_ATTEMPTS", max_parse_attempts)?,
            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?,
        })
    }
}

/// Reject 0 for settings that must be at least 1
fn non_zero<T: PartialEq + Default>(name: &str, value: T) -> Result<T> {
    if value == T::default() {
        anyhow::bail!("{} must be at least 1", name);
    }
    Ok(value)
}
