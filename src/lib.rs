//! Blogsmith - blog post generation service
//!
//! This library provides the core functionality for the Blogsmith server.
//! It gates requests with session-bound API keys and chains calls to a
//! text-generation provider into a complete blog post.

pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod provider;
pub mod routes;
pub mod session;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::cache::RedisCache;
pub use crate::config::Config;
pub use crate::pipeline::BlogWriter;
pub use crate::provider::{ImageSource, OpenAIProvider, StockImageClient, TextGenerator};
pub use crate::session::{SessionStore, SESSION_COOKIE};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Session records (API key bindings)
    pub sessions: Arc<SessionStore>,
    /// Pipeline steps over the configured providers
    pub writer: Arc<BlogWriter>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize Redis connection
        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = redis::aio::ConnectionManager::new(redis_client).await?;

        let redis_cache = Arc::new(RedisCache::new(redis));
        let sessions = Arc::new(SessionStore::new(redis_cache, config.session_ttl_seconds));

        let http_client = build_http_client(&config)?;

        Ok(Self::assemble(config, http_client, sessions))
    }

    /// Create a new application state for testing
    ///
    /// Sessions live in an in-memory map; providers point wherever the
    /// config says, typically wiremock servers.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(config: Config) -> Result<Self> {
        let cache = Arc::new(crate::cache::InMemoryCache::new());
        let sessions = Arc::new(SessionStore::new_for_testing(
            cache,
            config.session_ttl_seconds,
        ));
        let http_client = build_http_client(&config)?;

        Ok(Self::assemble(config, http_client, sessions))
    }

    fn assemble(config: Config, http_client: reqwest::Client, sessions: Arc<SessionStore>) -> Self {
        let generator: Arc<dyn TextGenerator> =
            Arc::new(OpenAIProvider::new(http_client.clone(), &config));
        let images: Arc<dyn ImageSource> =
            Arc::new(StockImageClient::new(http_client, &config));
        let writer = Arc::new(BlogWriter::new(
            generator,
            images,
            config.max_parse_attempts,
        ));

        Self {
            config,
            start_time: Instant::now(),
            sessions,
            writer,
        }
    }
}

/// HTTP client with connection pooling, shared by every provider
fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(100)
        .timeout(Duration::from_secs(config.upstream_timeout_seconds))
        .build()?;
    Ok(client)
}
