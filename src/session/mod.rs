//! Server-side sessions
//!
//! A session is identified by a random cookie value and holds the API key
//! issued to that client. Records live in Redis with a TTL so every instance
//! behind a load balancer sees the same binding.

pub mod api_key;
pub mod id;

use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    cache::redis::{keys, RedisCache},
    error::AppResult,
};

#[cfg(any(test, feature = "test-utils"))]
use crate::cache::InMemoryCache;

pub use self::api_key::generate_api_key;
pub use self::id::{SessionId, SESSION_COOKIE};

/// Cache backend abstraction for SessionStore
///
/// Lets the store run against Redis in production and an in-memory map in
/// isolated integration tests.
pub enum SessionCacheBackend {
    /// Redis-based cache for production use
    Redis(Arc<RedisCache>),
    /// In-memory cache for testing (only available with test-utils feature)
    #[cfg(any(test, feature = "test-utils"))]
    InMemory(Arc<InMemoryCache>),
}

impl SessionCacheBackend {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self {
            SessionCacheBackend::Redis(cache) => cache.get(key).await,
            #[cfg(any(test, feature = "test-utils"))]
            SessionCacheBackend::InMemory(cache) => cache.get(key).await,
        }
    }

    async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        match self {
            SessionCacheBackend::Redis(cache) => cache.set_with_ttl(key, value, ttl_seconds).await,
            #[cfg(any(test, feature = "test-utils"))]
            SessionCacheBackend::InMemory(cache) => {
                cache.set_with_ttl(key, value, ttl_seconds).await
            }
        }
    }

    async fn ping(&self) -> AppResult<()> {
        match self {
            SessionCacheBackend::Redis(cache) => cache.ping().await,
            #[cfg(any(test, feature = "test-utils"))]
            SessionCacheBackend::InMemory(cache) => cache.ping().await,
        }
    }
}

/// Session data stored under `blogsmith:session:<id>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    /// API key bound to the session
    pub api_key: String,
    /// Unix timestamp when the key was issued
    pub created_at: i64,
}

/// Session store
///
/// Wraps cache operations with session-specific logic.
pub struct SessionStore {
    cache: SessionCacheBackend,
    session_ttl: u64,
}

impl SessionStore {
    /// Create a new session store with Redis backend
    pub fn new(cache: Arc<RedisCache>, session_ttl: u64) -> Self {
        Self {
            cache: SessionCacheBackend::Redis(cache),
            session_ttl,
        }
    }

    /// Create a new session store with in-memory backend for testing
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(cache: Arc<InMemoryCache>, session_ttl: u64) -> Self {
        Self {
            cache: SessionCacheBackend::InMemory(cache),
            session_ttl,
        }
    }

    /// Session lifetime in seconds
    pub fn ttl(&self) -> u64 {
        self.session_ttl
    }

    /// Get the record bound to a session, if any
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get(&self, session_id: &SessionId) -> AppResult<Option<SessionRecord>> {
        let key = keys::session(session_id.as_str());
        let result = self.cache.get::<SessionRecord>(&key).await?;

        if result.is_some() {
            debug!("Session hit");
        } else {
            debug!("Session miss");
        }

        Ok(result)
    }

    /// Bind an API key to a session, replacing any previous key
    #[instrument(skip(self, api_key), fields(session_id = %session_id))]
    pub async fn bind_api_key(&self, session_id: &SessionId, api_key: &str) -> AppResult<SessionRecord> {
        let record = SessionRecord {
            api_key: api_key.to_string(),
            created_at: Utc::now().timestamp(),
        };

        let key = keys::session(session_id.as_str());
        self.cache
            .set_with_ttl(&key, &record, self.session_ttl)
            .await?;

        debug!("API key bound to session");
        Ok(record)
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.cache.ping().await
    }
}
