//! Cache module
//!
//! Keyed storage with expiry used for session data. Redis backs production;
//! an in-memory map stands in for it during tests.

#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;
pub mod redis;

#[cfg(any(test, feature = "test-utils"))]
pub use self::in_memory::InMemoryCache;
pub use self::redis::RedisCache;
