//! Middleware module
//!
//! Contains Tower middleware for sessions and API-key authentication.

pub mod auth;
pub mod session;

pub use auth::api_key_middleware;
pub use session::{session_middleware, CurrentSession};
