//! Session identifiers and the session cookie

use std::fmt;

use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "blogsmith.sid";

/// Opaque session identifier (a random UUID v4)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh session id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept only well-formed UUIDs so arbitrary cookie values never reach
    /// the store
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(|id| Self(id.to_string()))
    }

    /// Read the session id from the request's `Cookie` headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|c| c.name() == SESSION_COOKIE)
            .and_then(|c| Self::parse(c.value()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the `Set-Cookie` value for this session
    pub fn to_set_cookie(&self, max_age_seconds: u64, secure: bool) -> String {
        let max_age = i64::try_from(max_age_seconds).unwrap_or(i64::MAX);
        Cookie::build((SESSION_COOKIE, self.0.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
            .to_string()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
