//! Authentication middleware
//!
//! Compares the caller-supplied API key with the key bound to its session.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::{AppError, AuthRejection},
    middleware::session::CurrentSession,
    routes::metrics::record_auth_rejection,
    AppState,
};

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Strip an optional `Bearer ` prefix (any case) from an Authorization header value
pub fn strip_bearer(auth_header: &str) -> &str {
    let key = match auth_header.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => &auth_header[7..],
        _ => auth_header,
    };
    key.trim()
}

/// Find the API key in the `Authorization` header, falling back to the
/// `apiKey` query parameter
pub fn extract_api_key(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(strip_bearer)
        .filter(|key| !key.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<ApiKeyQuery>::try_from_uri(uri)
            .ok()
            .and_then(|Query(q)| q.api_key)
            .filter(|key| !key.is_empty())
    })
}

/// Decide whether a supplied key matches the session-bound key
pub fn authorize(supplied: Option<&str>, bound: Option<&str>) -> Result<(), AuthRejection> {
    let supplied = supplied.ok_or(AuthRejection::MissingApiKey)?;
    let bound = bound.ok_or(AuthRejection::NoSession)?;

    if supplied == bound {
        Ok(())
    } else {
        Err(AuthRejection::InvalidApiKey)
    }
}

fn rejection_label(rejection: AuthRejection) -> &'static str {
    match rejection {
        AuthRejection::MissingApiKey => "missing_api_key",
        AuthRejection::NoSession => "no_session",
        AuthRejection::InvalidApiKey => "invalid_api_key",
    }
}

/// API key middleware
///
/// Must run inside [`session_middleware`](crate::middleware::session_middleware).
/// Rejects with 401 unless the supplied key equals the one bound to the
/// caller's session.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn api_key_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = extract_api_key(request.headers(), request.uri());
    let session = request.extensions().get::<CurrentSession>().cloned();

    let bound = match (&supplied, session) {
        // Nothing to compare against, skip the store lookup
        (None, _) => None,
        (Some(_), Some(session)) if !session.is_new => state
            .sessions
            .get(&session.id)
            .await?
            .map(|record| record.api_key),
        _ => None,
    };

    if let Err(rejection) = authorize(supplied.as_deref(), bound.as_deref()) {
        warn!(reason = rejection_label(rejection), "Request rejected");
        record_auth_rejection(rejection_label(rejection));
        return Err(AppError::Unauthorized(rejection));
    }

    debug!("API key accepted");
    Ok(next.run(request).await)
}
