//! Session middleware
//!
//! Resolves the session cookie into a [`CurrentSession`] and mints a new
//! session when the request carries none.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{session::SessionId, AppState};

/// Session attached to the request by [`session_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub id: SessionId,
    /// The id was minted for this request, so no record can exist yet
    pub is_new: bool,
}

/// Attach the caller's session to the request extensions
///
/// A missing or malformed cookie gets a fresh id, and the response then
/// carries the `Set-Cookie` header for it.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match SessionId::from_headers(request.headers()) {
        Some(id) => CurrentSession { id, is_new: false },
        None => {
            let id = SessionId::generate();
            debug!(session_id = %id, "Starting new session");
            CurrentSession { id, is_new: true }
        }
    };

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if session.is_new {
        let cookie = session
            .id
            .to_set_cookie(state.sessions.ttl(), state.config.production);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Could not encode session cookie"),
        }
    }

    response
}
