//! API key issuance and the landing page

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::AppResult, middleware::CurrentSession, routes::metrics::record_api_key_issued,
    session::generate_api_key, AppState,
};

/// Freshly issued API key
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// Issue an API key and bind it to the caller's session
///
/// Any key previously bound to the session is replaced.
#[utoipa::path(
    get,
    path = "/api/get-api-key",
    tag = "Keys",
    responses(
        (status = 200, description = "Key issued; the session cookie is set when missing", body = ApiKeyResponse),
        (status = 500, description = "Session store error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
) -> AppResult<Json<ApiKeyResponse>> {
    let api_key = generate_api_key(state.config.api_key_length);
    state.sessions.bind_api_key(&session.id, &api_key).await?;

    record_api_key_issued();
    info!(session_id = %session.id, new_session = session.is_new, "API key issued");

    Ok(Json(ApiKeyResponse { api_key }))
}

const INDEX_TEXT: &str = "Blogsmith generates blog posts from a broad topic. \
Request a key from GET /api/get-api-key, then send it in the Authorization header \
(or the apiKey query parameter) together with the session cookie. \
API documentation is served at /docs.";

/// Static informational text
pub async fn index() -> &'static str {
    INDEX_TEXT
}
