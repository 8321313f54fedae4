//! Multi-step endpoints: body assembly and the full broad-topic run

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    pipeline::{BlogContent, BlogPost, GenerationRequest, Heading},
    routes::{generate::required, AppJson},
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct BlogContentRequest {
    pub headings: Vec<Heading>,
    /// Accepted for symmetry with the other steps; paragraphs are written
    /// from the headings
    #[serde(default)]
    pub outline: Option<String>,
    pub topic: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BroadTopicQuery {
    /// Comma-separated topics to steer away from
    #[serde(default)]
    pub exclude: Option<String>,
}

/// Split `a, b,,c` into `["a", "b", "c"]`
pub fn split_exclusions(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write the post body for a list of headings
#[utoipa::path(
    post,
    path = "/api/generate-blog-content",
    tag = "Pipeline",
    request_body = BlogContentRequest,
    responses(
        (status = 200, description = "Assembled post body", body = BlogContent),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn blog_content(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<BlogContentRequest>,
) -> AppResult<Json<BlogContent>> {
    let request = GenerationRequest {
        topic: required("topic", &body.topic)?.to_string(),
        title: Some(required("title", &body.title)?.to_string()),
        keywords: body.keywords,
        exclusions: body.exclude,
    };

    let blog_content = state
        .writer
        .assemble_content(&body.headings, &request)
        .await?;
    Ok(Json(BlogContent { blog_content }))
}

/// Run the whole pipeline for a broad topic
#[utoipa::path(
    get,
    path = "/api/generate-by-broad-topic/{broadtopic}",
    tag = "Pipeline",
    params(
        ("broadtopic" = String, Path, description = "Broad topic to write about"),
        BroadTopicQuery
    ),
    responses(
        (status = 200, description = "Complete post", body = BlogPost),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure or unparseable answer", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn by_broad_topic(
    State(state): State<Arc<AppState>>,
    Path(broad_topic): Path<String>,
    Query(query): Query<BroadTopicQuery>,
) -> AppResult<Json<BlogPost>> {
    let broad_topic = required("broadtopic", &broad_topic)?;
    let exclusions = split_exclusions(query.exclude.as_deref());
    info!(broad_topic, exclusions = exclusions.len(), "Generating blog post for broad topic");

    let post = state
        .writer
        .generate_by_broad_topic(broad_topic, &exclusions)
        .await?;
    Ok(Json(post))
}
