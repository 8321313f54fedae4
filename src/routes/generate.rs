//! Per-step generation endpoints
//!
//! Each handler validates its body, runs a single pipeline step and returns
//! the step's result as JSON.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    pipeline::{BlogContent, BlogContentItem, GenerationRequest, Heading, MetaTag},
    routes::AppJson,
    AppState,
};

/// Reject blank required fields
pub(crate) fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::BadRequest(format!("`{}` must not be empty", field)))
    } else {
        Ok(value)
    }
}

fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct KeywordResearchRequest {
    pub broad_topic: String,
    #[serde(default)]
    pub blog_title: Option<String>,
    #[serde(default)]
    pub keyword_exclusions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopicsRequest {
    pub broad_topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub keyword_exclusions: Vec<String>,
}

/// `topics` are worked into the outline the same way keywords are
#[derive(Debug, Deserialize, ToSchema)]
pub struct OutlineRequest {
    pub broad_topic: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TitleRequest {
    pub outline: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub feature: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HeadingsRequest {
    pub outline: String,
    pub topic: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ParagraphRequest {
    #[serde(alias = "headings")]
    pub heading: String,
    /// Zero-based position of the heading
    pub part: usize,
    #[serde(rename = "partsLength")]
    pub parts_length: usize,
    /// Content written so far
    #[serde(rename = "blogContent", default)]
    pub blog_content: Vec<BlogContentItem>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// What meta tags are generated from: an outline, or an assembled post
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MetaSource {
    Text(String),
    Content(BlogContent),
    Items(Vec<BlogContentItem>),
}

impl MetaSource {
    /// Render as the outline text given to the meta prompt
    pub fn to_outline(&self) -> String {
        let join = |items: &[BlogContentItem]| {
            items
                .iter()
                .map(BlogContentItem::value)
                .collect::<Vec<_>>()
                .join("\n")
        };
        match self {
            MetaSource::Text(text) => text.clone(),
            MetaSource::Content(content) => join(&content.blog_content),
            MetaSource::Items(items) => join(items),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetaRequest {
    pub title: String,
    pub content: MetaSource,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Keyword research for a broad topic
#[utoipa::path(
    post,
    path = "/api/generate-keyword-research",
    tag = "Pipeline",
    request_body = KeywordResearchRequest,
    responses(
        (status = 200, description = "Keywords", body = Vec<String>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn keyword_research(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<KeywordResearchRequest>,
) -> AppResult<Json<Vec<String>>> {
    let broad_topic = required("broad_topic", &body.broad_topic)?;
    let keywords = state
        .writer
        .keyword_research(
            broad_topic,
            optional(body.blog_title.as_deref()),
            &body.keyword_exclusions,
        )
        .await?;
    Ok(Json(keywords))
}

/// Candidate topics for a broad topic
#[utoipa::path(
    post,
    path = "/api/generate-topics",
    tag = "Pipeline",
    request_body = TopicsRequest,
    responses(
        (status = 200, description = "Topics", body = Vec<String>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn topics(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<TopicsRequest>,
) -> AppResult<Json<Vec<String>>> {
    let broad_topic = required("broad_topic", &body.broad_topic)?;
    let topics = state
        .writer
        .generate_topics(broad_topic, &body.keywords, &body.keyword_exclusions)
        .await?;
    Ok(Json(topics))
}

/// Outline for a topic
#[utoipa::path(
    post,
    path = "/api/generate-outline",
    tag = "Pipeline",
    request_body = OutlineRequest,
    responses(
        (status = 200, description = "Outline text", body = String),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn outline(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<OutlineRequest>,
) -> AppResult<Json<String>> {
    let topic = required("broad_topic", &body.broad_topic)?;
    let outline = state.writer.generate_outline(topic, &body.topics).await?;
    Ok(Json(outline))
}

/// Title for an outline
#[utoipa::path(
    post,
    path = "/api/generate-title",
    tag = "Pipeline",
    request_body = TitleRequest,
    responses(
        (status = 200, description = "Title", body = String),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn title(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<TitleRequest>,
) -> AppResult<Json<String>> {
    let outline = required("outline", &body.outline)?;
    let topic = optional(body.topic.as_deref()).unwrap_or_default();
    let title = state
        .writer
        .generate_title(outline, topic, &body.exclude, &body.feature)
        .await?;
    Ok(Json(title))
}

/// Headings and image placeholders for an outline
#[utoipa::path(
    post,
    path = "/api/generate-headings",
    tag = "Pipeline",
    request_body = HeadingsRequest,
    responses(
        (status = 200, description = "Headings in post order", body = Vec<Heading>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure or unparseable answer", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn headings(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<HeadingsRequest>,
) -> AppResult<Json<Vec<Heading>>> {
    let outline = required("outline", &body.outline)?;
    let topic = required("topic", &body.topic)?;
    let title = required("title", &body.title)?;
    let headings = state
        .writer
        .generate_headings(outline, topic, title, &body.keywords)
        .await?;
    Ok(Json(headings))
}

/// Next paragraph of a post
#[utoipa::path(
    post,
    path = "/api/generate-paragraph",
    tag = "Pipeline",
    request_body = ParagraphRequest,
    responses(
        (status = 200, description = "Paragraph text", body = String),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn paragraph(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<ParagraphRequest>,
) -> AppResult<Json<String>> {
    let heading = required("heading", &body.heading)?;
    if body.part >= body.parts_length {
        return Err(AppError::BadRequest(format!(
            "`part` ({}) must be less than `partsLength` ({})",
            body.part, body.parts_length
        )));
    }

    let request = GenerationRequest {
        topic: optional(body.topic.as_deref())
            .unwrap_or_default()
            .to_string(),
        title: optional(body.title.as_deref()).map(str::to_string),
        keywords: body.keywords,
        exclusions: body.exclude,
    };
    let paragraph = state
        .writer
        .generate_paragraph(
            heading,
            body.part,
            body.parts_length,
            &body.blog_content,
            &request,
        )
        .await?;
    Ok(Json(paragraph))
}

/// Meta tag suggestions for a post
#[utoipa::path(
    post,
    path = "/api/generate-meta",
    tag = "Pipeline",
    request_body = MetaRequest,
    responses(
        (status = 200, description = "Meta tags", body = Vec<MetaTag>),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 502, description = "Provider failure or unparseable answer", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn meta(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<MetaRequest>,
) -> AppResult<Json<Vec<MetaTag>>> {
    let title = required("title", &body.title)?;
    let outline = body.content.to_outline();
    let meta = state
        .writer
        .generate_meta(title, &outline, &body.keywords, &body.exclude)
        .await?;
    Ok(Json(meta))
}
