//! HTTP routes for Blogsmith
//!
//! This module defines all HTTP endpoints exposed by the service.

pub mod blog;
pub mod docs;
pub mod generate;
pub mod health;
pub mod keys;
pub mod metrics;

use std::sync::Arc;

use axum::{
    extract::FromRequest,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    middleware::{api_key_middleware, session_middleware},
    AppState,
};

/// JSON body extractor whose rejections use the standard error body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Routes gated by the session-bound API key
    let protected_routes = Router::new()
        .route("/api/generate-keyword-research", post(generate::keyword_research))
        .route("/api/generate-topics", post(generate::topics))
        .route("/api/generate-outline", post(generate::outline))
        .route("/api/generate-title", post(generate::title))
        .route("/api/generate-headings", post(generate::headings))
        .route("/api/generate-paragraph", post(generate::paragraph))
        .route("/api/generate-blog-content", post(blog::blog_content))
        .route("/api/generate-meta", post(generate::meta))
        .route(
            "/api/generate-by-broad-topic/:broadtopic",
            get(blog::by_broad_topic),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    // Session layer wraps the key gate, so it runs first
    let session_routes = Router::new()
        .route("/api/get-api-key", get(keys::get_api_key))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    // Public routes (landing page, health checks, metrics, docs)
    let public_routes = Router::new()
        .route("/", get(keys::index))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .merge(docs::create_docs_router());

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .route_layer(middleware::from_fn(metrics::track_requests))
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
