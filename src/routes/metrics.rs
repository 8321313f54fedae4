//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "blogsmith_requests_total",
        "Total number of HTTP requests, by route and status"
    );
    metrics::describe_histogram!(
        "blogsmith_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "blogsmith_generation_steps_total",
        "Total number of pipeline steps run, by step and result"
    );
    metrics::describe_histogram!(
        "blogsmith_generation_step_duration_seconds",
        "Pipeline step duration in seconds"
    );
    metrics::describe_counter!(
        "blogsmith_parse_retries_total",
        "Provider calls repeated because the answer did not parse"
    );
    metrics::describe_counter!(
        "blogsmith_api_keys_issued_total",
        "Total number of API keys issued"
    );
    metrics::describe_counter!(
        "blogsmith_auth_rejections_total",
        "Requests rejected by the API key gate"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a handled HTTP request
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "blogsmith_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("blogsmith_request_duration_seconds", "route" => route.to_string())
        .record(duration_secs);
}

/// Middleware counting every request by matched route
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;
    record_request(&route, response.status().as_u16(), start.elapsed().as_secs_f64());
    response
}

/// Record a finished pipeline step
pub fn record_step(step: &'static str, result: &'static str, duration_secs: f64) {
    metrics::counter!("blogsmith_generation_steps_total", "step" => step, "result" => result)
        .increment(1);
    metrics::histogram!("blogsmith_generation_step_duration_seconds", "step" => step)
        .record(duration_secs);
}

/// Record a repeated call caused by an unparseable answer
pub fn record_parse_retry(step: &'static str) {
    metrics::counter!("blogsmith_parse_retries_total", "step" => step).increment(1);
}

/// Record an issued API key
pub fn record_api_key_issued() {
    metrics::counter!("blogsmith_api_keys_issued_total").increment(1);
}

/// Record a rejected request
pub fn record_auth_rejection(reason: &'static str) {
    metrics::counter!("blogsmith_auth_rejections_total", "reason" => reason).increment(1);
}
