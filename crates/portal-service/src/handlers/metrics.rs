//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Metric labels are bounded
//! and carry no user data or server keys.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// ```text
/// # TYPE portal_http_requests_total counter
/// portal_http_requests_total{method="GET",endpoint="/api/v1/status",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "portal.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
