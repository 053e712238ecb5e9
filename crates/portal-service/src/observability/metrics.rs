//! Metrics definitions for the portal service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `portal_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: the portal's fixed routes, anything else is `/other`
//! - `status`: success, error, timeout
//! - `outcome`: bounded by code (see [`record_upstream_request`])

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by
/// `GET /metrics`.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("portal_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Upstream calls are bounded by the status request timeout (max 30s)
        .set_buckets_for_metric(
            Matcher::Prefix("portal_upstream_request".to_string()),
            &[
                0.050, 0.100, 0.250, 0.500, 1.000, 2.000, 5.000, 10.000, 30.000,
            ],
        )
        .map_err(|e| format!("Failed to set upstream request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `portal_http_requests_total`, `portal_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("portal_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("portal_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto a bounded label value.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/ready" => "/ready",
        "/metrics" => "/metrics",
        "/api/v1/status" => "/api/v1/status",
        "/api/v1/me" => "/api/v1/me",
        _ => "/other",
    }
}

// ============================================================================
// Upstream Status API Metrics
// ============================================================================

/// Record one upstream status query.
///
/// Metric: `portal_upstream_requests_total`, `portal_upstream_request_duration_seconds`
/// Labels: `outcome`
///
/// Outcomes: success, not_configured, timeout, transport, http_status, invalid_body.
/// `not_configured` never touches the network so no duration is recorded for it.
pub fn record_upstream_request(outcome: &'static str, duration: Option<Duration>) {
    if let Some(duration) = duration {
        histogram!("portal_upstream_request_duration_seconds",
            "outcome" => outcome
        )
        .record(duration.as_secs_f64());
    }

    counter!("portal_upstream_requests_total",
        "outcome" => outcome
    )
    .increment(1);
}

// ============================================================================
// Session Token Metrics
// ============================================================================

/// Record a session token verification.
///
/// Metric: `portal_token_validations_total`
/// Labels: `outcome` (success, failure)
pub fn record_token_validation(outcome: &'static str) {
    counter!("portal_token_validations_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a session token being issued.
///
/// Metric: `portal_tokens_issued_total`
pub fn record_token_issued() {
    counter!("portal_tokens_issued_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These run against the global no-op recorder; they exercise the
    // recording paths without inspecting values.

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, Duration::from_millis(2));
        record_http_request("GET", "/api/v1/status", 200, Duration::from_millis(800));
        record_http_request("GET", "/api/v1/me", 401, Duration::from_millis(1));
        record_http_request("GET", "/api/v1/status", 504, Duration::from_secs(30));
        record_http_request("POST", "/wp-login.php", 404, Duration::from_millis(1));
    }

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(204), "success");
        assert_eq!(categorize_status_code(401), "error");
        assert_eq!(categorize_status_code(500), "error");
        assert_eq!(categorize_status_code(503), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_normalize_endpoint_known_paths() {
        assert_eq!(normalize_endpoint("/health"), "/health");
        assert_eq!(normalize_endpoint("/ready"), "/ready");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
        assert_eq!(normalize_endpoint("/api/v1/status"), "/api/v1/status");
        assert_eq!(normalize_endpoint("/api/v1/me"), "/api/v1/me");
    }

    #[test]
    fn test_normalize_endpoint_unknown_paths() {
        assert_eq!(normalize_endpoint("/"), "/other");
        assert_eq!(normalize_endpoint("/api/v1/status/1"), "/other");
        assert_eq!(normalize_endpoint("/api/v2/me"), "/other");
    }

    #[test]
    fn test_record_upstream_request() {
        record_upstream_request("success", Some(Duration::from_millis(120)));
        record_upstream_request("timeout", Some(Duration::from_secs(5)));
        record_upstream_request("not_configured", None);
    }

    #[test]
    fn test_record_token_metrics() {
        record_token_issued();
        record_token_validation("success");
        record_token_validation("failure");
    }
}
