//! Health check handlers.
//!
//! - `/health`: liveness, returns OK while the process is running
//! - `/ready`: readiness, checks the database when one is configured

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness probe handler.
///
/// Does NOT check any dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe handler.
///
/// Returns 200 when the database answers `SELECT 1` or no database is
/// configured, 503 otherwise. The status API is not probed: upstream
/// outages surface as per-server `error` records, not as unreadiness.
///
/// ## Security
///
/// The response carries a generic error; the real cause is logged.
#[tracing::instrument(skip_all, name = "portal.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(pool) = &state.db_pool else {
        return (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database: "not_configured",
                error: None,
            }),
        );
    };

    if let Err(e) = sqlx::query("SELECT 1").fetch_one(pool).await {
        tracing::warn!(target: "portal.health", error = %e, "Readiness check failed: database error");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                database: "unhealthy",
                error: Some("Service dependencies unavailable".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            database: "healthy",
            error: None,
        }),
    )
}
