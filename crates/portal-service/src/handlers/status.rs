//! Server status handler.

use crate::errors::PortalError;
use crate::models::StatusEnvelope;
use crate::routes::AppState;
use crate::services::aggregate_status;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/v1/status
///
/// Public. Queries every configured server concurrently and returns one
/// record per server in roster order. Per-server failures are `error`
/// records inside a successful envelope.
///
/// # Errors
///
/// Returns 500 with `{success: false, error, timestamp}` only if the
/// aggregation itself fails.
#[instrument(skip_all, name = "portal.status")]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusEnvelope>, PortalError> {
    let servers = aggregate_status(&state.status_client, &state.config.servers).await?;

    tracing::debug!(target: "portal.status", servers = servers.len(), "Status aggregated");

    Ok(Json(StatusEnvelope {
        success: true,
        servers,
        timestamp: chrono::Utc::now(),
    }))
}
