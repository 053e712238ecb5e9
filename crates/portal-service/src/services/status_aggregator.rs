//! Concurrent status fan-out across the configured servers.

use crate::errors::PortalError;
use crate::models::{ServerStatus, ServerTarget};
use crate::services::status_client::StatusClient;
use futures::future::join_all;
use tracing::{error, instrument};

/// Query every target concurrently and return records in roster order.
///
/// Each target runs on its own task. Per-server failures are already
/// folded into `error` records by [`StatusClient::fetch`]; the only error
/// here is a task that panicked or was cancelled.
///
/// # Errors
///
/// Returns `PortalError::Aggregation` if any task fails to join.
#[instrument(skip_all, fields(servers = targets.len()))]
pub async fn aggregate_status(
    client: &StatusClient,
    targets: &[ServerTarget],
) -> Result<Vec<ServerStatus>, PortalError> {
    let handles = targets.iter().cloned().map(|target| {
        let client = client.clone();
        tokio::spawn(async move { client.fetch(&target).await })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| {
            joined.map_err(|e| {
                error!(target: "portal.services.status", error = %e, "Status task failed");
                PortalError::Aggregation(e.to_string())
            })
        })
        .collect()
}
