//! Service layer for the portal.
//!
//! - `status_client` - HTTP client for the upstream game-status API
//! - `status_aggregator` - concurrent fan-out over the server roster

pub mod status_aggregator;
pub mod status_client;

pub use status_aggregator::aggregate_status;
pub use status_client::StatusClient;
