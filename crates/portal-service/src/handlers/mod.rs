//! HTTP request handlers for the portal service.

pub mod health;
pub mod me;
pub mod metrics;
pub mod status;

pub use health::{health_check, readiness_check};
pub use me::get_me;
pub use metrics::metrics_handler;
pub use status::get_status;
