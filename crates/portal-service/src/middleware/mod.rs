//! HTTP middleware for the portal service.
//!
//! - `auth` - Bearer session authentication for protected routes
//! - `http_metrics` - request/response metrics for every route

pub mod auth;
pub mod http_metrics;

pub use auth::{require_auth, AuthState};
pub use http_metrics::http_metrics_middleware;
