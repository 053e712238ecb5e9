//! Observability for the portal service.
//!
//! Prometheus metrics definitions and recording helpers live in [`metrics`].
//! Logging goes through `tracing` with per-module targets (`portal.status`,
//! `portal.auth`, ...), configured in `main.rs`.

pub mod metrics;
