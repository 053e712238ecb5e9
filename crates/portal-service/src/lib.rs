//! RP Portal Service Library
//!
//! Server-side layer of the community website:
//!
//! - Live server/player counts aggregated from the upstream game-status API
//! - Session token issuing, verification and request authentication
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs, auth/*.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Session issuer, verifier and authenticator
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication and HTTP metrics middleware
//! - `models` - Data models
//! - `observability` - Prometheus metrics
//! - `routes` - Axum router setup
//! - `services` - Upstream status client and aggregator

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
