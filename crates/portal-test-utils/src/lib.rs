//! # Portal Test Utilities
//!
//! Shared test utilities for the portal service.
//!
//! This crate provides:
//! - Server test harness (`TestPortalServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portal_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let upstream = wiremock::MockServer::start().await;
//!     let server = TestPortalServer::spawn(&upstream.uri(), &[]).await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

pub use server_harness::*;
