//! Portal service error types.
//!
//! Errors render as the portal's failure envelope
//! `{success: false, error, timestamp}`. Client-facing messages are generic;
//! the underlying detail is logged server-side.
//!
//! Request-authentication failures use [`crate::auth::AuthFailure`] instead,
//! which carries its own 401 body.

use crate::models::FailureEnvelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Portal service error type.
///
/// Maps to HTTP status codes:
/// - Aggregation, TokenSigning, Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Status aggregation failed: {0}")]
    Aggregation(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

impl PortalError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PortalError::Aggregation(_)
            | PortalError::TokenSigning(_)
            | PortalError::Database(_)
            | PortalError::Internal => 500,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let message = match &self {
            PortalError::Aggregation(err) => {
                tracing::error!(target: "portal.status", error = %err, "Status aggregation failed");
                "Failed to fetch server status"
            }
            PortalError::TokenSigning(err) => {
                tracing::error!(target: "portal.auth", error = %err, "Token signing failed");
                "An internal error occurred"
            }
            PortalError::Database(err) => {
                tracing::error!(target: "portal.database", error = %err, "Database operation failed");
                "An internal database error occurred"
            }
            PortalError::Internal => "An internal error occurred",
        };

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = FailureEnvelope {
            success: false,
            error: message.to_string(),
            timestamp: chrono::Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        PortalError::Database(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_aggregation_error() {
        let error = PortalError::Aggregation("task panicked".to_string());
        assert_eq!(format!("{}", error), "Status aggregation failed: task panicked");
    }

    #[test]
    fn test_display_internal() {
        assert_eq!(format!("{}", PortalError::Internal), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PortalError::Aggregation("x".to_string()).status_code(), 500);
        assert_eq!(PortalError::TokenSigning("x".to_string()).status_code(), 500);
        assert_eq!(PortalError::Database("x".to_string()).status_code(), 500);
        assert_eq!(PortalError::Internal.status_code(), 500);
    }

    #[tokio::test]
    async fn test_into_response_aggregation_error() {
        let response = PortalError::Aggregation("join error".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to fetch server status");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_into_response_hides_internal_detail() {
        let response =
            PortalError::Database("password authentication failed".to_string()).into_response();

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"], "An internal database error occurred");
        assert!(!body.to_string().contains("password"));
    }
}
