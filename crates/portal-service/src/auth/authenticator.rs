//! Request authentication from an `Authorization: Bearer <token>` header.
//!
//! Failures are reported as a 401 with a JSON body
//! `{error: true, statusCode: 401, message}`. The message distinguishes a
//! missing header from a malformed one and from a token that fails
//! verification, but never says why verification failed.

use crate::auth::session::{verify_session_token, SessionKeys};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::jwt::UserView;
use serde::Serialize;
use std::time::Duration;

/// Message when no `Authorization` header is present.
pub const MISSING_TOKEN_MESSAGE: &str = "Token de autenticación requerido";

/// Message when the header is not `Bearer <token>`.
pub const INVALID_FORMAT_MESSAGE: &str = "Formato de token inválido";

/// Message when the token does not verify.
pub const INVALID_TOKEN_MESSAGE: &str = "Token inválido o expirado";

/// Authentication failure returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFailure {
    #[serde(rename = "error")]
    is_error: bool,
    pub status_code: u16,
    pub message: String,
}

impl AuthFailure {
    fn unauthorized(message: &str) -> Self {
        Self {
            is_error: true,
            status_code: StatusCode::UNAUTHORIZED.as_u16(),
            message: message.to_string(),
        }
    }

    pub fn missing_token() -> Self {
        Self::unauthorized(MISSING_TOKEN_MESSAGE)
    }

    pub fn invalid_format() -> Self {
        Self::unauthorized(INVALID_FORMAT_MESSAGE)
    }

    pub fn invalid_token() -> Self {
        Self::unauthorized(INVALID_TOKEN_MESSAGE)
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::UNAUTHORIZED);

        (
            status,
            [(
                header::WWW_AUTHENTICATE,
                "Bearer realm=\"portal\", error=\"invalid_token\"",
            )],
            Json(self),
        )
            .into_response()
    }
}

/// Authenticate a request from its raw `Authorization` header value.
///
/// The header must split on single spaces into exactly `Bearer` and a token.
/// On success returns the user view (`userId`, `username`, `email`) carried
/// in the verified claims.
///
/// # Errors
///
/// - [`AuthFailure::missing_token`] when the header is absent
/// - [`AuthFailure::invalid_format`] when it is not `Bearer <token>`
/// - [`AuthFailure::invalid_token`] when verification fails
pub fn authenticate(
    keys: &SessionKeys,
    authorization: Option<&str>,
    clock_skew: Duration,
) -> Result<UserView, AuthFailure> {
    let Some(header_value) = authorization else {
        tracing::debug!(target: "portal.auth", "Missing Authorization header");
        return Err(AuthFailure::missing_token());
    };

    let parts: Vec<&str> = header_value.split(' ').collect();
    let token = match parts.as_slice() {
        ["Bearer", token] => *token,
        _ => {
            tracing::debug!(target: "portal.auth", "Invalid Authorization header format");
            return Err(AuthFailure::invalid_format());
        }
    };

    verify_session_token(keys, token, clock_skew)
        .map(|claims| claims.user_view())
        .ok_or_else(AuthFailure::invalid_token)
}
