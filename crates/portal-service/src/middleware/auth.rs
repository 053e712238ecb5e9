//! Authentication middleware for protected routes.
//!
//! Reads the `Authorization` header, authenticates it with
//! [`crate::auth::authenticate`] and injects the resulting
//! [`UserView`](common::jwt::UserView) into request extensions.

use crate::auth::{authenticate, AuthFailure, SessionKeys};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub session_keys: Arc<SessionKeys>,

    /// Allowed `iat` drift into the future.
    pub clock_skew: Duration,
}

/// Authentication middleware for user session tokens.
///
/// # Response
///
/// - Returns 401 with the auth failure body if the header is missing,
///   malformed, or the token does not verify
/// - Continues to the next handler with `UserView` in extensions otherwise
#[instrument(skip_all, name = "portal.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthFailure> {
    let authorization = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        // A header that isn't visible ASCII can't be `Bearer <token>`
        Some(value) => Some(value.to_str().map_err(|_| AuthFailure::invalid_format())?),
    };

    let user = authenticate(&state.session_keys, authorization, state.clock_skew)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
