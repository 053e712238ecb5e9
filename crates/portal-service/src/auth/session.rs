//! Session token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the configured `JWT_SECRET` and carry
//! [`common::jwt::Claims`]. They are valid for 30 days. There is no refresh,
//! rotation or revocation: a token is valid until `exp`.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted; tokens with any other `alg` are rejected
//! - `exp` is validated with no leeway, `iat` with the configured clock skew
//! - Failure reasons are logged at debug level, callers only see `None`

use crate::errors::PortalError;
use crate::models::UpstreamUser;
use crate::observability::metrics::{record_token_issued, record_token_validation};
use common::jwt::{check_size, validate_iat, Claims};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Session token lifetime in seconds (30 days).
pub const SESSION_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// HS256 keys derived from the signing secret.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    /// Derive signing and verification keys from the shared secret.
    pub fn new(secret: &SecretString) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
        }
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

/// Issue a session token for a user returned by the login callback.
///
/// # Errors
///
/// Returns `PortalError::TokenSigning` if the token cannot be encoded.
#[instrument(skip_all, name = "portal.auth.issue")]
pub fn issue_session_token(keys: &SessionKeys, user: &UpstreamUser) -> Result<String, PortalError> {
    issue_session_token_at(keys, user, chrono::Utc::now().timestamp())
}

/// Issue a session token with an explicit issue time (Unix epoch seconds).
pub(crate) fn issue_session_token_at(
    keys: &SessionKeys,
    user: &UpstreamUser,
    now: i64,
) -> Result<String, PortalError> {
    let claims = Claims {
        user_id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        issued_at: now,
        expires_at: now + SESSION_TOKEN_TTL_SECONDS,
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| PortalError::TokenSigning(e.to_string()))?;

    record_token_issued();
    tracing::debug!(target: "portal.auth.jwt", "Session token issued");

    Ok(token)
}

/// Verify a session token's signature, expiry and issue time.
///
/// Returns the claims on success and `None` on any failure (oversized,
/// malformed, bad signature, wrong algorithm, expired, `iat` in the future).
#[instrument(skip_all, name = "portal.auth.verify")]
pub fn verify_session_token(
    keys: &SessionKeys,
    token: &str,
    clock_skew: Duration,
) -> Option<Claims> {
    let claims = verify(keys, token, clock_skew);
    record_token_validation(if claims.is_some() { "success" } else { "failure" });
    claims
}

fn verify(keys: &SessionKeys, token: &str, clock_skew: Duration) -> Option<Claims> {
    check_size(token).ok()?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|e| {
            tracing::debug!(target: "portal.auth.jwt", error = %e, "Token verification failed");
        })
        .ok()?;

    if let Err(e) = validate_iat(token_data.claims.issued_at, clock_skew) {
        tracing::debug!(target: "portal.auth.jwt", error = ?e, "Token iat validation failed");
        return None;
    }

    tracing::debug!(target: "portal.auth.jwt", "Token validated successfully");
    Some(token_data.claims)
}
