//! JWT utilities shared across RP Portal components.
//!
//! This module provides:
//! - The session `Claims` structure and its reduced `UserView`
//! - Unverified payload decoding (`decode_claims`) for display purposes
//! - Expiry checks against the wall clock
//! - Size limits and iat clock-skew validation used by the server-side verifier
//!
//! # Trust boundary
//!
//! Nothing in this module verifies a signature. Claims obtained through
//! [`decode_claims`] are suitable for showing a username in a page header and
//! nothing else: authorization decisions must go through the server-side
//! verifier, which checks the HS256 signature against the signing secret.
//!
//! # Usage
//!
//! ```rust
//! use common::jwt::{decode_claims, is_expired};
//!
//! // Two segments: not a JWT
//! assert!(decode_claims("a.b").is_none());
//!
//! // No stored token counts as expired
//! assert!(is_expired(None));
//! ```

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before any base64 decoding or
/// signature work. Session tokens issued by the portal are around 250 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Default JWT clock skew tolerance (5 minutes).
///
/// Tokens with an `iat` more than this far in the future are rejected.
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

/// Maximum allowed JWT clock skew tolerance (10 minutes).
pub const MAX_CLOCK_SKEW: Duration = Duration::from_secs(600);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while decoding or validating a JWT.
///
/// Display messages are intentionally generic. The specific reason is logged
/// at debug level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("Token inválido o expirado")]
    TokenTooLarge,

    /// Token is not three dot-separated segments.
    #[error("Token inválido o expirado")]
    MalformedToken,

    /// Payload segment is not valid base64.
    #[error("Token inválido o expirado")]
    InvalidEncoding,

    /// Payload bytes are not UTF-8 or not a claims object.
    #[error("Token inválido o expirado")]
    InvalidClaims,

    /// Token `iat` claim is too far in the future.
    #[error("Token inválido o expirado")]
    IatTooFarInFuture,
}

// =============================================================================
// Claims Types
// =============================================================================

/// Session token claims.
///
/// Serialized with the field names the web client reads: `userId`,
/// `username`, `email`, `iat`, `exp`. Timestamps are Unix epoch seconds.
///
/// `user_id` and `email` are redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Upstream user identifier.
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Display name.
    pub username: String,

    /// Contact email.
    pub email: String,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration timestamp (Unix epoch seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("user_id", &"[REDACTED]")
            .field("username", &self.username)
            .field("email", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Claims {
    /// The reduced `{userId, username, email}` view of these claims.
    #[must_use]
    pub fn user_view(&self) -> UserView {
        UserView {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    /// Whether these claims are expired at `now` (Unix epoch seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Reduced user view carried by a session token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Upstream user identifier.
    pub user_id: String,

    /// Display name.
    pub username: String,

    /// Contact email.
    pub email: String,
}

impl fmt::Debug for UserView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserView")
            .field("user_id", &"[REDACTED]")
            .field("username", &self.username)
            .field("email", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Check a token against [`MAX_JWT_SIZE_BYTES`].
///
/// # Errors
///
/// Returns `JwtValidationError::TokenTooLarge` if the token exceeds the limit.
pub fn check_size(token: &str) -> Result<(), JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }
    Ok(())
}

/// Decode the claims of a JWT WITHOUT verifying its signature.
///
/// Returns the specific failure so callers that need it can tell a
/// malformed token from a bad payload. Most callers want [`decode_claims`].
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - not exactly three dot-separated segments
/// - `InvalidEncoding` - payload segment is not base64 / base64url
/// - `InvalidClaims` - payload is not UTF-8 or not a claims object
pub fn try_decode_claims(token: &str) -> Result<Claims, JwtValidationError> {
    check_size(token)?;

    // JWT format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let payload_part = parts.get(1).ok_or(JwtValidationError::MalformedToken)?;
    let payload_bytes = decode_segment(payload_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT payload base64");
        JwtValidationError::InvalidEncoding
    })?;

    let payload = String::from_utf8(payload_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "JWT payload is not valid UTF-8");
        JwtValidationError::InvalidClaims
    })?;

    serde_json::from_str(&payload).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT payload JSON");
        JwtValidationError::InvalidClaims
    })
}

/// Decode the claims of a JWT WITHOUT verifying its signature.
///
/// Any failure (wrong segment count, bad base64, bad UTF-8, wrong shape)
/// yields `None`; the reason is logged at debug level.
#[must_use]
pub fn decode_claims(token: &str) -> Option<Claims> {
    try_decode_claims(token).ok()
}

/// Extract the subject (`userId`) from an unverified token.
#[must_use]
pub fn subject(token: &str) -> Option<String> {
    decode_claims(token).map(|claims| claims.user_id)
}

/// Extract the reduced user view from an unverified token.
#[must_use]
pub fn user_view(token: &str) -> Option<UserView> {
    decode_claims(token).map(|claims| claims.user_view())
}

/// Whether a stored token should be treated as expired.
///
/// A missing token or one whose claims cannot be decoded counts as expired.
#[must_use]
pub fn is_expired(token: Option<&str>) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}

/// Deterministic variant of [`is_expired`] against an explicit `now`.
#[must_use]
pub fn is_expired_at(token: Option<&str>, now: i64) -> bool {
    match token.and_then(decode_claims) {
        Some(claims) => claims.is_expired_at(now),
        None => true,
    }
}

/// Validate the `iat` (issued-at) claim with clock skew tolerance.
///
/// # Errors
///
/// Returns `JwtValidationError::IatTooFarInFuture` if `iat` is more than
/// `clock_skew` in the future.
pub fn validate_iat(iat: i64, clock_skew: Duration) -> Result<(), JwtValidationError> {
    let now = chrono::Utc::now().timestamp();
    validate_iat_at(iat, clock_skew, now)
}

/// Deterministic `iat` validation against an explicit `now` timestamp.
pub(crate) fn validate_iat_at(
    iat: i64,
    clock_skew: Duration,
    now: i64,
) -> Result<(), JwtValidationError> {
    // clock_skew is bounded to MAX_CLOCK_SKEW by configuration
    #[allow(clippy::cast_possible_wrap)]
    let clock_skew_secs = clock_skew.as_secs() as i64;
    let max_iat = now + clock_skew_secs;

    if iat > max_iat {
        tracing::debug!(
            target: "common.jwt",
            iat = iat,
            now = now,
            max_allowed = max_iat,
            "Token rejected: iat too far in the future"
        );
        return Err(JwtValidationError::IatTooFarInFuture);
    }

    Ok(())
}

/// Decode one base64url segment by mapping it back onto the standard
/// alphabet and restoring padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    STANDARD.decode(standard)
}

// =============================================================================
// Tests
// =============================================================================
