//! Portal service configuration.
//!
//! Configuration is loaded from environment variables. Secrets (signing
//! secret, server keys, database URL) are held as `SecretString` and are
//! redacted in Debug output.
//!
//! The signing secret has no fallback: a missing or short `JWT_SECRET`
//! refuses startup.

use crate::models::ServerTarget;
use common::jwt::{DEFAULT_CLOCK_SKEW, MAX_CLOCK_SKEW};
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default upstream game-status endpoint.
pub const DEFAULT_STATUS_API_URL: &str = "https://api.policeroleplay.community/v1/server";

/// Default per-call timeout for upstream status requests.
pub const DEFAULT_STATUS_REQUEST_TIMEOUT_SECONDS: u64 = 5;

/// Upper bound for the upstream status timeout.
///
/// Kept well under the router's request timeout so a hung upstream call
/// always ends as an `error` record before the whole response is cut off.
pub const MAX_STATUS_REQUEST_TIMEOUT_SECONDS: u64 = 20;

/// Minimum signing secret length in bytes (HS256 key size).
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Number of game servers in the deployment.
pub const SERVER_COUNT: usize = 3;

/// Portal service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// HS256 signing secret for session tokens.
    pub jwt_secret: SecretString,

    /// Clock skew tolerance for `iat` validation.
    pub jwt_clock_skew: Duration,

    /// Upstream game-status endpoint.
    pub status_api_url: String,

    /// Per-call timeout for upstream status requests.
    pub status_request_timeout: Duration,

    /// Game servers shown on the status page, in display order.
    pub servers: Vec<ServerTarget>,

    /// Optional PostgreSQL connection URL.
    pub database_url: Option<SecretString>,

    /// Seconds to keep serving in-flight requests after a shutdown signal.
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid status request timeout configuration: {0}")]
    InvalidStatusTimeout(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt_secret = vars
            .get("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let status_api_url = vars
            .get("STATUS_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_STATUS_API_URL.to_string());

        // Parse JWT clock skew tolerance with validation
        let jwt_clock_skew = if let Some(value_str) = vars.get("JWT_CLOCK_SKEW_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidJwtClockSkew(
                    "JWT_CLOCK_SKEW_SECONDS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_CLOCK_SKEW.as_secs() {
                return Err(ConfigError::InvalidJwtClockSkew(format!(
                    "JWT_CLOCK_SKEW_SECONDS must not exceed {} seconds, got {}",
                    MAX_CLOCK_SKEW.as_secs(),
                    value
                )));
            }

            Duration::from_secs(value)
        } else {
            DEFAULT_CLOCK_SKEW
        };

        // Parse upstream timeout with validation
        let status_request_timeout_seconds =
            if let Some(value_str) = vars.get("STATUS_REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidStatusTimeout(format!(
                        "STATUS_REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 || value > MAX_STATUS_REQUEST_TIMEOUT_SECONDS {
                    return Err(ConfigError::InvalidStatusTimeout(format!(
                        "STATUS_REQUEST_TIMEOUT_SECONDS must be between 1 and {}, got {}",
                        MAX_STATUS_REQUEST_TIMEOUT_SECONDS, value
                    )));
                }

                value
            } else {
                DEFAULT_STATUS_REQUEST_TIMEOUT_SECONDS
            };

        let drain_seconds = match vars.get("PORTAL_DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "PORTAL_DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => 0,
        };

        // Unset keys are kept as empty credentials so the status page can
        // report the server as misconfigured instead of hiding it.
        let servers = (1..=SERVER_COUNT)
            .map(|index| ServerTarget {
                name: vars
                    .get(&format!("SERVER_NAME_{index}"))
                    .filter(|s| !s.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("Servidor {index}")),
                credential: SecretString::from(
                    vars.get(&format!("SERVER_KEY_{index}"))
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                ),
            })
            .collect();

        let database_url = vars
            .get("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::from(s.clone()));

        Ok(Config {
            bind_address,
            jwt_secret: SecretString::from(jwt_secret.clone()),
            jwt_clock_skew,
            status_api_url,
            status_request_timeout: Duration::from_secs(status_request_timeout_seconds),
            servers,
            database_url,
            drain_seconds,
        })
    }
}
