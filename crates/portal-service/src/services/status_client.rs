//! HTTP client for the upstream game-status API.
//!
//! Every failure mode becomes an `error` [`ServerStatus`] record instead of
//! an error value, so one broken server never hides the others.
//!
//! # Security
//!
//! - The `server-key` credential is sent as a header and never logged
//! - Records carry only the masked credential
//! - The client enforces a hard per-request timeout

use crate::errors::PortalError;
use crate::models::{ServerStatus, ServerTarget, UpstreamServerInfo, SERVER_KEY_NOT_CONFIGURED};
use crate::observability::metrics::record_upstream_request;
use common::secret::{mask_credential, ExposeSecret};
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, instrument, warn};

/// Connect timeout for upstream requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Header carrying the per-server credential.
const SERVER_KEY_HEADER: &str = "server-key";

/// Why an upstream query produced an `error` record.
#[derive(Debug, Error)]
enum UpstreamFailure {
    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    InvalidBody(String),
}

impl UpstreamFailure {
    fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamFailure::Timeout
        } else {
            UpstreamFailure::Transport(err.to_string())
        }
    }

    /// Metric label for this failure.
    fn outcome(&self) -> &'static str {
        match self {
            UpstreamFailure::Timeout => "timeout",
            UpstreamFailure::Transport(_) => "transport",
            UpstreamFailure::HttpStatus(_) => "http_status",
            UpstreamFailure::InvalidBody(_) => "invalid_body",
        }
    }
}

/// Client for the upstream status endpoint.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    api_url: String,
}

impl StatusClient {
    /// Create a client for `api_url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Internal` if the HTTP client cannot be built.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| {
                error!(target: "portal.services.status", error = %e, "Failed to build HTTP client");
                PortalError::Internal
            })?;

        Ok(Self { client, api_url })
    }

    /// Query the upstream for one server and normalize the result.
    ///
    /// Never fails: an empty credential, a timeout, a transport error, a
    /// non-2xx status or an unparseable body all yield an `error` record.
    #[instrument(skip_all, fields(server = %target.name))]
    pub async fn fetch(&self, target: &ServerTarget) -> ServerStatus {
        let credential = target.credential.expose_secret();
        let key = mask_credential(credential);

        if credential.is_empty() {
            warn!(target: "portal.services.status", server = %target.name, "Server key not configured");
            record_upstream_request("not_configured", None);
            return ServerStatus::failed(&target.name, key, SERVER_KEY_NOT_CONFIGURED);
        }

        let start = Instant::now();
        let result = self.query(credential).await;
        let elapsed = start.elapsed();

        match result {
            Ok(info) => {
                record_upstream_request("success", Some(elapsed));
                ServerStatus::from_upstream(&target.name, key, &info, chrono::Utc::now())
            }
            Err(failure) => {
                warn!(
                    target: "portal.services.status",
                    server = %target.name,
                    outcome = failure.outcome(),
                    error = %failure,
                    "Upstream status query failed"
                );
                record_upstream_request(failure.outcome(), Some(elapsed));
                ServerStatus::failed(&target.name, key, failure.to_string())
            }
        }
    }

    async fn query(&self, credential: &str) -> Result<UpstreamServerInfo, UpstreamFailure> {
        let response = self
            .client
            .get(&self.api_url)
            .header(SERVER_KEY_HEADER, credential)
            .send()
            .await
            .map_err(|e| UpstreamFailure::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamFailure::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamFailure::from_reqwest(&e))?;

        serde_json::from_slice(&body).map_err(|e| UpstreamFailure::InvalidBody(e.to_string()))
    }
}
