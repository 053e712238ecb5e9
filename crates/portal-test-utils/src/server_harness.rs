//! Test server harness for E2E testing
//!
//! Provides `TestPortalServer` for spawning real portal server instances in tests.

use common::jwt::Claims;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use portal_service::auth::{issue_session_token, verify_session_token};
use portal_service::config::Config;
use portal_service::models::UpstreamUser;
use portal_service::observability::metrics::init_metrics_recorder;
use portal_service::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

/// Global metrics handle shared by test servers in one process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics handle for test servers.
///
/// The global recorder can only be installed once per process; later
/// callers get a detached handle.
pub fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning the portal server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let upstream = MockServer::start().await;
/// let server = TestPortalServer::spawn(
///     &upstream.uri(),
///     &[("SERVER_KEY_1", "key-one")],
/// )
/// .await?;
///
/// let body: serde_json::Value = reqwest::get(format!("{}/api/v1/status", server.url()))
///     .await?
///     .json()
///     .await?;
/// ```
pub struct TestPortalServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    _handle: JoinHandle<()>,
}

impl TestPortalServer {
    /// Spawn a server on a random port with `STATUS_API_URL` pointing at
    /// `status_api_url`.
    ///
    /// `vars` override or extend the defaults (`JWT_SECRET`,
    /// `BIND_ADDRESS`, `STATUS_API_URL`).
    ///
    /// # Returns
    /// * `Ok(TestPortalServer)` - Running server instance
    /// * `Err(anyhow::Error)` - If configuration or bind fails
    pub async fn spawn(status_api_url: &str, vars: &[(&str, &str)]) -> Result<Self, anyhow::Error> {
        let mut env = HashMap::from([
            ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("STATUS_API_URL".to_string(), status_api_url.to_string()),
        ]);
        for (key, value) in vars {
            env.insert((*key).to_string(), (*value).to_string());
        }

        let config = Config::from_vars(&env)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(
            AppState::new(config)
                .map_err(|e| anyhow::anyhow!("Failed to create app state: {}", e))?,
        );

        let app = routes::build_routes(state.clone(), test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Issue a session token signed with this server's keys.
    pub fn issue_token(&self, id: &str, username: &str, email: &str) -> String {
        let user = UpstreamUser {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
        };
        issue_session_token(&self.state.session_keys, &user).expect("token signing should succeed")
    }

    /// Verify a token against this server's keys.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        verify_session_token(
            &self.state.session_keys,
            token,
            self.state.config.jwt_clock_skew,
        )
    }
}

impl Drop for TestPortalServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let upstream = MockServer::start().await;
        let server = TestPortalServer::spawn(&upstream.uri(), &[]).await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert!(server.addr().port() > 0);

        let response = reqwest::get(format!("{}/health", server.url())).await?;
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await?, "OK");

        Ok(())
    }

    #[tokio::test]
    async fn test_vars_override_defaults() -> Result<(), anyhow::Error> {
        let upstream = MockServer::start().await;
        let server =
            TestPortalServer::spawn(&upstream.uri(), &[("SERVER_NAME_2", "Patrulla")]).await?;

        assert_eq!(server.config().servers[1].name, "Patrulla");
        assert_eq!(server.config().status_api_url, upstream.uri());

        Ok(())
    }

    #[tokio::test]
    async fn test_issued_token_verifies() -> Result<(), anyhow::Error> {
        let upstream = MockServer::start().await;
        let server = TestPortalServer::spawn(&upstream.uri(), &[]).await?;

        let token = server.issue_token("u1", "bob", "b@x.com");
        let claims = server.verify_token(&token).expect("token should verify");
        assert_eq!(claims.username, "bob");

        Ok(())
    }
}
