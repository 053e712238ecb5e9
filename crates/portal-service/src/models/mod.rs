//! Data models for the portal service.

use chrono::{DateTime, Utc};
use common::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Max players reported when the upstream omits `MaxPlayers`.
pub const DEFAULT_MAX_PLAYERS: u32 = 40;

/// Message carried by records whose server key is not configured.
pub const SERVER_KEY_NOT_CONFIGURED: &str = "Server key not configured";

// ============================================================================
// Status models
// ============================================================================

/// A game server to poll, paired with its upstream credential.
#[derive(Debug, Clone)]
pub struct ServerTarget {
    /// Display name.
    pub name: String,

    /// Upstream `server-key`. Empty when not configured.
    pub credential: SecretString,
}

/// Normalized state of one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// At least one player connected.
    Online,
    /// Reachable with no players.
    Offline,
    /// Credential missing or upstream call failed.
    Error,
}

impl ServerState {
    /// State for a successful upstream response.
    pub fn from_players(players: u32) -> Self {
        if players > 0 {
            ServerState::Online
        } else {
            ServerState::Offline
        }
    }
}

/// Per-server status record returned by `GET /api/v1/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub name: String,
    pub players: u32,
    pub max_players: u32,
    pub status: ServerState,

    /// Masked server key (last four characters visible).
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerStatus {
    /// Record for a server that could not be queried.
    pub fn failed(name: &str, key: String, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            players: 0,
            max_players: DEFAULT_MAX_PLAYERS,
            status: ServerState::Error,
            key,
            last_updated: None,
            error: Some(error.into()),
        }
    }

    /// Record built from a successful upstream response.
    pub fn from_upstream(
        name: &str,
        key: String,
        info: &UpstreamServerInfo,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let players = info.current_players.unwrap_or(0);
        let max_players = info
            .max_players
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_PLAYERS);

        Self {
            name: name.to_string(),
            players,
            max_players,
            status: ServerState::from_players(players),
            key,
            last_updated: Some(fetched_at),
            error: None,
        }
    }
}

/// Subset of the upstream server payload the portal reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamServerInfo {
    #[serde(default)]
    pub current_players: Option<u32>,

    #[serde(default)]
    pub max_players: Option<u32>,
}

/// Successful body of `GET /api/v1/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEnvelope {
    pub success: bool,
    pub servers: Vec<ServerStatus>,
    pub timestamp: DateTime<Utc>,
}

/// Failure body shared by all portal error responses.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Session models
// ============================================================================

/// User data handed over by the external login callback.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

// ============================================================================
// Health models
// ============================================================================

/// Readiness probe response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: &'static str,

    /// "healthy", "unhealthy" or "not_configured".
    pub database: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn fetched_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_server_state_from_players() {
        assert_eq!(ServerState::from_players(0), ServerState::Offline);
        assert_eq!(ServerState::from_players(1), ServerState::Online);
        assert_eq!(ServerState::from_players(40), ServerState::Online);
    }

    #[test]
    fn test_server_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ServerState::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&ServerState::Offline).unwrap(), "\"offline\"");
        assert_eq!(serde_json::to_string(&ServerState::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_from_upstream_with_players_is_online() {
        let info: UpstreamServerInfo =
            serde_json::from_str(r#"{"CurrentPlayers": 12, "MaxPlayers": 35}"#).unwrap();
        let status = ServerStatus::from_upstream("S1", "****abcd".to_string(), &info, fetched_at());

        assert_eq!(status.players, 12);
        assert_eq!(status.max_players, 35);
        assert_eq!(status.status, ServerState::Online);
        assert_eq!(status.last_updated, Some(fetched_at()));
        assert!(status.error.is_none());
    }

    #[test]
    fn test_from_upstream_missing_fields_defaults() {
        let info: UpstreamServerInfo = serde_json::from_str(r#"{"Name": "x"}"#).unwrap();
        let status = ServerStatus::from_upstream("S1", String::new(), &info, fetched_at());

        assert_eq!(status.players, 0);
        assert_eq!(status.max_players, DEFAULT_MAX_PLAYERS);
        assert_eq!(status.status, ServerState::Offline);
    }

    #[test]
    fn test_from_upstream_zero_max_players_falls_back() {
        let info = UpstreamServerInfo {
            current_players: Some(3),
            max_players: Some(0),
        };
        let status = ServerStatus::from_upstream("S1", String::new(), &info, fetched_at());
        assert_eq!(status.max_players, DEFAULT_MAX_PLAYERS);
    }

    #[test]
    fn test_failed_record_shape() {
        let status = ServerStatus::failed("S2", String::new(), SERVER_KEY_NOT_CONFIGURED);

        assert_eq!(status.status, ServerState::Error);
        assert_eq!(status.players, 0);
        assert!(status.max_players > 0);
        assert_eq!(status.error.as_deref(), Some(SERVER_KEY_NOT_CONFIGURED));
        assert!(status.last_updated.is_none());
    }

    #[test]
    fn test_server_status_serializes_camel_case() {
        let info = UpstreamServerInfo {
            current_players: Some(5),
            max_players: Some(40),
        };
        let status = ServerStatus::from_upstream("S1", "****1234".to_string(), &info, fetched_at());
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["name"], "S1");
        assert_eq!(json["players"], 5);
        assert_eq!(json["maxPlayers"], 40);
        assert_eq!(json["status"], "online");
        assert_eq!(json["key"], "****1234");
        assert!(json["lastUpdated"].is_string());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_readiness_response_serialization() {
        let ready = ReadinessResponse {
            status: "ready",
            database: "not_configured",
            error: None,
        };

        let json = serde_json::to_string(&ready).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"database\":\"not_configured\""));
        assert!(!json.contains("\"error\""));
    }
}
