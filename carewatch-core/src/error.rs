//! Error types for the Carewatch core library.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Auth | Missing/expired/rejected session tokens |
//! | E2001-E2099 | Config | Environment, config file, and validation errors |
//! | E3001-E3099 | Directory/API | Snapshot, event stream, and admin API errors |
//! | E4001-E4099 | Session | Per-room credential and session pool errors |
//! | E9001-E9099 | General | Internal, IO, and serialization errors |

use thiserror::Error;

/// The main error type for the Carewatch core library.
#[derive(Debug, Error)]
pub enum CarewatchError {
    // ========================================================================
    // Auth Errors (E1001-E1099)
    // ========================================================================
    /// No persisted session token is available. The console must defer to the
    /// external login flow; components abstain from all join/fetch activity.
    #[error("[E1001] Not authenticated: no session token available")]
    NotAuthenticated,

    /// The admin API rejected the session token (401/403). Requires re-login,
    /// never a per-room retry.
    #[error("[E1002] Session rejected by the admin API: {0}")]
    AuthRejected(String),

    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Required environment variable is missing
    #[error("[E2001] Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value
    #[error("[E2002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Configuration file parse error
    #[error("[E2003] Failed to parse configuration: {0}")]
    ConfigParse(String),

    // ========================================================================
    // Directory/API Errors (E3001-E3099)
    // ========================================================================
    /// Room snapshot fetch failed; the previous room list is retained.
    #[error("[E3001] Room snapshot fetch failed: {0}")]
    SnapshotFetchFailed(String),

    /// Admin API request failed
    #[error("[E3002] API request failed: {0}")]
    ApiRequestFailed(String),

    /// Admin API unreachable
    #[error("[E3003] API service unavailable: {0}")]
    ApiUnavailable(String),

    /// Response shape missing an expected field
    #[error("[E3004] Malformed API response: {0}")]
    MalformedResponse(String),

    /// The push-event subscription dropped. Never user-facing; the
    /// subscription auto-reconnects.
    #[error("[E3005] Event stream disconnected: {0}")]
    StreamDisconnected(String),

    // ========================================================================
    // Session Errors (E4001-E4099)
    // ========================================================================
    /// Per-room credential issuance failed; the room stays unjoined until the
    /// next reconciliation pass.
    #[error("[E4001] Credential request failed for room '{room}': {message}")]
    CredentialIssueFailed { room: String, message: String },

    /// Session not found in the pool
    #[error("[E4002] Session not found: {0}")]
    SessionNotFound(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("[E9002] IO error: {0}")]
    Io(String),

    /// Serialization/deserialization error
    #[error("[E9003] Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Carewatch operations.
pub type CarewatchResult<T> = Result<T, CarewatchError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for CarewatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            CarewatchError::ApiUnavailable(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    return CarewatchError::AuthRejected(status.to_string());
                }
            }
            CarewatchError::ApiRequestFailed(err.to_string())
        } else if err.is_decode() {
            CarewatchError::MalformedResponse(err.to_string())
        } else {
            CarewatchError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CarewatchError {
    fn from(err: serde_json::Error) -> Self {
        CarewatchError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CarewatchError {
    fn from(err: std::io::Error) -> Self {
        CarewatchError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for CarewatchError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => CarewatchError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            _ => CarewatchError::ConfigParse(err.to_string()),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl CarewatchError {
    /// Returns true if this error means the operator must re-authenticate.
    /// These errors stop all join/fetch activity rather than retry.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CarewatchError::NotAuthenticated | CarewatchError::AuthRejected(_)
        )
    }

    /// Returns true if this error is transient and the operation is expected
    /// to succeed on a later pass without operator intervention.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CarewatchError::SnapshotFetchFailed(_)
                | CarewatchError::ApiRequestFailed(_)
                | CarewatchError::ApiUnavailable(_)
                | CarewatchError::MalformedResponse(_)
                | CarewatchError::StreamDisconnected(_)
                | CarewatchError::CredentialIssueFailed { .. }
        )
    }

    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CarewatchError::MissingEnvVar(_)
                | CarewatchError::InvalidConfigValue { .. }
                | CarewatchError::ConfigParse(_)
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CarewatchError::NotAuthenticated => "E1001",
            CarewatchError::AuthRejected(_) => "E1002",
            CarewatchError::MissingEnvVar(_) => "E2001",
            CarewatchError::InvalidConfigValue { .. } => "E2002",
            CarewatchError::ConfigParse(_) => "E2003",
            CarewatchError::SnapshotFetchFailed(_) => "E3001",
            CarewatchError::ApiRequestFailed(_) => "E3002",
            CarewatchError::ApiUnavailable(_) => "E3003",
            CarewatchError::MalformedResponse(_) => "E3004",
            CarewatchError::StreamDisconnected(_) => "E3005",
            CarewatchError::CredentialIssueFailed { .. } => "E4001",
            CarewatchError::SessionNotFound(_) => "E4002",
            CarewatchError::Internal(_) => "E9001",
            CarewatchError::Io(_) => "E9002",
            CarewatchError::Serialization(_) => "E9003",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            CarewatchError::NotAuthenticated | CarewatchError::AuthRejected(_) => {
                Some("Sign in again to refresh your operator session")
            }
            CarewatchError::MissingEnvVar(_) => {
                Some("Create a .env file or set the environment variable")
            }
            CarewatchError::ApiUnavailable(_) => {
                Some("Check that the admin API is reachable and CAREWATCH_API_URL is correct")
            }
            CarewatchError::SnapshotFetchFailed(_) => {
                Some("The room list may be stale. It refreshes on the next directory event")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_code() {
        let err = CarewatchError::NotAuthenticated;
        assert!(err.to_string().contains("E1001"));

        let err = CarewatchError::CredentialIssueFailed {
            room: "room1".to_string(),
            message: "500 Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("E4001"));
        assert!(err.to_string().contains("room1"));
    }

    #[test]
    fn test_auth_errors_are_not_transient() {
        assert!(CarewatchError::NotAuthenticated.is_auth_error());
        assert!(CarewatchError::AuthRejected("403 Forbidden".to_string()).is_auth_error());
        assert!(!CarewatchError::NotAuthenticated.is_transient());
        assert!(!CarewatchError::AuthRejected("401".to_string()).is_transient());
    }

    #[test]
    fn test_is_transient() {
        assert!(CarewatchError::SnapshotFetchFailed("timeout".to_string()).is_transient());
        assert!(CarewatchError::ApiUnavailable("connection refused".to_string()).is_transient());
        assert!(CarewatchError::MalformedResponse("missing token".to_string()).is_transient());
        assert!(CarewatchError::CredentialIssueFailed {
            room: "room2".to_string(),
            message: "500".to_string(),
        }
        .is_transient());

        assert!(!CarewatchError::MissingEnvVar("CAREWATCH_TOKEN".to_string()).is_transient());
        assert!(!CarewatchError::Internal("bug".to_string()).is_transient());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CarewatchError::NotAuthenticated.error_code(), "E1001");
        assert_eq!(
            CarewatchError::SnapshotFetchFailed("err".to_string()).error_code(),
            "E3001"
        );
        assert_eq!(
            CarewatchError::SessionNotFound("room1".to_string()).error_code(),
            "E4002"
        );
        assert_eq!(
            CarewatchError::Internal("err".to_string()).error_code(),
            "E9001"
        );
    }

    #[test]
    fn test_user_suggestions() {
        assert!(CarewatchError::NotAuthenticated.user_suggestion().is_some());
        assert!(CarewatchError::ApiUnavailable("down".to_string())
            .user_suggestion()
            .is_some());
        assert!(CarewatchError::Internal("err".to_string())
            .user_suggestion()
            .is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CarewatchError = io_err.into();
        assert!(matches!(err, CarewatchError::Io(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_result: Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err: CarewatchError = json_result.unwrap_err().into();
        assert!(matches!(err, CarewatchError::Serialization(_)));
    }
}
