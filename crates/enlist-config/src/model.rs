// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Enlist invite engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Enlist configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnlistConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram API credentials and session storage.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Invited-identities ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Invite loop pacing and log retention.
    #[serde(default)]
    pub engine: EngineConfig,

    /// HTTP control surface settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram user-account API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// API id issued at my.telegram.org. `None` disables the platform client.
    #[serde(default)]
    pub api_id: Option<i32>,

    /// API hash paired with `api_id`.
    #[serde(default)]
    pub api_hash: Option<String>,

    /// Name of the persisted session; the file is `<session_dir>/<session_name>.session`.
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Directory holding the session file.
    #[serde(default = "default_session_dir")]
    pub session_dir: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_id", &self.api_id)
            .field("api_hash", &self.api_hash.as_ref().map(|_| "[redacted]"))
            .field("session_name", &self.session_name)
            .field("session_dir", &self.session_dir)
            .finish()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_id: None,
            api_hash: None,
            session_name: default_session_name(),
            session_dir: default_session_dir(),
        }
    }
}

impl TelegramConfig {
    /// Full path of the persisted session file.
    pub fn session_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.session_dir).join(format!("{}.session", self.session_name))
    }
}

fn default_session_name() -> String {
    "invite_session".to_string()
}

fn default_session_dir() -> String {
    ".".to_string()
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Flat file with one invited user id per line.
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> String {
    "invited.txt".to_string()
}

/// Invite loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Delay after each successful invite when a start request omits one.
    #[serde(default = "default_delay_secs")]
    pub default_delay_secs: u64,

    /// Recovery sleep after a privacy-restricted failure.
    #[serde(default = "default_privacy_backoff_secs")]
    pub privacy_backoff_secs: u64,

    /// Recovery sleep after any other invite failure.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Number of log entries retained for status queries.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_delay_secs: default_delay_secs(),
            privacy_backoff_secs: default_privacy_backoff_secs(),
            error_backoff_secs: default_error_backoff_secs(),
            log_capacity: default_log_capacity(),
        }
    }
}

fn default_delay_secs() -> u64 {
    40
}

fn default_privacy_backoff_secs() -> u64 {
    5
}

fn default_error_backoff_secs() -> u64 {
    10
}

fn default_log_capacity() -> usize {
    100
}

/// HTTP control surface configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on every route except `/health`. `None` leaves the API open.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_path_joins_dir_and_name() {
        let config = TelegramConfig {
            session_dir: "/var/lib/enlist".into(),
            ..TelegramConfig::default()
        };
        assert_eq!(
            config.session_path(),
            std::path::PathBuf::from("/var/lib/enlist/invite_session.session")
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let telegram = TelegramConfig {
            api_id: Some(12345),
            api_hash: Some("deadbeef".into()),
            ..TelegramConfig::default()
        };
        let debug = format!("{telegram:?}");
        assert!(debug.contains("12345"));
        assert!(!debug.contains("deadbeef"));

        let gateway = GatewayConfig {
            bearer_token: Some("s3cret".into()),
            ..GatewayConfig::default()
        };
        let debug = format!("{gateway:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[redacted]"));
    }
}
