// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Enlist invite engine.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the platform boundary, the engine, and
/// the control surface.
#[derive(Debug, Error)]
pub enum EnlistError {
    /// Configuration errors (invalid TOML, missing credentials, feature not compiled in).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connectivity to the messaging platform failed.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The phone number was rejected locally or by the platform.
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    /// Login failed (bad code, expired challenge, wrong password).
    #[error("login failed: {0}")]
    Login(String),

    /// The account has two-factor protection and a password must be supplied.
    #[error("two-factor password required")]
    PasswordRequired,

    /// A group reference could not be turned into an addressable entity.
    #[error("could not resolve `{reference}`")]
    Resolution { reference: String },

    /// The user's privacy settings forbid being added by non-contacts.
    #[error("privacy restricted for user {user_id}")]
    PrivacyRestricted { user_id: i64 },

    /// The platform demands a cooldown before the next request.
    #[error("flood wait: {seconds} seconds")]
    FloodWait { seconds: u64 },

    /// Joining an invite link the account is already a member of.
    #[error("already a participant")]
    AlreadyParticipant,

    /// An RPC error with no dedicated recovery policy.
    #[error("rpc error {code}: {name}")]
    Rpc { code: i32, name: String },

    /// The invited-identities ledger could not be read or appended to.
    #[error("ledger error: {source}")]
    Ledger { source: std::io::Error },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EnlistError {
    /// Builds a transport error from any underlying error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Cooldown mandated by the platform, if this is a flood-wait signal.
    pub fn flood_wait(&self) -> Option<Duration> {
        match self {
            Self::FloodWait { seconds } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}
