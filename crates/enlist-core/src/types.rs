// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the platform adapter, the engine, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What kind of peer a resolved entity is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    /// Basic (legacy) group chat.
    Group,
    /// Broadcast channel or supergroup.
    Channel,
}

/// Platform-native handle for a user, group, or channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub id: i64,
    pub kind: EntityKind,
    /// Access hash required to address the peer, when the platform issues one.
    pub access_hash: Option<i64>,
    pub title: Option<String>,
}

impl ResolvedEntity {
    /// Human-readable label for log lines.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} ({})", self.id),
            None => self.id.to_string(),
        }
    }
}

/// One member of an enumerated group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub access_hash: Option<i64>,
    pub username: Option<String>,
}

impl Member {
    /// Creates a member with only a numeric id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            access_hash: None,
            username: None,
        }
    }

    /// Ledger identity key: the string form of the numeric user id.
    pub fn identity_key(&self) -> String {
        self.id.to_string()
    }
}

/// Counters for a single invite run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub successful: u64,
    pub skipped: u64,
    pub errors: u64,
}

/// Lifecycle of the invite engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Resolving,
    Inviting,
    Stopping,
    Finished,
}

impl RunState {
    /// Whether an invite run currently occupies the engine.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Resolving | Self::Inviting | Self::Stopping)
    }
}

/// Connectivity of the platform session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Authorized,
}

/// Outcome of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Success,
    TwoFactorRequired,
    Failure(String),
}
