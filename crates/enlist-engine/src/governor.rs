// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pacing policy for the invite loop.
//!
//! | Outcome            | Sleep                          |
//! |--------------------|--------------------------------|
//! | Invited            | configured steady-state delay  |
//! | Privacy-restricted | privacy backoff (5s default)   |
//! | Flood-wait(N)      | exactly N seconds              |
//! | Other failure      | error backoff (10s default)    |

use std::time::Duration;

use enlist_config::model::EngineConfig;
use enlist_core::EnlistError;

/// Classified result of a single invite attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteOutcome {
    Invited,
    PrivacyRestricted,
    FloodWait(Duration),
    Failed(String),
}

impl InviteOutcome {
    /// Classifies the result of an invite call.
    pub fn from_result(result: &Result<(), EnlistError>) -> Self {
        match result {
            Ok(()) => Self::Invited,
            Err(EnlistError::PrivacyRestricted { .. }) => Self::PrivacyRestricted,
            Err(EnlistError::FloodWait { seconds }) => {
                Self::FloodWait(Duration::from_secs(*seconds))
            }
            Err(other) => Self::Failed(other.to_string()),
        }
    }

    /// Whether this outcome increments the run's `errors` counter.
    ///
    /// Flood-wait is a mandated pause, not an error.
    pub fn counts_as_error(&self) -> bool {
        matches!(self, Self::PrivacyRestricted | Self::Failed(_))
    }
}

/// Decides how long to wait before the next invite attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateGovernor {
    privacy_backoff: Duration,
    error_backoff: Duration,
}

impl RateGovernor {
    pub fn new(privacy_backoff: Duration, error_backoff: Duration) -> Self {
        Self {
            privacy_backoff,
            error_backoff,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Duration::from_secs(config.privacy_backoff_secs),
            Duration::from_secs(config.error_backoff_secs),
        )
    }

    /// Sleep before the next candidate, given this attempt's outcome.
    pub fn delay_for(&self, outcome: &InviteOutcome, configured: Duration) -> Duration {
        match outcome {
            InviteOutcome::Invited => configured,
            InviteOutcome::PrivacyRestricted => self.privacy_backoff,
            InviteOutcome::FloodWait(wait) => *wait,
            InviteOutcome::Failed(_) => self.error_backoff,
        }
    }
}

impl Default for RateGovernor {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(10))
    }
}
