// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Enlist invite engine.
//!
//! This crate provides the error taxonomy, the shared data model, and the
//! [`MessagingClient`] trait that the platform adapter implements and the
//! engine consumes.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EnlistError;
pub use traits::MessagingClient;
pub use types::{
    ConnectionState, EngineStats, EntityKind, Member, ResolvedEntity, RunState, SignInOutcome,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enlist_error_messages() {
        let flood = EnlistError::FloodWait { seconds: 30 };
        assert_eq!(flood.to_string(), "flood wait: 30 seconds");
        assert_eq!(flood.flood_wait(), Some(std::time::Duration::from_secs(30)));

        let privacy = EnlistError::PrivacyRestricted { user_id: 222 };
        assert!(privacy.to_string().contains("222"));
        assert!(privacy.flood_wait().is_none());

        let resolution = EnlistError::Resolution {
            reference: "t.me/nowhere".into(),
        };
        assert!(resolution.to_string().contains("t.me/nowhere"));
    }

    #[test]
    fn run_state_activity() {
        assert!(!RunState::Idle.is_active());
        assert!(RunState::Resolving.is_active());
        assert!(RunState::Inviting.is_active());
        assert!(RunState::Stopping.is_active());
        assert!(!RunState::Finished.is_active());
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn run_state_display_and_parse() {
        use std::str::FromStr;

        for state in [
            RunState::Idle,
            RunState::Resolving,
            RunState::Inviting,
            RunState::Stopping,
            RunState::Finished,
        ] {
            let parsed = RunState::from_str(&state.to_string()).expect("should parse back");
            assert_eq!(state, parsed);
        }
        assert_eq!(RunState::Inviting.to_string(), "inviting");
    }

    #[test]
    fn engine_stats_serialize_with_wire_names() {
        let stats = EngineStats {
            successful: 2,
            skipped: 1,
            errors: 0,
        };
        let json = serde_json::to_value(stats).expect("should serialize");
        assert_eq!(
            json,
            serde_json::json!({"successful": 2, "skipped": 1, "errors": 0})
        );
    }

    #[test]
    fn member_identity_key_is_decimal_id() {
        assert_eq!(Member::new(111).identity_key(), "111");
        assert_eq!(Member::new(-5).identity_key(), "-5");
    }

    #[test]
    fn entity_label_prefers_title() {
        let titled = ResolvedEntity {
            id: 10,
            kind: EntityKind::Channel,
            access_hash: Some(1),
            title: Some("Target".into()),
        };
        assert_eq!(titled.label(), "Target (10)");

        let bare = ResolvedEntity {
            title: None,
            ..titled
        };
        assert_eq!(bare.label(), "10");
    }
}
