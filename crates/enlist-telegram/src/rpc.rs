// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of platform RPC errors into [`EnlistError`] variants.
//!
//! RPC errors arrive either split (`FLOOD_WAIT` with value 30) or with the
//! value folded into the name (`FLOOD_WAIT_30`). Both forms classify the same.

use enlist_core::EnlistError;

/// Classifies an RPC error by code, name and optional numeric value.
pub fn classify_rpc(code: i32, name: &str, value: Option<u32>) -> EnlistError {
    let (base, folded) = split_value(name);
    let value = value.or(folded);

    match base {
        "FLOOD_WAIT" | "SLOWMODE_WAIT" | "FLOOD_PREMIUM_WAIT" => EnlistError::FloodWait {
            seconds: u64::from(value.unwrap_or(0)),
        },
        "USER_PRIVACY_RESTRICTED" | "USER_NOT_MUTUAL_CONTACT" => {
            EnlistError::PrivacyRestricted { user_id: 0 }
        }
        "USER_ALREADY_PARTICIPANT" => EnlistError::AlreadyParticipant,
        "PHONE_NUMBER_INVALID" => EnlistError::InvalidPhone(base.to_string()),
        "SESSION_PASSWORD_NEEDED" => EnlistError::PasswordRequired,
        "PASSWORD_HASH_INVALID" => EnlistError::Login(base.to_string()),
        other if other.starts_with("PHONE_CODE_") => EnlistError::Login(other.to_string()),
        _ => EnlistError::Rpc {
            code,
            name: name.to_string(),
        },
    }
}

/// Classifies a rendered error message by the first RPC name it mentions.
///
/// Used for error types that only expose a display form. Returns `None` when
/// the message names no RPC error at all.
pub fn classify_message(message: &str) -> Option<EnlistError> {
    let value = message.split("value: ").nth(1).and_then(|rest| {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    });

    message
        .split(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
        .filter(|token| token.len() > 3 && token.contains('_'))
        .map(|token| classify_rpc(400, token, value))
        .find(|err| !matches!(err, EnlistError::Rpc { .. }))
}

/// Splits a trailing `_<digits>` value off an RPC name.
fn split_value(name: &str) -> (&str, Option<u32>) {
    if let Some((base, tail)) = name.rsplit_once('_') {
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            return (base, tail.parse().ok());
        }
    }
    (name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_wait_in_both_forms() {
        assert!(matches!(
            classify_rpc(420, "FLOOD_WAIT", Some(30)),
            EnlistError::FloodWait { seconds: 30 }
        ));
        assert!(matches!(
            classify_rpc(420, "FLOOD_WAIT_30", None),
            EnlistError::FloodWait { seconds: 30 }
        ));
        assert!(matches!(
            classify_rpc(420, "SLOWMODE_WAIT", Some(12)),
            EnlistError::FloodWait { seconds: 12 }
        ));
        assert!(matches!(
            classify_rpc(420, "FLOOD_PREMIUM_WAIT_5", None),
            EnlistError::FloodWait { seconds: 5 }
        ));
    }

    #[test]
    fn invite_outcomes() {
        assert!(matches!(
            classify_rpc(403, "USER_PRIVACY_RESTRICTED", None),
            EnlistError::PrivacyRestricted { .. }
        ));
        assert!(matches!(
            classify_rpc(400, "USER_NOT_MUTUAL_CONTACT", None),
            EnlistError::PrivacyRestricted { .. }
        ));
        assert!(matches!(
            classify_rpc(400, "USER_ALREADY_PARTICIPANT", None),
            EnlistError::AlreadyParticipant
        ));
    }

    #[test]
    fn login_errors() {
        assert!(matches!(
            classify_rpc(400, "PHONE_NUMBER_INVALID", None),
            EnlistError::InvalidPhone(_)
        ));
        assert!(matches!(
            classify_rpc(401, "SESSION_PASSWORD_NEEDED", None),
            EnlistError::PasswordRequired
        ));
        assert!(matches!(
            classify_rpc(400, "PHONE_CODE_EXPIRED", None),
            EnlistError::Login(name) if name == "PHONE_CODE_EXPIRED"
        ));
        assert!(matches!(
            classify_rpc(400, "PASSWORD_HASH_INVALID", None),
            EnlistError::Login(_)
        ));
    }

    #[test]
    fn unknown_names_stay_unclassified() {
        match classify_rpc(400, "USER_CHANNELS_TOO_MUCH", None) {
            EnlistError::Rpc { code, name } => {
                assert_eq!(code, 400);
                assert_eq!(name, "USER_CHANNELS_TOO_MUCH");
            }
            other => panic!("unexpected {other:?}"),
        }
        // A numeric suffix on an unknown name is kept verbatim.
        assert!(matches!(
            classify_rpc(400, "CHAT_ID_1", None),
            EnlistError::Rpc { name, .. } if name == "CHAT_ID_1"
        ));
    }

    #[test]
    fn messages_are_scanned_for_rpc_names() {
        assert!(matches!(
            classify_message("request failed: rpc error 420: FLOOD_WAIT (value: 75)"),
            Some(EnlistError::FloodWait { seconds: 75 })
        ));
        assert!(matches!(
            classify_message("rpc error 400: PHONE_NUMBER_INVALID"),
            Some(EnlistError::InvalidPhone(_))
        ));
        assert!(classify_message("connection reset by peer").is_none());
        assert!(classify_message("rpc error 400: CHAT_ADMIN_REQUIRED").is_none());
    }
}
