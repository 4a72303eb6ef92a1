// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login handshake: phone, then code, then an optional two-factor password.

use std::sync::Arc;

use enlist_core::{ConnectionState, EnlistError, MessagingClient, SignInOutcome};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::trail::LogTrail;

/// Drives the platform login flow and tracks session connectivity.
pub struct SessionAuthenticator {
    client: Arc<dyn MessagingClient>,
    trail: Arc<LogTrail>,
    state: RwLock<ConnectionState>,
}

impl SessionAuthenticator {
    pub fn new(client: Arc<dyn MessagingClient>, trail: Arc<LogTrail>) -> Self {
        Self {
            client,
            trail,
            state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    /// Establishes connectivity. Idempotent.
    pub async fn connect(&self) -> Result<(), EnlistError> {
        if *self.state.read().await != ConnectionState::Disconnected {
            return Ok(());
        }
        self.client.connect().await?;

        let mut state = self.state.write().await;
        if *state == ConnectionState::Disconnected {
            *state = ConnectionState::Connected;
        }
        debug!("platform transport connected");
        Ok(())
    }

    /// True iff the persisted session is authorized for an account.
    pub async fn is_authorized(&self) -> Result<bool, EnlistError> {
        let authorized = self.client.is_authorized().await?;
        if authorized {
            *self.state.write().await = ConnectionState::Authorized;
        }
        Ok(authorized)
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Requests a login code for `phone` and returns the challenge handle.
    pub async fn send_code(&self, phone: &str) -> Result<String, EnlistError> {
        let phone = normalize_phone(phone)?;
        let challenge = self.client.request_login_code(&phone).await?;
        info!("login code requested");
        Ok(challenge)
    }

    /// Completes login.
    ///
    /// With `password` set the code step is skipped and the pending two-factor
    /// check is completed instead. Errors never escape: every failure becomes
    /// [`SignInOutcome::Failure`] and is recorded in the log trail.
    pub async fn sign_in(
        &self,
        phone: &str,
        code: Option<&str>,
        challenge: &str,
        password: Option<&str>,
    ) -> SignInOutcome {
        let attempt = match password {
            Some(password) => self.client.check_password(password).await,
            None => match normalize_phone(phone) {
                Ok(phone) => {
                    self.client
                        .sign_in(&phone, code.unwrap_or_default(), challenge)
                        .await
                }
                Err(e) => Err(e),
            },
        };

        match attempt {
            Ok(()) => {
                *self.state.write().await = ConnectionState::Authorized;
                if let Err(e) = self.client.save_session().await {
                    warn!(error = %e, "signed in but the session could not be persisted");
                }
                self.trail.push("Signed in successfully");
                SignInOutcome::Success
            }
            Err(EnlistError::PasswordRequired) => {
                self.trail.push("Two-factor password required");
                SignInOutcome::TwoFactorRequired
            }
            Err(e) => {
                self.trail.push(format!("Sign in error: {e}"));
                SignInOutcome::Failure(e.to_string())
            }
        }
    }
}

/// Validates a phone number and strips formatting.
///
/// Accepts digits with an optional leading `+`; spaces, dashes, dots and
/// parentheses are removed.
pub fn normalize_phone(phone: &str) -> Result<String, EnlistError> {
    let trimmed = phone.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    if digits.len() < 5 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(EnlistError::InvalidPhone(phone.to_string()));
    }
    Ok(format!("{plus}{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_formatting_is_stripped() {
        assert_eq!(normalize_phone(" +1 (555) 010-9999 ").unwrap(), "+15550109999");
        assert_eq!(normalize_phone("79991234567").unwrap(), "79991234567");
    }

    #[test]
    fn malformed_phones_are_rejected() {
        for bad in ["", "+", "abc", "12", "+12a45678", "1234567890123456"] {
            assert!(
                matches!(normalize_phone(bad), Err(EnlistError::InvalidPhone(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
