// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `enlist login` command implementation.
//!
//! Walks phone, code and optional two-factor password on the terminal and
//! leaves an authorized session file behind for `serve` and `run`.

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use enlist_config::EnlistConfig;
use enlist_core::{EnlistError, SignInOutcome};
use enlist_engine::{LogTrail, SessionAuthenticator};
use secrecy::{ExposeSecret, SecretString};

use crate::platform::build_client;
use crate::serve::init_tracing;

/// Environment variable that supplies the two-factor password non-interactively.
pub const TWO_FACTOR_ENV_VAR: &str = "ENLIST_TWO_FACTOR_PASSWORD";

/// Source of interactive answers.
pub trait Prompter {
    fn line(&mut self, label: &str) -> Result<String, EnlistError>;
    fn secret(&mut self, label: &str) -> Result<SecretString, EnlistError>;
}

/// Reads answers from the controlling terminal.
struct TtyPrompter;

impl Prompter for TtyPrompter {
    fn line(&mut self, label: &str) -> Result<String, EnlistError> {
        eprint!("{label}");
        std::io::stderr()
            .flush()
            .map_err(|e| EnlistError::Internal(format!("failed to write prompt: {e}")))?;
        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| EnlistError::Internal(format!("failed to read input: {e}")))?;
        Ok(answer.trim().to_string())
    }

    fn secret(&mut self, label: &str) -> Result<SecretString, EnlistError> {
        if !std::io::stdin().is_terminal() {
            return Err(EnlistError::Login(format!(
                "two-factor password required; set {TWO_FACTOR_ENV_VAR} or run interactively"
            )));
        }
        eprint!("{label}");
        let password = rpassword::read_password()
            .map_err(|e| EnlistError::Internal(format!("failed to read password: {e}")))?;
        Ok(SecretString::from(password))
    }
}

pub async fn run_login(config: EnlistConfig, phone: Option<String>) -> Result<(), EnlistError> {
    init_tracing(&config.agent.log_level);

    let client = build_client(&config)?;
    let trail = Arc::new(LogTrail::new(config.engine.log_capacity));
    let auth = SessionAuthenticator::new(client, trail);

    if login(&auth, phone, &mut TtyPrompter).await? {
        println!(
            "Signed in. Session saved to {}",
            config.telegram.session_path().display()
        );
    } else {
        println!("Already authorized.");
    }
    Ok(())
}

fn two_factor_password(prompter: &mut dyn Prompter) -> Result<SecretString, EnlistError> {
    if let Ok(password) = std::env::var(TWO_FACTOR_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(SecretString::from(password));
    }
    prompter.secret("Two-factor password: ")
}

/// Drives the login handshake. Returns `false` if the session was already authorized.
async fn login(
    auth: &SessionAuthenticator,
    phone: Option<String>,
    prompter: &mut dyn Prompter,
) -> Result<bool, EnlistError> {
    auth.connect().await?;
    if auth.is_authorized().await? {
        return Ok(false);
    }

    let phone = match phone {
        Some(phone) => phone,
        None => prompter.line("Phone number: ")?,
    };
    let challenge = auth.send_code(&phone).await?;
    let code = prompter.line("Login code: ")?;

    match auth.sign_in(&phone, Some(&code), &challenge, None).await {
        SignInOutcome::Success => Ok(true),
        SignInOutcome::TwoFactorRequired => {
            let password = two_factor_password(prompter)?;
            match auth
                .sign_in(&phone, None, &challenge, Some(password.expose_secret()))
                .await
            {
                SignInOutcome::Success => Ok(true),
                SignInOutcome::TwoFactorRequired => Err(EnlistError::PasswordRequired),
                SignInOutcome::Failure(reason) => Err(EnlistError::Login(reason)),
            }
        }
        SignInOutcome::Failure(reason) => Err(EnlistError::Login(reason)),
    }
}
