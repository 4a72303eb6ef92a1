// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invite engine for the Enlist workspace.
//!
//! Wires the platform client into:
//! - [`SessionAuthenticator`]: login handshake and connectivity
//! - [`EntityResolver`]: public handles, numeric ids, private invite links
//! - [`InviteLedger`]: durable record of invited identities
//! - [`RateGovernor`]: pacing after each attempt
//! - [`InviteEngine`]: the resumable bulk-invite state machine
//!
//! [`InviteService`] builds all of them around one shared [`LogTrail`].

pub mod auth;
pub mod engine;
pub mod governor;
pub mod group_ref;
pub mod ledger;
pub mod resolver;
pub mod trail;

use std::sync::Arc;

use enlist_config::EnlistConfig;
use enlist_core::{EnlistError, MessagingClient};

pub use auth::SessionAuthenticator;
pub use engine::{InviteEngine, RunRequest, StartOutcome};
pub use governor::{InviteOutcome, RateGovernor};
pub use group_ref::GroupRef;
pub use ledger::InviteLedger;
pub use resolver::EntityResolver;
pub use trail::LogTrail;

/// The process-wide authenticator and engine, sharing one client and log trail.
#[derive(Clone)]
pub struct InviteService {
    pub auth: Arc<SessionAuthenticator>,
    pub engine: Arc<InviteEngine>,
}

impl InviteService {
    /// Loads the ledger and assembles the service from configuration.
    pub async fn open(
        client: Arc<dyn MessagingClient>,
        config: &EnlistConfig,
    ) -> Result<Self, EnlistError> {
        let ledger = InviteLedger::load(&config.ledger.path).await?;
        let trail = Arc::new(LogTrail::new(config.engine.log_capacity));
        Ok(Self::with_parts(
            client,
            ledger,
            RateGovernor::from_config(&config.engine),
            trail,
        ))
    }

    pub fn with_parts(
        client: Arc<dyn MessagingClient>,
        ledger: InviteLedger,
        governor: RateGovernor,
        trail: Arc<LogTrail>,
    ) -> Self {
        let auth = Arc::new(SessionAuthenticator::new(
            Arc::clone(&client),
            Arc::clone(&trail),
        ));
        let engine = Arc::new(InviteEngine::new(client, ledger, governor, trail));
        Self { auth, engine }
    }

    pub fn trail(&self) -> &Arc<LogTrail> {
        self.engine.trail()
    }
}
