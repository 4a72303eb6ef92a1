// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns group references into addressable entities, joining private groups on the way.

use std::sync::Arc;

use enlist_core::{EnlistError, MessagingClient, ResolvedEntity};
use tracing::debug;

use crate::group_ref::GroupRef;
use crate::trail::LogTrail;

/// Resolves public handles, numeric ids, and private invite links.
#[derive(Clone)]
pub struct EntityResolver {
    client: Arc<dyn MessagingClient>,
    trail: Arc<LogTrail>,
}

impl EntityResolver {
    pub fn new(client: Arc<dyn MessagingClient>, trail: Arc<LogTrail>) -> Self {
        Self { client, trail }
    }

    /// Resolves `reference`, failing with [`EnlistError::Resolution`] when no entity is found.
    ///
    /// Join failures other than "already a participant" are logged and do not
    /// abort resolution; the generic lookup is still attempted. Transport
    /// errors from that final lookup propagate unchanged, any other lookup
    /// error becomes a resolution failure.
    pub async fn resolve(&self, reference: &GroupRef) -> Result<ResolvedEntity, EnlistError> {
        if let GroupRef::PrivateInvite { hash, .. } = reference {
            if let Some(entity) = self.resolve_private(hash).await {
                return Ok(entity);
            }
        }

        let raw = reference.raw();
        match self.client.resolve(&raw).await {
            Ok(Some(entity)) => Ok(entity),
            Ok(None) => Err(EnlistError::Resolution { reference: raw }),
            Err(e @ EnlistError::Transport { .. }) => Err(e),
            Err(e) => {
                debug!(reference = %raw, error = %e, "generic resolution failed");
                Err(EnlistError::Resolution { reference: raw })
            }
        }
    }

    async fn resolve_private(&self, hash: &str) -> Option<ResolvedEntity> {
        match self.client.import_chat_invite(hash).await {
            Ok(()) => self
                .trail
                .push(format!("Successfully joined group via invite link: {hash}")),
            Err(EnlistError::AlreadyParticipant) => self
                .trail
                .push(format!("Already a participant of the group: {hash}")),
            Err(e) => self
                .trail
                .push(format!("Error joining/checking invite link {hash}: {e}")),
        }

        match self.client.check_chat_invite(hash).await {
            Ok(found) => found,
            Err(e) => {
                debug!(hash, error = %e, "invite lookup failed, falling back to generic resolution");
                None
            }
        }
    }
}
