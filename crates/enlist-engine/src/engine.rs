// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bulk-invite state machine.
//!
//! States: Idle -> Resolving -> Inviting -> Finished, with Stopping entered
//! from either active state when a stop is requested. At most one run is
//! active per engine; the run state lives in a watch channel so claiming a
//! run is a single compare-and-set and observers can await transitions.
//!
//! Per member, in enumeration order:
//! - already in the ledger: `skipped += 1`, no delay
//! - invited: ledger append (persisted), `successful += 1`, sleep `delay`
//! - privacy-restricted: `errors += 1`, privacy backoff
//! - flood-wait(N): sleep N, member is not retried
//! - anything else: `errors += 1`, error backoff

use std::sync::Arc;
use std::time::Duration;

use enlist_core::{EngineStats, EnlistError, Member, MessagingClient, ResolvedEntity, RunState};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::governor::{InviteOutcome, RateGovernor};
use crate::group_ref::GroupRef;
use crate::ledger::InviteLedger;
use crate::resolver::EntityResolver;
use crate::trail::LogTrail;

/// Parameters of one invite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub source: GroupRef,
    pub target: GroupRef,
    /// Steady-state pause after each successful invite.
    pub delay: Duration,
}

impl RunRequest {
    pub fn new(source: &str, target: &str, delay: Duration) -> Self {
        Self {
            source: GroupRef::parse(source),
            target: GroupRef::parse(target),
            delay,
        }
    }
}

/// Result of a start request.
#[derive(Debug)]
pub enum StartOutcome {
    /// The run was spawned; the handle completes when the run is finished.
    Started(JoinHandle<()>),
    /// Another run is active; nothing changed.
    AlreadyRunning,
}

/// Orchestrates resolve, enumerate, and the governed invite loop.
pub struct InviteEngine {
    client: Arc<dyn MessagingClient>,
    resolver: EntityResolver,
    governor: RateGovernor,
    trail: Arc<LogTrail>,
    ledger: RwLock<InviteLedger>,
    stats: RwLock<EngineStats>,
    state: watch::Sender<RunState>,
    /// Cancellation for the active run. Also serializes start against stop.
    cancel: Mutex<CancellationToken>,
}

impl InviteEngine {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        ledger: InviteLedger,
        governor: RateGovernor,
        trail: Arc<LogTrail>,
    ) -> Self {
        let resolver = EntityResolver::new(Arc::clone(&client), Arc::clone(&trail));
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            client,
            resolver,
            governor,
            trail,
            ledger: RwLock::new(ledger),
            stats: RwLock::new(EngineStats::default()),
            state,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state().is_active()
    }

    /// Watches run state transitions.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Snapshot of the current (or last) run's counters.
    pub async fn stats(&self) -> EngineStats {
        *self.stats.read().await
    }

    /// Every identity key in the ledger, in the order it was recorded.
    pub async fn history(&self) -> Vec<String> {
        self.ledger.read().await.keys()
    }

    pub fn trail(&self) -> &Arc<LogTrail> {
        &self.trail
    }

    /// Starts a run in the background unless one is already active.
    pub async fn start(self: &Arc<Self>, request: RunRequest) -> StartOutcome {
        let mut cancel = self.cancel.lock().await;

        let claimed = self.state.send_if_modified(|state| {
            if state.is_active() {
                false
            } else {
                *state = RunState::Resolving;
                true
            }
        });
        if !claimed {
            debug!("start ignored, a run is already active");
            return StartOutcome::AlreadyRunning;
        }

        *cancel = CancellationToken::new();
        *self.stats.write().await = EngineStats::default();

        let token = cancel.clone();
        let engine = Arc::clone(self);
        StartOutcome::Started(tokio::spawn(async move {
            engine.run(request, token).await;
        }))
    }

    /// Requests that the active run stop after the in-flight attempt.
    ///
    /// Does not wait for the run to exit. Safe to call repeatedly or when idle.
    pub async fn stop(&self) {
        let cancel = self.cancel.lock().await;
        self.trail.push("Stopping invitation process...");
        self.state.send_if_modified(|state| {
            if matches!(state, RunState::Resolving | RunState::Inviting) {
                *state = RunState::Stopping;
                true
            } else {
                false
            }
        });
        cancel.cancel();
    }

    async fn run(&self, request: RunRequest, cancel: CancellationToken) {
        self.trail.push(format!(
            "Starting invitation: {} -> {}",
            request.source, request.target
        ));

        if let Err(e) = self.execute(&request, &cancel).await {
            error!(error = %e, "invite run aborted");
            self.trail.push(format!("Fatal error in invitation loop: {e}"));
        }

        let stats = self.stats().await;
        info!(
            successful = stats.successful,
            skipped = stats.skipped,
            errors = stats.errors,
            "invite run finished"
        );
        self.trail.push("Invitation process finished.");
        self.state.send_replace(RunState::Finished);
    }

    async fn execute(&self, request: &RunRequest, cancel: &CancellationToken) -> Result<(), EnlistError> {
        let source = self.resolver.resolve(&request.source).await?;
        let target = self.resolver.resolve(&request.target).await?;
        debug!(source = %source.label(), target = %target.label(), "groups resolved");

        if cancel.is_cancelled() {
            return Ok(());
        }

        // The whole membership is fetched before the first invite.
        let members = self.client.participants(&source).await?;
        self.trail
            .push(format!("Found {} users in source group", members.len()));

        self.state.send_if_modified(|state| {
            if *state == RunState::Resolving {
                *state = RunState::Inviting;
                true
            } else {
                false
            }
        });

        for member in &members {
            if cancel.is_cancelled() {
                break;
            }

            let key = member.identity_key();
            if self.ledger.read().await.contains(&key) {
                self.stats.write().await.skipped += 1;
                continue;
            }

            let pause = self.invite(&target, member, &key, request.delay).await?;

            tokio::select! {
                () = tokio::time::sleep(pause) => {}
                () = cancel.cancelled() => {}
            }
        }

        Ok(())
    }

    /// One invite attempt. Returns the governed pause before the next member.
    ///
    /// Only a ledger write failure is returned as an error.
    async fn invite(
        &self,
        target: &ResolvedEntity,
        member: &Member,
        key: &str,
        delay: Duration,
    ) -> Result<Duration, EnlistError> {
        let result = self.client.invite_to_channel(target, member).await;
        let outcome = InviteOutcome::from_result(&result);

        match &outcome {
            InviteOutcome::Invited => {
                self.ledger.write().await.add(key).await?;
                self.stats.write().await.successful += 1;
                self.trail.push(format!("Invited: {}", member.id));
            }
            InviteOutcome::PrivacyRestricted => {
                self.trail
                    .push(format!("Privacy restricted for user {}", member.id));
            }
            InviteOutcome::FloodWait(wait) => {
                warn!(user_id = member.id, seconds = wait.as_secs(), "flood wait");
                self.trail
                    .push(format!("Flood wait: {} seconds", wait.as_secs()));
            }
            InviteOutcome::Failed(reason) => {
                debug!(user_id = member.id, reason = %reason, "invite failed");
                self.trail
                    .push(format!("Error inviting {}: {reason}", member.id));
            }
        }
        if outcome.counts_as_error() {
            self.stats.write().await.errors += 1;
        }

        Ok(self.governor.delay_for(&outcome, delay))
    }
}
