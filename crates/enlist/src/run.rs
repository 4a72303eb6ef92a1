// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `enlist run` command implementation: one invite pass in the foreground.

use std::sync::Arc;
use std::time::Duration;

use enlist_config::EnlistConfig;
use enlist_core::{EngineStats, EnlistError};
use enlist_engine::{InviteService, RunRequest, StartOutcome};
use tokio_util::sync::CancellationToken;

use crate::platform::build_client;
use crate::serve::init_tracing;
use crate::shutdown;

pub async fn run_invite(
    config: EnlistConfig,
    source: &str,
    target: &str,
    delay: Option<u64>,
) -> Result<(), EnlistError> {
    init_tracing(&config.agent.log_level);

    let client = build_client(&config)?;
    let service = InviteService::open(client, &config).await?;

    service.auth.connect().await?;
    if !service.auth.is_authorized().await? {
        return Err(EnlistError::Config(
            "session is not authorized; run `enlist login` first".into(),
        ));
    }

    let delay = Duration::from_secs(delay.unwrap_or(config.engine.default_delay_secs));
    let request = RunRequest::new(source, target, delay);
    let stats = drive(&service, request, shutdown::install_signal_handler()).await?;

    println!(
        "successful: {}, skipped: {}, errors: {}",
        stats.successful, stats.skipped, stats.errors
    );
    Ok(())
}

/// Runs `request` to completion, requesting a stop when `cancel` fires.
async fn drive(
    service: &InviteService,
    request: RunRequest,
    cancel: CancellationToken,
) -> Result<EngineStats, EnlistError> {
    let handle = match service.engine.start(request).await {
        StartOutcome::Started(handle) => handle,
        StartOutcome::AlreadyRunning => {
            return Err(EnlistError::Internal("an invite run is already active".into()));
        }
    };

    let engine = Arc::clone(&service.engine);
    let stopper = tokio::spawn(async move {
        cancel.cancelled().await;
        engine.stop().await;
    });

    let joined = handle.await;
    stopper.abort();
    joined.map_err(|e| EnlistError::Internal(format!("invite run panicked: {e}")))?;

    Ok(service.engine.stats().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enlist_test_utils::{MockClient, TestHarness, channel, members};

    fn groups() -> MockClient {
        MockClient::new()
            .with_group("@a", channel(1, "A"), members(&[10, 11, 12]))
            .with_group("@b", channel(2, "B"), vec![])
    }

    #[tokio::test(start_paused = true)]
    async fn drive_runs_to_completion() {
        let harness = TestHarness::builder()
            .with_client(groups())
            .build()
            .await
            .unwrap();

        let stats = drive(
            &harness.service,
            RunRequest::new("@a", "@b", Duration::from_secs(40)),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(stats.successful, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_stops_the_run() {
        let harness = TestHarness::builder()
            .with_client(groups())
            .build()
            .await
            .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stats = drive(
            &harness.service,
            RunRequest::new("@a", "@b", Duration::from_secs(40)),
            cancel,
        )
        .await
        .unwrap();

        assert!(stats.successful < 3);
        assert!(harness.logged("Stopping invitation process..."));
    }
}
