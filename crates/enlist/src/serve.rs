// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `enlist serve` command implementation.
//!
//! Connects the platform session, loads the ledger, and serves the control
//! API until SIGINT/SIGTERM. An active run is asked to stop on shutdown.

use std::time::Duration;

use enlist_config::EnlistConfig;
use enlist_core::{EnlistError, RunState};
use enlist_engine::InviteService;
use enlist_gateway::{GatewayState, ServerConfig, start_server};
use tracing::{info, warn};

use crate::platform::build_client;
use crate::shutdown;

/// How long shutdown waits for an active run to reach `Finished`.
const RUN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run_serve(config: EnlistConfig) -> Result<(), EnlistError> {
    init_tracing(&config.agent.log_level);

    let client = build_client(&config)?;
    let service = InviteService::open(client, &config).await?;

    service.auth.connect().await?;
    match service.auth.is_authorized().await {
        Ok(true) => info!("session authorized"),
        Ok(false) => warn!(
            "session is not authorized; log in through /login/send-code and /login/verify"
        ),
        Err(e) => warn!(error = %e, "could not check session authorization"),
    }

    let cancel = shutdown::install_signal_handler();
    let state = GatewayState::new(service.clone(), &config);
    start_server(&ServerConfig::from(&config.gateway), state, cancel).await?;

    drain(&service).await;
    info!("shutdown complete");
    Ok(())
}

/// Stops an active run and waits briefly for it to finish.
async fn drain(service: &InviteService) {
    if !service.engine.is_running() {
        return;
    }
    service.engine.stop().await;

    let mut state = service.engine.subscribe();
    let finished = tokio::time::timeout(
        RUN_DRAIN_TIMEOUT,
        state.wait_for(|s| *s == RunState::Finished),
    )
    .await;
    if finished.is_err() {
        warn!("invite run did not finish before shutdown");
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` overrides the default `enlist=<level>,warn` filter.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("enlist={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
