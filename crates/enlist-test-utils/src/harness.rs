// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine testing.
//!
//! `TestHarness` assembles an [`InviteService`] around a [`MockClient`] and a
//! ledger file in a temp directory, so runs can be driven and inspected
//! without a live platform.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use enlist_config::EnlistConfig;
use enlist_core::{EngineStats, EnlistError, RunState};
use enlist_engine::{InviteService, RunRequest, StartOutcome};

use crate::mock_client::MockClient;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    client: MockClient,
    seeded: Vec<String>,
    config: EnlistConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = EnlistConfig::default();
        config.engine.privacy_backoff_secs = 5;
        config.engine.error_backoff_secs = 10;
        Self {
            client: MockClient::new(),
            seeded: Vec::new(),
            config,
        }
    }

    /// Use a scripted client.
    pub fn with_client(mut self, client: MockClient) -> Self {
        self.client = client;
        self
    }

    /// Pre-populate the ledger file with these identity keys.
    pub fn with_ledger(mut self, keys: &[&str]) -> Self {
        self.seeded = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.config.engine.log_capacity = capacity;
        self
    }

    /// Build the harness, writing the seeded ledger before the service loads it.
    pub async fn build(mut self) -> Result<TestHarness, EnlistError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|source| EnlistError::Ledger { source })?;
        let ledger_path = temp_dir.path().join("invited.txt");

        if !self.seeded.is_empty() {
            let mut content = self.seeded.join("\n");
            content.push('\n');
            tokio::fs::write(&ledger_path, content)
                .await
                .map_err(|source| EnlistError::Ledger { source })?;
        }

        self.config.ledger.path = ledger_path.to_string_lossy().to_string();
        let client = Arc::new(self.client);
        let service = InviteService::open(client.clone(), &self.config).await?;

        Ok(TestHarness {
            client,
            service,
            config: self.config,
            ledger_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete engine environment with a scripted client and temp ledger.
pub struct TestHarness {
    /// The scripted platform.
    pub client: Arc<MockClient>,
    pub service: InviteService,
    pub config: EnlistConfig,
    pub ledger_path: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Starts a run and waits for it to finish. Returns the final stats.
    ///
    /// Panics if a run was already active.
    pub async fn run_to_completion(&self, source: &str, target: &str, delay: Duration) -> EngineStats {
        match self
            .service
            .engine
            .start(RunRequest::new(source, target, delay))
            .await
        {
            StartOutcome::Started(handle) => {
                handle.await.expect("invite run panicked");
            }
            StartOutcome::AlreadyRunning => panic!("a run was already active"),
        }
        assert_eq!(self.service.engine.state(), RunState::Finished);
        self.service.engine.stats().await
    }

    /// Ledger keys as persisted on disk, in file order.
    pub async fn ledger_on_disk(&self) -> Vec<String> {
        match tokio::fs::read_to_string(&self.ledger_path).await {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// True if any log trail entry contains `needle`.
    pub fn logged(&self, needle: &str) -> bool {
        self.service
            .trail()
            .snapshot()
            .iter()
            .any(|line| line.contains(needle))
    }
}
