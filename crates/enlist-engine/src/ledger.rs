// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable, append-only record of identities that were invited successfully.
//!
//! Backed by a flat UTF-8 file with one identity key per line. The file is the
//! source of truth: [`InviteLedger::add`] appends and syncs the key before the
//! in-memory set learns about it, so a crash between the two still leaves the
//! key discoverable on the next [`InviteLedger::load`].

use std::collections::HashSet;
use std::path::PathBuf;

use enlist_core::EnlistError;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Invited identity keys, loaded fully into memory.
#[derive(Debug)]
pub struct InviteLedger {
    path: PathBuf,
    keys: HashSet<String>,
    /// Keys in file order, for history listings.
    order: Vec<String>,
}

impl InviteLedger {
    /// Loads the ledger at `path`. A missing file is an empty ledger.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, EnlistError> {
        let path = path.into();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(EnlistError::Ledger { source }),
        };

        let mut ledger = Self {
            path,
            keys: HashSet::new(),
            order: Vec::new(),
        };
        for key in content.lines().map(str::trim).filter(|k| !k.is_empty()) {
            if ledger.keys.insert(key.to_string()) {
                ledger.order.push(key.to_string());
            }
        }

        debug!(path = %ledger.path.display(), count = ledger.order.len(), "ledger loaded");
        Ok(ledger)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Records `key`, persisting it before updating memory.
    ///
    /// Returns `Ok(false)` without touching the file if the key is already present.
    pub async fn add(&mut self, key: &str) -> Result<bool, EnlistError> {
        if self.keys.contains(key) {
            return Ok(false);
        }

        self.append(key)
            .await
            .map_err(|source| EnlistError::Ledger { source })?;

        self.keys.insert(key.to_string());
        self.order.push(key.to_string());
        Ok(true)
    }

    async fn append(&self, key: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{key}\n").as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await
    }

    /// All keys, in the order they were first recorded.
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = InviteLedger::load(dir.path().join("invited.txt")).await.unwrap();
        assert!(ledger.keys().is_empty());
        assert!(!ledger.contains("111"));
    }

    #[tokio::test]
    async fn load_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invited.txt");
        std::fs::write(&path, "111\n\n  222  \r\n111\n333").unwrap();

        let ledger = InviteLedger::load(&path).await.unwrap();
        assert_eq!(ledger.keys(), vec!["111", "222", "333"]);
        assert!(ledger.contains("222"));
    }

    #[tokio::test]
    async fn add_persists_before_returning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invited.txt");

        let mut ledger = InviteLedger::load(&path).await.unwrap();
        assert!(ledger.add("111").await.unwrap());
        assert!(ledger.add("222").await.unwrap());
        assert!(!ledger.add("111").await.unwrap(), "duplicate is a no-op");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "111\n222\n");

        let reloaded = InviteLedger::load(&path).await.unwrap();
        assert_eq!(reloaded.keys(), ledger.keys());
    }

    #[tokio::test]
    async fn write_failure_propagates_and_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("invited.txt");

        let mut ledger = InviteLedger::load(&path).await.unwrap();
        let err = ledger.add("111").await.unwrap_err();
        assert!(matches!(err, EnlistError::Ledger { .. }));
        assert!(!ledger.contains("111"));
    }
}
