// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `enlist history` command implementation.

use enlist_config::EnlistConfig;
use enlist_core::EnlistError;
use enlist_engine::InviteLedger;

/// Prints every ledger key, one per line, in the order recorded.
pub async fn run_history(config: &EnlistConfig) -> Result<(), EnlistError> {
    for key in history(config).await? {
        println!("{key}");
    }
    Ok(())
}

async fn history(config: &EnlistConfig) -> Result<Vec<String>, EnlistError> {
    Ok(InviteLedger::load(&config.ledger.path).await?.keys())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_keys_from_the_configured_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invited.txt");
        std::fs::write(&path, "5\n\n6\n5\n").unwrap();

        let mut config = EnlistConfig::default();
        config.ledger.path = path.to_string_lossy().to_string();

        assert_eq!(history(&config).await.unwrap(), vec!["5", "6"]);
    }

    #[tokio::test]
    async fn missing_ledger_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EnlistConfig::default();
        config.ledger.path = dir.path().join("none.txt").to_string_lossy().to_string();

        assert!(history(&config).await.unwrap().is_empty());
    }
}
