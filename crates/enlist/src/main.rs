// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enlist - resumable, rate-governed bulk inviter for Telegram groups.
//!
//! This is the binary entry point.

mod history;
mod login;
mod platform;
mod run;
mod serve;
mod shutdown;
mod status;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use enlist_config::{ConfigError, EnlistConfig};

/// Enlist - invite the members of one Telegram group into another.
#[derive(Parser, Debug)]
#[command(name = "enlist", version, about, long_about = None)]
struct Cli {
    /// Explicit config file (skips the XDG lookup).
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP control API.
    Serve,
    /// Run one invite pass in the foreground. Ctrl+C stops it.
    Run {
        /// Source group: @handle, t.me link, private invite link, or numeric id.
        #[arg(long)]
        source: String,
        /// Target group, in the same forms as the source.
        #[arg(long)]
        target: String,
        /// Seconds to pause after each successful invite.
        #[arg(long)]
        delay: Option<u64>,
    },
    /// Log in interactively and persist the session.
    Login {
        /// Phone number in international format. Prompted if omitted.
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show the state of a running server.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print every identity key in the invite ledger.
    History,
}

fn load_config(path: Option<&Path>) -> Result<EnlistConfig, Vec<ConfigError>> {
    match path {
        Some(path) => enlist_config::load_and_validate_path(path),
        None => enlist_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            enlist_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Run {
            source,
            target,
            delay,
        } => run::run_invite(config, &source, &target, delay).await,
        Commands::Login { phone } => login::run_login(config, phone).await,
        Commands::Status { json } => status::run_status(&config, json).await,
        Commands::History => history::run_history(&config).await,
    };

    if let Err(e) = result {
        eprintln!("enlist: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "enlist",
            "run",
            "--source",
            "@from",
            "--target",
            "https://t.me/+AbC",
            "--delay",
            "15",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                source,
                target,
                delay,
            } => {
                assert_eq!(source, "@from");
                assert_eq!(target, "https://t.me/+AbC");
                assert_eq!(delay, Some(15));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["enlist", "status", "--json", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("x.toml")));
        assert!(matches!(cli.command, Commands::Status { json: true }));
    }

    #[test]
    fn run_requires_source_and_target() {
        assert!(Cli::try_parse_from(["enlist", "run", "--source", "@a"]).is_err());
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enlist.toml");
        std::fs::write(&path, "[engine]\ndefault_delay_secs = 7\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.engine.default_delay_secs, 7);
    }
}
