// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `enlist status` command implementation.
//!
//! Queries `/status` on a running server. Falls back to an offline report
//! when nothing is listening.

use std::io::IsTerminal;
use std::time::Duration;

use colored::Colorize;
use enlist_config::EnlistConfig;
use enlist_core::EnlistError;
use enlist_gateway::handlers::StatusResponse;

pub async fn run_status(config: &EnlistConfig, json: bool) -> Result<(), EnlistError> {
    let host = &config.gateway.host;
    let port = config.gateway.port;
    let url = format!("http://{host}:{port}/status");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| EnlistError::Internal(format!("failed to create HTTP client: {e}")))?;

    let mut request = client.get(&url);
    if let Some(token) = &config.gateway.bearer_token {
        request = request.bearer_auth(token);
    }

    let status = match request.send().await {
        Ok(resp) if resp.status().is_success() => Some(
            resp.json::<StatusResponse>()
                .await
                .map_err(|e| EnlistError::Internal(format!("failed to parse status: {e}")))?,
        ),
        Ok(resp) if resp.status() == reqwest::StatusCode::UNAUTHORIZED => {
            return Err(EnlistError::Config(
                "server rejected the request; check gateway.bearer_token".into(),
            ));
        }
        _ => None,
    };

    let use_color = std::io::stdout().is_terminal();
    match (status, json) {
        (Some(status), true) => println!("{}", status_json(&status)),
        (Some(status), false) => print_status(&status, use_color),
        (None, true) => println!(
            "{}",
            serde_json::json!({"running": false, "host": host, "port": port})
        ),
        (None, false) => println!("  enlist is not running ({host}:{port})"),
    }
    Ok(())
}

fn status_json(status: &StatusResponse) -> String {
    serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
}

fn print_status(status: &StatusResponse, use_color: bool) {
    let state = if status.is_running { "running" } else { "idle" };
    let authorized = if status.authorized {
        "authorized"
    } else {
        "not authorized"
    };

    println!();
    println!("  enlist status");
    println!("  {}", "-".repeat(35));
    if use_color {
        let state = if status.is_running {
            state.green()
        } else {
            state.normal()
        };
        let authorized = if status.authorized {
            authorized.green()
        } else {
            authorized.yellow()
        };
        println!("    Engine:   {state}");
        println!("    Session:  {authorized}");
    } else {
        println!("    Engine:   {state}");
        println!("    Session:  {authorized}");
    }
    println!("    {}", stats_line(status));

    if !status.logs.is_empty() {
        println!();
        for line in &status.logs {
            println!("    {line}");
        }
    }
    println!();
}

fn stats_line(status: &StatusResponse) -> String {
    format!(
        "Invited:  {} (skipped {}, errors {})",
        status.stats.successful, status.stats.skipped, status.stats.errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use enlist_core::EngineStats;

    fn sample() -> StatusResponse {
        StatusResponse {
            authorized: true,
            is_running: false,
            stats: EngineStats {
                successful: 4,
                skipped: 2,
                errors: 1,
            },
            logs: vec!["[12:00:00] Invited: 1".into()],
        }
    }

    #[test]
    fn stats_line_lists_all_counters() {
        assert_eq!(stats_line(&sample()), "Invited:  4 (skipped 2, errors 1)");
    }

    #[test]
    fn json_output_matches_the_status_endpoint() {
        let json: serde_json::Value = serde_json::from_str(&status_json(&sample())).unwrap();
        assert_eq!(json["stats"]["successful"], 4);
        assert_eq!(json["authorized"], true);
        assert_eq!(json["logs"][0], "[12:00:00] Invited: 1");
    }

    #[tokio::test]
    async fn unreachable_server_is_reported_offline() {
        let mut config = EnlistConfig::default();
        // Port 9 (discard) is not expected to serve HTTP.
        config.gateway.port = 9;
        assert!(run_status(&config, true).await.is_ok());
    }
}
