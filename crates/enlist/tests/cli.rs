// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests that run the compiled `enlist` binary.

use std::path::Path;
use std::process::{Command, Output};

fn enlist(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_enlist"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run enlist")
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("enlist.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn history_prints_ledger_keys() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("invited.txt");
    std::fs::write(&ledger, "111\n222\n").unwrap();
    let config = write_config(
        dir.path(),
        &format!("[ledger]\npath = {:?}\n", ledger.to_string_lossy()),
    );

    let output = enlist(&config, &["history"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "111\n222\n");
}

#[test]
fn invalid_config_exits_with_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[engine]\ndefault_dealy_secs = 5\n");

    let output = enlist(&config, &["history"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("default_delay_secs"), "stderr: {stderr}");
}

#[cfg(not(feature = "mtproto"))]
#[test]
fn run_without_platform_client_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    let output = enlist(&config, &["run", "--source", "@a", "--target", "@b"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("built without a platform client"), "stderr: {stderr}");
}
