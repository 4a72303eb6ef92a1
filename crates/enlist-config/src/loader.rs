// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./enlist.toml` > `~/.config/enlist/enlist.toml` > `/etc/enlist/enlist.toml`
//! with environment variable overrides via `ENLIST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::EnlistConfig;

/// Config sections addressable from environment variables.
const ENV_SECTIONS: &[&str] = &["agent", "telegram", "ledger", "engine", "gateway"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/enlist/enlist.toml` (system-wide)
/// 3. `~/.config/enlist/enlist.toml` (user XDG config)
/// 4. `./enlist.toml` (local directory)
/// 5. `ENLIST_*` environment variables
pub fn load_config() -> Result<EnlistConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<EnlistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EnlistConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EnlistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EnlistConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EnlistConfig::default()))
        .merge(Toml::file("/etc/enlist/enlist.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("enlist/enlist.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("enlist.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ENLIST_TELEGRAM_API_HASH` must map to `telegram.api_hash`,
/// not `telegram.api.hash`. Variables outside the known sections (such as
/// `ENLIST_TWO_FACTOR_PASSWORD`) are ignored.
fn env_provider() -> Env {
    Env::prefixed("ENLIST_")
        .filter(|key| is_section_key(key.as_str()))
        .map(|key| map_env_key(key.as_str()).into())
}

fn is_section_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().any(|section| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

/// Maps a prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("telegram_api_hash"), "telegram.api_hash");
        assert_eq!(map_env_key("engine_default_delay_secs"), "engine.default_delay_secs");
        assert_eq!(map_env_key("gateway_bearer_token"), "gateway.bearer_token");
        assert_eq!(map_env_key("ledger_path"), "ledger.path");
        assert_eq!(map_env_key("unknown_key"), "unknown_key");
    }

    #[test]
    fn only_section_keys_are_read_from_env() {
        assert!(is_section_key("telegram_api_id"));
        assert!(!is_section_key("two_factor_password"));
        assert!(!is_section_key("telegram"));
        assert!(is_section_key("GATEWAY_PORT"));
    }
}
