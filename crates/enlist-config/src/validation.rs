// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::EnlistConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &EnlistConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.ledger.path.trim().is_empty() {
        fail("ledger.path must not be empty".to_string());
    }

    if config.telegram.session_name.trim().is_empty() {
        fail("telegram.session_name must not be empty".to_string());
    }

    match (&config.telegram.api_id, &config.telegram.api_hash) {
        (Some(_), None) => fail("telegram.api_hash is required when api_id is set".to_string()),
        (None, Some(_)) => fail("telegram.api_id is required when api_hash is set".to_string()),
        (Some(id), Some(_)) if *id <= 0 => {
            fail(format!("telegram.api_id must be positive, got {id}"))
        }
        _ => {}
    }

    if config.engine.log_capacity == 0 {
        fail("engine.log_capacity must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &EnlistConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&EnlistConfig::default()).is_ok());
    }

    #[test]
    fn empty_ledger_path_fails_validation() {
        let mut config = EnlistConfig::default();
        config.ledger.path = "  ".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("ledger.path")));
    }

    #[test]
    fn half_configured_credentials_fail_validation() {
        let mut config = EnlistConfig::default();
        config.telegram.api_id = Some(1234);
        assert!(messages(&config).iter().any(|m| m.contains("api_hash")));

        let mut config = EnlistConfig::default();
        config.telegram.api_hash = Some("abc".into());
        assert!(messages(&config).iter().any(|m| m.contains("api_id")));
    }

    #[test]
    fn bad_host_and_zero_capacity_are_both_reported() {
        let mut config = EnlistConfig::default();
        config.gateway.host = "not a host!".to_string();
        config.engine.log_capacity = 0;
        let errors = messages(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|m| m.contains("gateway.host")));
        assert!(errors.iter().any(|m| m.contains("log_capacity")));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = EnlistConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.telegram.api_id = Some(33238695);
        config.telegram.api_hash = Some("0123456789abcdef".into());
        config.ledger.path = "/tmp/invited.txt".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_toml_sections_take_defaults() {
        let toml_str = r#"
            [telegram]
            api_id = 33238695
            api_hash = "0123456789abcdef"

            [engine]
            default_delay_secs = 10
        "#;
        let config: EnlistConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.default_delay_secs, 10);
        assert_eq!(config.gateway.port, 8000);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let result = toml::from_str::<EnlistConfig>("[gateway]\nprot = 9000\n");
        assert!(result.is_err());
    }
}
