// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints that serde attributes cannot express. All errors
//! are collected; validation never stops at the first failure.

use crate::diagnostic::ConfigError;
use crate::model::KedaiConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &KedaiConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(invalid("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(invalid(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(invalid("storage.database_path must not be empty"));
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(invalid(format!(
            "agent.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.agent.log_level
        )));
    }

    if config.agent.product_knowledge_path.trim().is_empty() {
        errors.push(invalid("agent.product_knowledge_path must not be empty"));
    }

    for (key, url) in [
        ("whatsapp.api_base_url", &config.whatsapp.api_base_url),
        ("gemini.base_url", &config.gemini.base_url),
        ("shipping.base_url", &config.shipping.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(invalid(format!(
                "{key} must start with http:// or https://, got `{url}`"
            )));
        }
    }

    if config.shipping.unit_weight_grams == 0 {
        errors.push(invalid("shipping.unit_weight_grams must be at least 1"));
    }

    let couriers = config.shipping.couriers.trim();
    if couriers.is_empty()
        || couriers
            .split(':')
            .any(|c| c.is_empty() || !c.chars().all(|ch| ch.is_ascii_alphanumeric()))
    {
        errors.push(invalid(format!(
            "shipping.couriers must be colon-separated courier codes like `jne:jnt`, got `{couriers}`"
        )));
    }

    for origin in &config.server.cors_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(invalid(format!(
                "server.cors_origins entries must start with http:// or https://, got `{origin}`"
            )));
        }
    }

    for (key, secs) in [
        ("whatsapp.timeout_secs", config.whatsapp.timeout_secs),
        ("gemini.timeout_secs", config.gemini.timeout_secs),
        ("shipping.timeout_secs", config.shipping.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(invalid(format!("{key} must be at least 1")));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks that every credential `kedai serve` needs is present.
///
/// Kept separate from [`validate_config`] so `check-config` and tests can
/// load a credential-free configuration.
pub fn validate_for_serve(config: &KedaiConfig) -> Result<(), Vec<ConfigError>> {
    let required = [
        ("whatsapp.app_secret", &config.whatsapp.app_secret),
        ("whatsapp.verify_token", &config.whatsapp.verify_token),
        ("whatsapp.access_token", &config.whatsapp.access_token),
        ("whatsapp.phone_number_id", &config.whatsapp.phone_number_id),
        ("gemini.api_key", &config.gemini.api_key),
        ("shipping.api_key", &config.shipping.api_key),
    ];

    let errors: Vec<ConfigError> = required
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(key, _)| ConfigError::MissingKey {
            key: key.to_string(),
        })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_validation(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&KedaiConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = KedaiConfig::default();
        config.storage.database_path = " ".into();
        config.shipping.unit_weight_grams = 0;
        config.agent.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_validation(&errors, "database_path"));
        assert!(has_validation(&errors, "unit_weight_grams"));
        assert!(has_validation(&errors, "log_level"));
    }

    #[test]
    fn malformed_courier_list_is_rejected() {
        let mut config = KedaiConfig::default();
        config.shipping.couriers = "jne::jnt".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "shipping.couriers"));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let mut config = KedaiConfig::default();
        config.gemini.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "gemini.base_url"));
    }

    #[test]
    fn cors_origin_without_scheme_is_rejected() {
        let mut config = KedaiConfig::default();
        config.server.cors_origins = vec!["https://toko.example".into(), "toko.example".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_validation(&errors, "server.cors_origins"));
    }

    #[test]
    fn serve_requires_all_credentials() {
        let errors = validate_for_serve(&KedaiConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 6);

        let mut config = KedaiConfig::default();
        config.whatsapp.app_secret = Some("a".into());
        config.whatsapp.verify_token = Some("b".into());
        config.whatsapp.access_token = Some("c".into());
        config.whatsapp.phone_number_id = Some("123".into());
        config.gemini.api_key = Some("d".into());
        config.shipping.api_key = Some("   ".into());

        let errors = validate_for_serve(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ConfigError::MissingKey { key } if key == "shipping.api_key"));
    }
}
