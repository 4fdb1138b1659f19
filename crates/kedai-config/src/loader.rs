// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./kedai.toml` > `~/.config/kedai/kedai.toml` > `/etc/kedai/kedai.toml`
//! with environment variable overrides via `KEDAI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::KedaiConfig;

/// Sections that may be overridden from the environment.
const ENV_SECTIONS: &[&str] = &["agent", "server", "whatsapp", "gemini", "shipping", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/kedai/kedai.toml` (system-wide)
/// 3. `~/.config/kedai/kedai.toml` (user XDG config)
/// 4. `./kedai.toml` (local directory)
/// 5. `KEDAI_*` environment variables
pub fn load_config() -> Result<KedaiConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<KedaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KedaiConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KedaiConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KedaiConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(KedaiConfig::default()))
        .merge(Toml::file("/etc/kedai/kedai.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("kedai/kedai.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("kedai.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `KEDAI_WHATSAPP_APP_SECRET` must map to `whatsapp.app_secret`,
/// not `whatsapp.app.secret`.
fn env_provider() -> Env {
    Env::prefixed("KEDAI_").map(|key| {
        let key_str = key.as_str();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}
