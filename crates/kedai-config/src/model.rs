// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Kedai order assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. Sections
//! that carry credentials implement `Debug` by hand so secrets never reach
//! the logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level Kedai configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KedaiConfig {
    /// Assistant persona and process settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// WhatsApp Cloud API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Gemini language model settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Shipping-rate provider settings.
    #[serde(default)]
    pub shipping: ShippingConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Assistant persona and process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Process name, used as the log target prefix.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Name the assistant introduces itself with.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Brand the assistant represents.
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Plain-text product knowledge document loaded once at startup.
    #[serde(default = "default_product_knowledge_path")]
    pub product_knowledge_path: String,

    /// Number of prior messages included in the reply prompt.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            bot_name: default_bot_name(),
            brand_name: default_brand_name(),
            log_level: default_log_level(),
            product_knowledge_path: default_product_knowledge_path(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_agent_name() -> String {
    "kedai".to_string()
}

fn default_bot_name() -> String {
    "Waiteu Genius".to_string()
}

fn default_brand_name() -> String {
    "Laili Waiteu".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_product_knowledge_path() -> String {
    "data_produk.txt".to_string()
}

fn default_history_limit() -> usize {
    10
}

/// HTTP listener configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required by `GET /events`. Unset rejects every subscriber.
    #[serde(default)]
    pub events_token: Option<String>,

    /// Browser origins allowed to read the HTTP API. Empty allows none.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            events_token: None,
            cors_origins: Vec::new(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("events_token", &redacted(&self.events_token))
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// WhatsApp Cloud API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Graph API bearer token used to send messages.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Business phone number id messages are sent from.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Token echoed back during webhook subscription verification.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// App secret used to validate `x-hub-signature-256`.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Graph API base URL.
    #[serde(default = "default_graph_base_url")]
    pub api_base_url: String,

    /// Graph API version path segment.
    #[serde(default = "default_graph_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_whatsapp_timeout")]
    pub timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            app_secret: None,
            api_base_url: default_graph_base_url(),
            api_version: default_graph_api_version(),
            timeout_secs: default_whatsapp_timeout(),
        }
    }
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("access_token", &redacted(&self.access_token))
            .field("phone_number_id", &self.phone_number_id)
            .field("verify_token", &redacted(&self.verify_token))
            .field("app_secret", &redacted(&self.app_secret))
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_graph_api_version() -> String {
    "v19.0".to_string()
}

fn default_whatsapp_timeout() -> u64 {
    15
}

/// Gemini language model configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Generative Language API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model used for intent classification and order extraction.
    #[serde(default = "default_gemini_model")]
    pub classifier_model: String,

    /// Model used for reply generation.
    #[serde(default = "default_gemini_model")]
    pub reply_model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            classifier_model: default_gemini_model(),
            reply_model: default_gemini_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("classifier_model", &self.classifier_model)
            .field("reply_model", &self.reply_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_timeout() -> u64 {
    60
}

/// Shipping-rate provider configuration (RajaOngkir via Komerce).
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShippingConfig {
    /// API key sent in the `key` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider base URL, without trailing slash.
    #[serde(default = "default_shipping_base_url")]
    pub base_url: String,

    /// District id parcels ship from.
    #[serde(default = "default_origin_id")]
    pub origin_id: i64,

    /// Colon-separated courier codes to price.
    #[serde(default = "default_couriers")]
    pub couriers: String,

    /// Weight of one item in grams.
    #[serde(default = "default_unit_weight_grams")]
    pub unit_weight_grams: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_shipping_timeout")]
    pub timeout_secs: u64,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_shipping_base_url(),
            origin_id: default_origin_id(),
            couriers: default_couriers(),
            unit_weight_grams: default_unit_weight_grams(),
            timeout_secs: default_shipping_timeout(),
        }
    }
}

impl fmt::Debug for ShippingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("origin_id", &self.origin_id)
            .field("couriers", &self.couriers)
            .field("unit_weight_grams", &self.unit_weight_grams)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_shipping_base_url() -> String {
    "https://rajaongkir.komerce.id/api/v1".to_string()
}

fn default_origin_id() -> i64 {
    1477
}

fn default_couriers() -> String {
    "jne:jnt".to_string()
}

fn default_unit_weight_grams() -> u32 {
    150
}

fn default_shipping_timeout() -> u64 {
    15
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("kedai").join("kedai.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("kedai.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn redacted(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}
