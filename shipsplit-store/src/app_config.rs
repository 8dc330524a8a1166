use serde::Deserialize;
use shipsplit_shared::Masked;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shipstation: ShipStationConfig,
    #[serde(default)]
    pub split: SplitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShipStationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent verbatim as the Authorization header
    pub api_key: Masked<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Sku tagging convention and derived order naming
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    #[serde(default = "default_primary_sku_prefix")]
    pub primary_sku_prefix: String,
    #[serde(default = "default_primary_suffix")]
    pub primary_suffix: String,
    #[serde(default = "default_secondary_suffix")]
    pub secondary_suffix: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            primary_sku_prefix: default_primary_sku_prefix(),
            primary_suffix: default_primary_suffix(),
            secondary_suffix: default_secondary_suffix(),
        }
    }
}

fn default_base_url() -> String { "https://ssapi.shipstation.com".to_string() }
fn default_timeout_seconds() -> u64 { 30 }
fn default_primary_sku_prefix() -> String { "ba001".to_string() }
fn default_primary_suffix() -> String { "-banner".to_string() }
fn default_secondary_suffix() -> String { "-split".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SHIPSPLIT__SHIPSTATION__API_KEY=...`
            .add_source(config::Environment::with_prefix("SHIPSPLIT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
