//! Application configuration
//!
//! Loaded from a TOML file (default: ~/.config/storapedia/config.toml,
//! override with STORAPEDIA_CONFIG). Every section has working defaults
//! so a missing file means a local SQLite setup with the documented
//! price list.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::pricing::PricingTable;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub pricing: PricingSection,
    pub payment: PaymentSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds allowed for graceful shutdown
    pub shutdown_timeout: u64,
    /// Port for the Prometheus scrape endpoint
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
            metrics_port: 9090,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite path; ignored when `url` is set
    pub path: String,
    /// Full connection URL, overrides `path`
    pub url: Option<String>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: "./storapedia.db".to_string(),
            url: None,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path),
        }
    }
}

/// Daily rates per unit size and the flat pickup fee, in whole rupiah
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    pub small_daily_rate: i64,
    pub medium_daily_rate: i64,
    pub large_daily_rate: i64,
    pub pickup_fee: i64,
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            small_daily_rate: 25_000,
            medium_daily_rate: 50_000,
            large_daily_rate: 90_000,
            pickup_fee: 150_000,
        }
    }
}

impl From<&PricingSection> for PricingTable {
    fn from(s: &PricingSection) -> Self {
        Self {
            small_daily_rate: s.small_daily_rate,
            medium_daily_rate: s.medium_daily_rate,
            large_daily_rate: s.large_daily_rate,
            pickup_fee: s.pickup_fee,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentSection {
    /// Simulated gateway latency in milliseconds
    pub gateway_delay_ms: u64,
    /// Seconds before a payment or persistence call times out
    pub network_timeout_secs: u64,
}

impl Default for PaymentSection {
    fn default() -> Self {
        Self {
            gateway_delay_ms: 500,
            network_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter, e.g. "info" or "storapedia=debug,info"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

/// Default config file location: ~/.config/storapedia/config.toml
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storapedia")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────
