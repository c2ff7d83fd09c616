// =============================================================================
// Runtime Configuration: service settings loaded from JSON
// =============================================================================
//
// Everything that varies between deployments lives here: where to listen,
// which market-data source to use and how to reach it, and the reference time
// zone that defines "today". Indicator windows are fixed constants in their
// own modules and are deliberately absent.
//
// All fields carry `#[serde(default)]` so that adding new fields never breaks
// loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Adjust, ProviderKind};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_history_start() -> String {
    "19910101".to_string()
}

fn default_base_url() -> String {
    "https://push2his.eastmoney.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> String {
    "data".to_string()
}

// =============================================================================
// ProviderConfig
// =============================================================================

/// Market-data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Base URL of the Eastmoney kline API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Price adjustment requested from the provider.
    #[serde(default)]
    pub adjust: Adjust,

    /// Upper bound on a single fetch, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory holding `<symbol>.json` files for the `json_dir` source.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: default_base_url(),
            adjust: Adjust::default(),
            timeout_secs: default_timeout_secs(),
            data_dir: default_data_dir(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Offset of the reference time zone, in hours east of UTC. "Today" for a
    /// fetch is the current date in this zone (8 = Asia/Shanghai).
    #[serde(default = "default_utc_offset_hours")]
    pub reference_utc_offset_hours: i32,

    /// First date requested from the provider, `YYYYMMDD`.
    #[serde(default = "default_history_start")]
    pub history_start: String,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            reference_utc_offset_hours: default_utc_offset_hours(),
            history_start: default_history_start(),
            provider: ProviderConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config.history_start_date()?;

        info!(
            path = %path.display(),
            provider = %config.provider.kind,
            bind_addr = %config.bind_addr,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `TECHNICALS_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("TECHNICALS_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(kind) = std::env::var("TECHNICALS_PROVIDER") {
            self.provider.kind = kind.parse()?;
        }
        if let Ok(dir) = std::env::var("TECHNICALS_DATA_DIR") {
            self.provider.data_dir = dir;
        }
        Ok(())
    }

    pub fn history_start_date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.history_start, "%Y%m%d")
            .with_context(|| format!("invalid history_start: {}", self.history_start))
    }
}
