// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler through `Arc<AppState>`. Holds only service
// plumbing: the active configuration, the active bar source and a few
// counters. No computation result is ever stored here; every analysis is
// recomputed from the source.
//
// Thread safety:
//   - Atomic counters for lock-free bookkeeping.
//   - parking_lot::RwLock around the swappable config and source. Guards are
//     never held across an await point.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::info;

use crate::engine::reference_span;
use crate::market_data::{BarSource, EastmoneyClient, FetchSpan, JsonDirSource};
use crate::runtime_config::RuntimeConfig;
use crate::types::ProviderKind;

/// Build the bar source named by `config`.
pub fn build_source(config: &RuntimeConfig) -> Result<Arc<dyn BarSource>> {
    let source: Arc<dyn BarSource> = match config.provider.kind {
        ProviderKind::Eastmoney => Arc::new(EastmoneyClient::new(
            config.provider.base_url.clone(),
            config.provider.adjust,
            Duration::from_secs(config.provider.timeout_secs),
        )?),
        ProviderKind::JsonDir => {
            let source = JsonDirSource::new(&config.provider.data_dir);
            info!(dir = %source.dir().display(), "reading bars from directory");
            Arc::new(source)
        }
    };
    info!(source = source.name(), "bar source ready");
    Ok(source)
}

/// Config, source and parsed history start, swapped as one unit so a request
/// never pairs a new source with an old span.
pub struct ActiveConfig {
    pub config: RuntimeConfig,
    pub source: Arc<dyn BarSource>,
    pub history_start: NaiveDate,
}

impl ActiveConfig {
    pub fn new(config: RuntimeConfig, source: Arc<dyn BarSource>) -> Result<Self> {
        let history_start = config.history_start_date()?;
        Ok(Self {
            config,
            source,
            history_start,
        })
    }

    /// The fetch span for a request made at `now`.
    pub fn fetch_span(&self, now: DateTime<Utc>) -> FetchSpan {
        reference_span(self.history_start, now, self.config.reference_utc_offset_hours)
    }
}

pub struct AppState {
    active: RwLock<Arc<ActiveConfig>>,
    /// Where the runtime config was loaded from; re-read on reload.
    pub config_path: PathBuf,
    analyses_served: AtomicU64,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: impl Into<PathBuf>) -> Result<Self> {
        let source = build_source(&config)?;
        Self::with_source(config, config_path, source)
    }

    /// State around an already-built source.
    pub fn with_source(
        config: RuntimeConfig,
        config_path: impl Into<PathBuf>,
        source: Arc<dyn BarSource>,
    ) -> Result<Self> {
        Ok(Self {
            active: RwLock::new(Arc::new(ActiveConfig::new(config, source)?)),
            config_path: config_path.into(),
            analyses_served: AtomicU64::new(0),
            started_at: Utc::now(),
        })
    }

    /// A consistent snapshot of config, source and history start.
    pub fn active(&self) -> Arc<ActiveConfig> {
        self.active.read().clone()
    }

    pub fn source(&self) -> Arc<dyn BarSource> {
        self.active().source.clone()
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        self.active().config.clone()
    }

    pub fn fetch_span(&self, now: DateTime<Utc>) -> FetchSpan {
        self.active().fetch_span(now)
    }

    pub fn record_analysis(&self) -> u64 {
        self.analyses_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    /// Re-read the config file, rebuild the source and swap both in.
    ///
    /// On any error the running config and source are left untouched.
    pub fn reload(&self) -> Result<RuntimeConfig> {
        let mut config = RuntimeConfig::load(&self.config_path)?;
        config.apply_env_overrides()?;
        let source = build_source(&config)?;
        let active = ActiveConfig::new(config.clone(), source)?;

        *self.active.write() = Arc::new(active);
        info!(path = %self.config_path.display(), "runtime config reloaded");
        Ok(config)
    }
}
