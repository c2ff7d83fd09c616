// =============================================================================
// JSON directory source
// =============================================================================
//
// Reads `<data_dir>/<symbol>.json`: an array of bars using the provider's
// column names. Used for offline runs and for replaying captured history. A
// missing file is an empty result, not an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use super::normalize::FetchSpan;
use super::BarSource;
use crate::types::DailyBar;

pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str) -> Result<PathBuf> {
        let valid = !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
            && !symbol.starts_with('.');
        if !valid {
            anyhow::bail!("invalid symbol for file lookup: {symbol:?}");
        }
        Ok(self.dir.join(format!("{symbol}.json")))
    }

    pub async fn load(&self, symbol: &str, span: FetchSpan) -> Result<Vec<DailyBar>> {
        let path = self.path_for(symbol)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no bar file for symbol");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read bars from {}", path.display()))
            }
        };

        let bars: Vec<DailyBar> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse bars from {}", path.display()))?;

        let bars: Vec<DailyBar> = bars
            .into_iter()
            .filter(|b| b.date >= span.start && b.date <= span.end)
            .collect();

        debug!(path = %path.display(), bars = bars.len(), "bars loaded from file");
        Ok(bars)
    }
}

impl BarSource for JsonDirSource {
    fn name(&self) -> &'static str {
        "json_dir"
    }

    fn fetch_daily<'a>(&'a self, symbol: &'a str, span: FetchSpan) -> BoxFuture<'a, Result<Vec<DailyBar>>> {
        self.load(symbol, span).boxed()
    }
}
