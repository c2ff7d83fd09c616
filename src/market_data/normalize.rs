// =============================================================================
// Ingestion & normalization
// =============================================================================
//
// Turns whatever order the provider returned into a date-ascending series with
// one bar per date. Schema trust is placed in the provider: no other field is
// validated here.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EngineError;
use crate::types::DailyBar;

/// The span a fetch covered, used to describe an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchSpan {
    pub fn no_data(&self, symbol: &str) -> EngineError {
        EngineError::NoData {
            symbol: symbol.to_string(),
            start: self.start.format("%Y%m%d").to_string(),
            end: self.end.format("%Y%m%d").to_string(),
        }
    }
}

/// Sort by date ascending and drop duplicate dates, keeping the occurrence
/// that came last in provider order.
///
/// An empty input is a `NoData` error.
pub fn normalize_bars(
    symbol: &str,
    span: FetchSpan,
    mut bars: Vec<DailyBar>,
) -> Result<Vec<DailyBar>, EngineError> {
    if bars.is_empty() {
        return Err(span.no_data(symbol));
    }

    let received = bars.len();
    // Stable sort keeps provider order within a date.
    bars.sort_by_key(|b| b.date);

    let mut out: Vec<DailyBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }

    if out.len() != received {
        debug!(symbol, received, kept = out.len(), "dropped duplicate dates");
    }
    Ok(out)
}
