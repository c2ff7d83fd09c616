// =============================================================================
// Technical Indicator & Event Detection Engine
// =============================================================================
//
// Four stages, strictly forward:
//
//   1. Ingestion & normalization : market_data::normalize
//   2. Indicator computation     : indicators
//   3. Event detection           : events
//   4. Windowing & serialization : report
//
// Every invocation recomputes from the raw series; nothing is kept between
// calls. At the outer boundary (`analyze`) every failure becomes an
// `ErrorPayload` value, and a panic inside the pure stages is trapped and
// reported as a computation error.
// =============================================================================

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{EngineError, ErrorPayload};
use crate::events::{detect_events, EventFlags};
use crate::indicators::{compute_indicators, IndicatorSet};
use crate::market_data::{normalize_bars, BarSource, FetchSpan};
use crate::report::{build_report, TechnicalReport};
use crate::types::DailyBar;

/// Either a full report or an error payload, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TechnicalOutcome {
    Report(TechnicalReport),
    Error(ErrorPayload),
}

impl TechnicalOutcome {
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }
}

impl From<Result<TechnicalReport, EngineError>> for TechnicalOutcome {
    fn from(result: Result<TechnicalReport, EngineError>) -> Self {
        match result {
            Ok(report) => Self::Report(report),
            Err(err) => Self::Error(err.to_payload()),
        }
    }
}

/// Today's date in the fixed reference offset (hours east of UTC).
pub fn reference_date(now: DateTime<Utc>, utc_offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).date_naive()
}

/// Fetch span from `history_start` up to today in the reference offset.
pub fn reference_span(history_start: NaiveDate, now: DateTime<Utc>, utc_offset_hours: i32) -> FetchSpan {
    FetchSpan {
        start: history_start,
        end: reference_date(now, utc_offset_hours),
    }
}

/// Stages 2 and 3 over a normalized series.
pub fn compute_series(bars: &[DailyBar]) -> (Vec<IndicatorSet>, Vec<EventFlags>) {
    let indicators = compute_indicators(bars);
    let events = detect_events(bars, &indicators);
    (indicators, events)
}

thread_local! {
    static TRAPPING_PANICS: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a panic hook that sends panics raised inside [`trap_panics`] to
/// `tracing` instead of stderr. Panics anywhere else reach the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if TRAPPING_PANICS.with(Cell::get) {
                error!(panic = %info, "computation panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into [`EngineError::Computation`].
fn trap_panics<T>(f: impl FnOnce() -> Result<T, EngineError>) -> Result<T, EngineError> {
    install_panic_hook();
    let was_trapping = TRAPPING_PANICS.with(|t| t.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    TRAPPING_PANICS.with(|t| t.set(was_trapping));

    result.unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(EngineError::Computation(msg))
    })
}

/// Stages 2–4 over a normalized, non-empty series.
pub fn run_pipeline(bars: Vec<DailyBar>) -> Result<TechnicalReport, EngineError> {
    trap_panics(move || {
        let (indicators, events) = compute_series(&bars);
        build_report(bars, indicators, events)
    })
}

/// Stages 1–4 over whatever the source returned.
pub fn compute_report(
    symbol: &str,
    span: FetchSpan,
    raw: Vec<DailyBar>,
) -> Result<TechnicalReport, EngineError> {
    let bars = normalize_bars(symbol, span, raw)?;
    debug!(symbol, bars = bars.len(), "series normalized");
    run_pipeline(bars)
}

/// Fetch history for `symbol` and run the full pipeline.
///
/// Never fails: an empty result is reported as `NoData`; a fetch or
/// derivation failure as `Computation` carrying its cause. Both come back as
/// an error payload.
pub async fn analyze(source: &dyn BarSource, symbol: &str, span: FetchSpan) -> TechnicalOutcome {
    let result = match source.fetch_daily(symbol, span).await {
        Ok(raw) => {
            debug!(symbol, source = source.name(), bars = raw.len(), "bars received");
            compute_report(symbol, span, raw)
        }
        Err(e) => Err(EngineError::Computation(format!("{e:#}"))),
    };

    match &result {
        Ok(report) => info!(
            symbol,
            source = source.name(),
            days = report.len(),
            "technical report computed"
        ),
        Err(e) => warn!(symbol, source = source.name(), error = %e, "technical report failed"),
    }
    result.into()
}
