// =============================================================================
// technical-events: daily technical indicators and event signals
// =============================================================================
//
// Turns a security's raw daily OHLCV history into a per-day indicator record
// plus a trailing window of flagged events (new highs/lows, streaks,
// breakouts, price-volume co-movement), keyed by date.
//
//   let outcome = engine::analyze(source.as_ref(), "600519", span).await;
//
// The pure computation lives in `indicators`, `events` and `report`; `engine`
// wires them together behind a boundary that always returns a value.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod engine;
pub mod error;
pub mod events;
pub mod indicators;
pub mod market_data;
pub mod report;
pub mod runtime_config;
pub mod types;

pub use engine::{analyze, compute_report, run_pipeline, TechnicalOutcome};
pub use error::{EngineError, ErrorPayload};
pub use report::{DayRecord, TechnicalReport};
pub use types::DailyBar;
