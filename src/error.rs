// =============================================================================
// Engine errors and the structured error payload
// =============================================================================
//
// The engine knows exactly two failure kinds. Neither is fatal: at the
// outermost boundary both are turned into an `ErrorPayload` value that the
// caller receives instead of a report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The market-data source returned nothing usable for the requested span.
    /// Dates are `YYYYMMDD`.
    #[error("未能获取 {symbol} 在 {start} 到 {end} 之间的历史数据。")]
    NoData {
        symbol: String,
        start: String,
        end: String,
    },

    /// Unexpected failure while deriving indicators, events or the window.
    #[error("An exception occurred during calculation: {0}")]
    Computation(String),
}

impl EngineError {
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload::new(self.to_string())
    }
}

/// `{"status": "error", "error_message": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: String,
    pub error_message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error_message: message.into(),
        }
    }
}

impl From<EngineError> for ErrorPayload {
    fn from(err: EngineError) -> Self {
        err.to_payload()
    }
}
