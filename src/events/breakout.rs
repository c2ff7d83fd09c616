// =============================================================================
// Moving-average and Bollinger band crossings
// =============================================================================
//
// Breakout:  prior close strictly below the prior line, current close at or
//            above the current line.
// Breakdown: prior close strictly above the prior line, current close at or
//            below the current line.
//
// Both the prior and the current value of the line must be defined. Every
// moving-average window is evaluated on its own, so several can trigger on
// the same day.

use serde::Serialize;

use crate::indicators::bollinger::BollingerBand;
use crate::indicators::sma::{ma_name, MA_WINDOWS};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Crossings {
    /// Names of the moving averages broken out above, shortest window first.
    #[serde(rename = "突破均线")]
    pub ma_breakouts: Vec<String>,
    #[serde(rename = "跌破均线")]
    pub ma_breakdowns: Vec<String>,
    #[serde(rename = "突破布林带上轨")]
    pub bollinger_breakout: bool,
    #[serde(rename = "跌破布林带下轨")]
    pub bollinger_breakdown: bool,
}

/// One endpoint of a crossing: a close and the line it is compared with.
#[derive(Debug, Clone, Copy)]
pub struct LinePoint {
    pub close: f64,
    pub line: Option<f64>,
}

pub fn crosses_above(prev: LinePoint, curr: LinePoint) -> bool {
    match (prev.line, curr.line) {
        (Some(pl), Some(cl)) => prev.close < pl && curr.close >= cl,
        _ => false,
    }
}

pub fn crosses_below(prev: LinePoint, curr: LinePoint) -> bool {
    match (prev.line, curr.line) {
        (Some(pl), Some(cl)) => prev.close > pl && curr.close <= cl,
        _ => false,
    }
}

/// Crossings for every day.
///
/// `moving_averages[i]` holds day i's values in [`MA_WINDOWS`] order.
pub fn detect_crossings(
    closes: &[f64],
    moving_averages: &[[Option<f64>; MA_WINDOWS.len()]],
    bands: &[Option<BollingerBand>],
) -> Vec<Crossings> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(Crossings::default());

    for i in 1..closes.len() {
        let mut day = Crossings::default();

        for (k, &window) in MA_WINDOWS.iter().enumerate() {
            let prev = LinePoint { close: closes[i - 1], line: moving_averages[i - 1][k] };
            let curr = LinePoint { close: closes[i], line: moving_averages[i][k] };
            if crosses_above(prev, curr) {
                day.ma_breakouts.push(ma_name(window));
            }
            if crosses_below(prev, curr) {
                day.ma_breakdowns.push(ma_name(window));
            }
        }

        day.bollinger_breakout = crosses_above(
            LinePoint { close: closes[i - 1], line: bands[i - 1].map(|b| b.upper) },
            LinePoint { close: closes[i], line: bands[i].map(|b| b.upper) },
        );
        day.bollinger_breakdown = crosses_below(
            LinePoint { close: closes[i - 1], line: bands[i - 1].map(|b| b.lower) },
            LinePoint { close: closes[i], line: bands[i].map(|b| b.lower) },
        );

        out.push(day);
    }
    out
}
