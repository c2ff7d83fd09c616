// =============================================================================
// New highs / new lows
// =============================================================================
//
// A day is a new high for a horizon when its close is >= the maximum close of
// the trailing window that ends on (and includes) that day; ties count. The
// all-time horizon uses the running maximum/minimum since the first bar. A
// window that is not yet full never flags.

use serde::Serialize;

use crate::indicators::rolling::{rolling_max, rolling_min};

pub const MONTH_WINDOW: usize = 20;
pub const HALF_YEAR_WINDOW: usize = 126;
pub const YEAR_WINDOW: usize = 252;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Extremes {
    #[serde(rename = "创月新高")]
    pub month_high: bool,
    #[serde(rename = "创月新低")]
    pub month_low: bool,
    #[serde(rename = "半年新高")]
    pub half_year_high: bool,
    #[serde(rename = "半年新低")]
    pub half_year_low: bool,
    #[serde(rename = "一年新高")]
    pub year_high: bool,
    #[serde(rename = "一年新低")]
    pub year_low: bool,
    #[serde(rename = "历史新高")]
    pub all_time_high: bool,
    #[serde(rename = "历史新低")]
    pub all_time_low: bool,
}

fn at_or_above(close: f64, bound: Option<f64>) -> bool {
    bound.is_some_and(|b| close >= b)
}

fn at_or_below(close: f64, bound: Option<f64>) -> bool {
    bound.is_some_and(|b| close <= b)
}

pub fn detect_extremes(closes: &[f64]) -> Vec<Extremes> {
    let max20 = rolling_max(closes, MONTH_WINDOW);
    let min20 = rolling_min(closes, MONTH_WINDOW);
    let max126 = rolling_max(closes, HALF_YEAR_WINDOW);
    let min126 = rolling_min(closes, HALF_YEAR_WINDOW);
    let max252 = rolling_max(closes, YEAR_WINDOW);
    let min252 = rolling_min(closes, YEAR_WINDOW);

    let mut running_max = f64::NEG_INFINITY;
    let mut running_min = f64::INFINITY;

    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            if close.is_finite() {
                running_max = running_max.max(close);
                running_min = running_min.min(close);
            }
            Extremes {
                month_high: at_or_above(close, max20[i]),
                month_low: at_or_below(close, min20[i]),
                half_year_high: at_or_above(close, max126[i]),
                half_year_low: at_or_below(close, min126[i]),
                year_high: at_or_above(close, max252[i]),
                year_low: at_or_below(close, min252[i]),
                all_time_high: close.is_finite() && close >= running_max,
                all_time_low: close.is_finite() && close <= running_min,
            }
        })
        .collect()
}
