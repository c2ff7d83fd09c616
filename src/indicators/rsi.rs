// =============================================================================
// Relative Strength Index (RSI): simple rolling averages, reported lagged
// =============================================================================
//
// Step 1: Deltas from consecutive closes. The first day has no delta and
//          contributes a zero gain and a zero loss to the averages.
// Step 2: avg_gain / avg_loss = simple mean of the last `period` gains /
//          losses (not Wilder's exponential smoothing).
// Step 3: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
// Step 4: Shift the series one day forward: the value reported on day t is
//          the RSI computed through day t-1. Then round to 2 dp.
//
// The lag moves every threshold crossing one day later, and downstream
// narratives depend on which day that is.
// =============================================================================

use super::rolling::{rolling_mean, round2};

pub const RSI_PERIOD: usize = 14;

/// RSI computed through each day, unshifted and unrounded.
///
/// # Edge cases
/// - `period == 0` or too little history => `None`
/// - average loss zero with a positive average gain => 100.0
/// - both averages zero (no movement in the window) => `None`
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    if !closes.is_empty() {
        gains.push(0.0);
        losses.push(0.0);
    }
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| rsi_from_averages(g?, l?))
        .collect()
}

/// The reported RSI series: [`rolling_rsi`] shifted one day later and rounded.
pub fn lagged_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let raw = rolling_rsi(closes, period);
    let mut out = Vec::with_capacity(raw.len());
    if raw.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(raw[..raw.len() - 1].iter().map(|v| v.map(round2)));
    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        return None; // No movement at all.
    }

    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}
