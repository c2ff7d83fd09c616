// =============================================================================
// Log returns and annualised volatility
// =============================================================================
//
//   r_t   = ln(close_t / close_{t-1})           (undefined on the first day)
//   vol_t = stdev_sample(r_{t-19..=t}) * sqrt(252), rounded to 2 dp
//
// Volatility needs 20 defined returns, so the first value appears on the 21st
// bar.
// =============================================================================

use super::rolling::{finite, rolling_std, round2};

pub const VOLATILITY_WINDOW: usize = 20;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Day-over-day log returns. Index 0 is `NaN`; so is any day whose ratio is
/// not positive and finite.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(closes.windows(2).map(|w| {
        let ratio = w[1] / w[0];
        if ratio > 0.0 && ratio.is_finite() {
            ratio.ln()
        } else {
            f64::NAN
        }
    }));
    out
}

/// Rolling annualised volatility of `returns`.
pub fn annualized_volatility(returns: &[f64]) -> Vec<Option<f64>> {
    let scale = TRADING_DAYS_PER_YEAR.sqrt();
    rolling_std(returns, VOLATILITY_WINDOW)
        .into_iter()
        .map(|sd| sd.and_then(|s| finite(round2(s * scale))))
        .collect()
}
