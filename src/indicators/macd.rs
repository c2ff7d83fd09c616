// =============================================================================
// MACD (12 / 26 / 9)
// =============================================================================
//
//   diff   = EMA12(close) - EMA26(close)
//   signal = EMA9(diff)
//   hist   = diff - signal
//
// The three outputs are rounded independently; the histogram is taken from
// the unrounded diff and signal.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;
use super::rolling::{finite, round2};

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub diff: f64,
    pub signal: f64,
    pub hist: f64,
}

/// One point per close. Days where the EMAs are not finite yield `None`.
pub fn calculate_macd(closes: &[f64]) -> Vec<Option<MacdPoint>> {
    let fast = calculate_ema(closes, MACD_FAST);
    let slow = calculate_ema(closes, MACD_SLOW);
    let diff: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&diff, MACD_SIGNAL);

    diff.iter()
        .zip(&signal)
        .map(|(&d, &s)| {
            let hist = finite(d - s)?;
            Some(MacdPoint {
                diff: round2(d),
                signal: round2(s),
                hist: round2(hist),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_defined_from_first_day() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let macd = calculate_macd(&closes);
        assert_eq!(macd.len(), 40);
        assert_eq!(macd[0], Some(MacdPoint { diff: 0.0, signal: 0.0, hist: 0.0 }));
    }

    #[test]
    fn rising_series_has_positive_diff() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let last = calculate_macd(&closes)[59].unwrap();
        assert!(last.diff > 0.0);
        assert!(last.signal > 0.0);
    }

    #[test]
    fn hist_rounded_from_unrounded_parts() {
        let closes = [10.0, 10.5, 9.8, 11.2, 12.9, 12.1, 13.4, 12.7, 14.3, 15.0];
        let fast = calculate_ema(&closes, MACD_FAST);
        let slow = calculate_ema(&closes, MACD_SLOW);
        let diff: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = calculate_ema(&diff, MACD_SIGNAL);

        let macd = calculate_macd(&closes);
        for i in 0..closes.len() {
            let p = macd[i].unwrap();
            assert_eq!(p.hist, round2(diff[i] - signal[i]));
            assert_eq!(p.diff, round2(diff[i]));
            assert_eq!(p.signal, round2(signal[i]));
        }
    }

    #[test]
    fn empty_input() {
        assert!(calculate_macd(&[]).is_empty());
    }
}
