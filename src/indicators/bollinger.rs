// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = 20-day SMA of close, upper/lower = middle ± 2 × 20-day sample
// standard deviation. All three are rounded to 2 dp, which keeps
// upper >= middle >= lower on the reported values.
//
// Breakout detection compares closes against these rounded bands.

use serde::Serialize;

use super::rolling::{rolling_mean, rolling_std, round2};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;

/// Result of a Bollinger Band calculation for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute the band for every day of `closes`.
///
/// A day yields `None` while fewer than `period` closes are available.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerBand>> {
    let mid = rolling_mean(closes, period);
    let sd = rolling_std(closes, period);

    mid.into_iter()
        .zip(sd)
        .map(|(m, s)| {
            let (m, s) = (m?, s?);
            let band = BollingerBand {
                upper: round2(m + num_std * s),
                middle: round2(m),
                lower: round2(m - num_std * s),
            };
            (band.upper.is_finite() && band.lower.is_finite()).then_some(band)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bands = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD);
        let bb = bands[19].unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert_eq!(bb.middle, 10.5);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)[19].unwrap();
        assert_eq!(bb.upper, 100.0);
        assert_eq!(bb.lower, 100.0);
    }

    #[test]
    fn bands_are_ordered() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 50.0 + ((i * 37) % 11) as f64 * 0.731 - (i % 5) as f64)
            .collect();
        for bb in calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)
            .into_iter()
            .flatten()
        {
            assert!(bb.upper >= bb.middle && bb.middle >= bb.lower, "{bb:?}");
        }
    }

    #[test]
    fn uses_sample_deviation() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)[19].unwrap();
        // sample sd of 1..=20 = sqrt(35)
        let expected_upper = round2(10.5 + 2.0 * 35.0_f64.sqrt());
        assert_eq!(bb.upper, expected_upper);
    }
}
