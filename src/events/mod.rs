// =============================================================================
// Event Detection Module
// =============================================================================
//
// Discrete per-day signals derived from the bar series and its indicators:
// new highs/lows, streaks, and line crossings. Everything here is a single
// forward pass over the date-ascending series carrying small running state.

pub mod breakout;
pub mod extremes;
pub mod streaks;

use serde::{Serialize, Serializer};

use crate::indicators::bollinger::BollingerBand;
use crate::indicators::IndicatorSet;
use crate::types::DailyBar;

use self::breakout::{detect_crossings, Crossings};
use self::extremes::{detect_extremes, Extremes};
use self::streaks::{co_movement_streaks, price_streaks, volume_streaks};
pub use self::streaks::{CoMovementStreaks, PriceStreaks, VolumeStreaks};

/// All event flags for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventFlags {
    #[serde(flatten)]
    pub extremes: Extremes,
    #[serde(flatten)]
    pub price: PriceStreaks,
    #[serde(flatten)]
    pub volume: VolumeStreaks,
    #[serde(flatten)]
    pub co_movement: CoMovementStreaks,
    #[serde(flatten)]
    pub crossings: Crossings,
}

/// Serialize a percentage magnitude as `"12.34%"`.
pub(crate) fn pct_string<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:.2}%"))
}

/// Derive the event flags for every bar. `indicators` must be the output of
/// [`crate::indicators::compute_indicators`] for the same bars.
pub fn detect_events(bars: &[DailyBar], indicators: &[IndicatorSet]) -> Vec<EventFlags> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let mas: Vec<_> = indicators.iter().map(IndicatorSet::moving_averages).collect();
    let bands: Vec<Option<BollingerBand>> = indicators
        .iter()
        .map(|s| match (s.bb_upper, s.bb_mid, s.bb_lower) {
            (Some(upper), Some(middle), Some(lower)) => Some(BollingerBand { upper, middle, lower }),
            _ => None,
        })
        .collect();

    let extremes = detect_extremes(&closes);
    let price = price_streaks(&closes);
    let volume = volume_streaks(&volumes);
    let co_movement = co_movement_streaks(bars);
    let crossings = detect_crossings(&closes, &mas, &bands);

    extremes
        .into_iter()
        .zip(price)
        .zip(volume)
        .zip(co_movement)
        .zip(crossings)
        .map(|((((extremes, price), volume), co_movement), crossings)| EventFlags {
            extremes,
            price,
            volume,
            co_movement,
            crossings,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::compute_indicators;
    use crate::indicators::test_support::{bars_from, bars_with_closes};

    #[test]
    fn one_flag_set_per_bar() {
        let bars = bars_with_closes(&[1.0, 2.0, 3.0]);
        let events = detect_events(&bars, &compute_indicators(&bars));
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].price.up_days, 2);
    }

    #[test]
    fn serialised_with_original_names_and_pct_strings() {
        let bars = bars_from(&[10.0, 11.0, 12.1], &[100.0, 120.0, 150.0]);
        let events = detect_events(&bars, &compute_indicators(&bars));
        let json = serde_json::to_value(&events[2]).unwrap();
        assert_eq!(json["连续上涨天数"], 2);
        assert_eq!(json["连续上涨涨幅"], "21.00%");
        assert_eq!(json["连续下跌跌幅"], "0.00%");
        assert_eq!(json["量价齐升天数"], 2);
        assert_eq!(json["量价齐升期间换手率"], "3.00%");
        assert_eq!(json["持续放量天数"], 2);
        assert_eq!(json["历史新高"], true);
        assert_eq!(json["创月新高"], false);
        assert_eq!(json["突破均线"], serde_json::json!([]));
        assert_eq!(json["突破布林带上轨"], false);
    }

    #[test]
    fn pct_string_formats_two_decimals() {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::new(&mut buf);
        pct_string(&3.14159, &mut ser).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"3.14%\"");
    }
}
