// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator computations over a date-ascending daily
// series. Every series function returns one entry per input day, `None` while
// history is insufficient, and only ever looks at the current and preceding
// days.

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod returns;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod volume;

use serde::Serialize;

use crate::types::DailyBar;

use self::bollinger::{calculate_bollinger, BOLLINGER_NUM_STD, BOLLINGER_PERIOD};
use self::kdj::{calculate_kdj, calculate_rsv, RSV_PERIOD};
use self::macd::calculate_macd;
use self::returns::{annualized_volatility, log_returns};
use self::rolling::finite;
use self::rsi::{lagged_rsi, RSI_PERIOD};
use self::sma::{moving_averages, MA_WINDOWS};
use self::volume::volume_amplification;

/// Every derived indicator for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub log_return: Option<f64>,
    pub volatility: Option<f64>,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD_diff")]
    pub macd_diff: Option<f64>,
    #[serde(rename = "MACD_signal")]
    pub macd_signal: Option<f64>,
    #[serde(rename = "MACD_hist")]
    pub macd_hist: Option<f64>,
    #[serde(rename = "BB_mid")]
    pub bb_mid: Option<f64>,
    #[serde(rename = "BB_upper")]
    pub bb_upper: Option<f64>,
    #[serde(rename = "BB_lower")]
    pub bb_lower: Option<f64>,
    #[serde(rename = "RSV")]
    pub rsv: Option<f64>,
    #[serde(rename = "K")]
    pub k: Option<f64>,
    #[serde(rename = "D")]
    pub d: Option<f64>,
    #[serde(rename = "J")]
    pub j: Option<f64>,
    pub vol_ma20: Option<f64>,
    pub volume_amplification: Option<f64>,
    #[serde(rename = "MA5")]
    pub ma5: Option<f64>,
    #[serde(rename = "MA10")]
    pub ma10: Option<f64>,
    #[serde(rename = "MA20")]
    pub ma20: Option<f64>,
    #[serde(rename = "MA30")]
    pub ma30: Option<f64>,
    #[serde(rename = "MA60")]
    pub ma60: Option<f64>,
    #[serde(rename = "MA120")]
    pub ma120: Option<f64>,
    #[serde(rename = "MA250")]
    pub ma250: Option<f64>,
}

impl IndicatorSet {
    /// Moving averages in [`MA_WINDOWS`] order.
    pub fn moving_averages(&self) -> [Option<f64>; MA_WINDOWS.len()] {
        [
            self.ma5, self.ma10, self.ma20, self.ma30, self.ma60, self.ma120, self.ma250,
        ]
    }

    fn set_moving_averages(&mut self, values: [Option<f64>; MA_WINDOWS.len()]) {
        let [ma5, ma10, ma20, ma30, ma60, ma120, ma250] = values;
        self.ma5 = ma5;
        self.ma10 = ma10;
        self.ma20 = ma20;
        self.ma30 = ma30;
        self.ma60 = ma60;
        self.ma120 = ma120;
        self.ma250 = ma250;
    }
}

/// Compute the full indicator set for every bar of a date-ascending series.
pub fn compute_indicators(bars: &[DailyBar]) -> Vec<IndicatorSet> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let returns = log_returns(&closes);
    let volatility = annualized_volatility(&returns);
    let rsi = lagged_rsi(&closes, RSI_PERIOD);
    let macd = calculate_macd(&closes);
    let bands = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD);
    let rsv = calculate_rsv(&highs, &lows, &closes, RSV_PERIOD);
    let kdj = calculate_kdj(&rsv);
    let volume = volume_amplification(&volumes);
    let mas = moving_averages(&closes);

    (0..bars.len())
        .map(|i| {
            let mut set = IndicatorSet {
                log_return: finite(returns[i]),
                volatility: volatility[i],
                rsi: rsi[i],
                macd_diff: macd[i].map(|m| m.diff),
                macd_signal: macd[i].map(|m| m.signal),
                macd_hist: macd[i].map(|m| m.hist),
                bb_mid: bands[i].map(|b| b.middle),
                bb_upper: bands[i].map(|b| b.upper),
                bb_lower: bands[i].map(|b| b.lower),
                rsv: rsv[i],
                k: kdj[i].map(|x| x.k),
                d: kdj[i].map(|x| x.d),
                j: kdj[i].map(|x| x.j),
                vol_ma20: volume[i].0,
                volume_amplification: volume[i].1,
                ..IndicatorSet::default()
            };
            set.set_moving_averages(mas[i]);
            set
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::bars_with_closes;
    use super::*;

    fn wavy(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 10.0 * ((i as f64) / 7.0).sin() + (i % 4) as f64 * 0.3)
            .collect()
    }

    #[test]
    fn one_set_per_bar() {
        let bars = bars_with_closes(&wavy(300));
        assert_eq!(compute_indicators(&bars).len(), 300);
        assert!(compute_indicators(&[]).is_empty());
    }

    #[test]
    fn warm_up_boundaries() {
        let bars = bars_with_closes(&wavy(300));
        let sets = compute_indicators(&bars);
        assert!(sets[0].log_return.is_none());
        assert!(sets[1].log_return.is_some());
        assert!(sets[19].volatility.is_none());
        assert!(sets[20].volatility.is_some());
        assert!(sets[18].bb_upper.is_none());
        assert!(sets[19].bb_upper.is_some());
        assert!(sets[7].k.is_none());
        assert_eq!(sets[8].k, Some(50.0));
        assert_eq!(sets[8].d, Some(50.0));
        assert!(sets[248].ma250.is_none());
        assert!(sets[249].ma250.is_some());
        assert!(sets[0].macd_diff.is_some());
    }

    #[test]
    fn invariants_hold_for_every_day() {
        let bars = bars_with_closes(&wavy(300));
        for set in compute_indicators(&bars) {
            if let Some(rsi) = set.rsi {
                assert!((0.0..=100.0).contains(&rsi));
            }
            if let (Some(u), Some(m), Some(l)) = (set.bb_upper, set.bb_mid, set.bb_lower) {
                assert!(u >= m && m >= l);
            }
        }
    }

    #[test]
    fn no_look_ahead() {
        let closes = wavy(120);
        let full = compute_indicators(&bars_with_closes(&closes));
        let prefix = compute_indicators(&bars_with_closes(&closes[..80]));
        assert_eq!(&full[..80], &prefix[..]);
    }

    #[test]
    fn moving_average_accessor_order() {
        let bars = bars_with_closes(&wavy(300));
        let set = &compute_indicators(&bars)[299];
        let mas = set.moving_averages();
        assert_eq!(mas[0], set.ma5);
        assert_eq!(mas[6], set.ma250);
    }

    #[test]
    fn serialised_names() {
        let bars = bars_with_closes(&wavy(30));
        let json = serde_json::to_value(&compute_indicators(&bars)[29]).unwrap();
        for key in ["RSI", "MACD_diff", "MACD_hist", "BB_upper", "K", "J", "MA5", "MA250", "volume_amplification"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["MA250"].is_null());
    }
}
