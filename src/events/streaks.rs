// =============================================================================
// Streak tracking
// =============================================================================
//
// A streak is a run of consecutive days on which a strict day-over-day
// condition holds. Its length resets to zero on the first day the condition
// fails. The anchor of a streak of length n ending on day t is day t - n: the
// day immediately before the first streak day. Magnitudes are measured from
// the anchor close to the current close.
//
//   rise magnitude = close_t / close_anchor * 100 - 100
//   fall magnitude = (1 - close_t / close_anchor) * 100
//
// Co-movement streaks also sum the turnover rate over anchor..=t.
// =============================================================================

use serde::Serialize;

use super::pct_string;
use crate::types::DailyBar;

/// Run-length counter for one strict condition.
#[derive(Debug, Clone, Copy, Default)]
struct RunCounter {
    len: u32,
}

impl RunCounter {
    fn advance(&mut self, holds: bool) -> u32 {
        self.len = if holds { self.len + 1 } else { 0 };
        self.len
    }
}

fn rise_pct(close: f64, anchor: f64) -> f64 {
    close / anchor * 100.0 - 100.0
}

fn fall_pct(close: f64, anchor: f64) -> f64 {
    (1.0 - close / anchor) * 100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStreaks {
    #[serde(rename = "连续上涨天数")]
    pub up_days: u32,
    #[serde(rename = "连续上涨涨幅", serialize_with = "pct_string")]
    pub up_pct: f64,
    #[serde(rename = "连续下跌天数")]
    pub down_days: u32,
    #[serde(rename = "连续下跌跌幅", serialize_with = "pct_string")]
    pub down_pct: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VolumeStreaks {
    #[serde(rename = "持续放量天数")]
    pub up_days: u32,
    #[serde(rename = "持续缩量天数")]
    pub down_days: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CoMovementStreaks {
    #[serde(rename = "量价齐升天数")]
    pub rise_days: u32,
    #[serde(rename = "量价齐升期间涨幅", serialize_with = "pct_string")]
    pub rise_pct: f64,
    #[serde(rename = "量价齐升期间换手率", serialize_with = "pct_string")]
    pub rise_turnover_pct: f64,
    #[serde(rename = "量价齐跌天数")]
    pub fall_days: u32,
    #[serde(rename = "量价齐跌期间跌幅", serialize_with = "pct_string")]
    pub fall_pct: f64,
    #[serde(rename = "量价齐跌期间换手率", serialize_with = "pct_string")]
    pub fall_turnover_pct: f64,
}

/// Up/down close streaks with their cumulative move since the anchor.
pub fn price_streaks(closes: &[f64]) -> Vec<PriceStreaks> {
    let mut up = RunCounter::default();
    let mut down = RunCounter::default();
    let mut out = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            out.push(PriceStreaks::default());
            continue;
        }
        let prev = closes[i - 1];
        let mut day = PriceStreaks::default();

        day.up_days = up.advance(close > prev);
        if day.up_days > 0 {
            day.up_pct = rise_pct(close, closes[i - day.up_days as usize]);
        }
        day.down_days = down.advance(close < prev);
        if day.down_days > 0 {
            day.down_pct = fall_pct(close, closes[i - day.down_days as usize]);
        }
        out.push(day);
    }
    out
}

/// Strictly increasing / strictly decreasing volume run lengths.
pub fn volume_streaks(volumes: &[f64]) -> Vec<VolumeStreaks> {
    let mut up = RunCounter::default();
    let mut down = RunCounter::default();

    volumes
        .iter()
        .enumerate()
        .map(|(i, &v)| match i.checked_sub(1).map(|p| volumes[p]) {
            None => VolumeStreaks::default(),
            Some(prev) => VolumeStreaks {
                up_days: up.advance(v > prev),
                down_days: down.advance(v < prev),
            },
        })
        .collect()
}

/// Price and volume moving together, both up or both down.
pub fn co_movement_streaks(bars: &[DailyBar]) -> Vec<CoMovementStreaks> {
    let mut rise = RunCounter::default();
    let mut fall = RunCounter::default();
    let mut rise_turnover = 0.0;
    let mut fall_turnover = 0.0;
    let mut out = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let Some(prev) = i.checked_sub(1).map(|p| &bars[p]) else {
            out.push(CoMovementStreaks::default());
            continue;
        };
        let mut day = CoMovementStreaks::default();

        day.rise_days = rise.advance(bar.close > prev.close && bar.volume > prev.volume);
        if day.rise_days > 0 {
            // A new run starts its turnover sum at the anchor day.
            if day.rise_days == 1 {
                rise_turnover = prev.turnover_rate_pct;
            }
            rise_turnover += bar.turnover_rate_pct;
            let anchor = &bars[i - day.rise_days as usize];
            day.rise_pct = rise_pct(bar.close, anchor.close);
            day.rise_turnover_pct = rise_turnover;
        }

        day.fall_days = fall.advance(bar.close < prev.close && bar.volume < prev.volume);
        if day.fall_days > 0 {
            if day.fall_days == 1 {
                fall_turnover = prev.turnover_rate_pct;
            }
            fall_turnover += bar.turnover_rate_pct;
            let anchor = &bars[i - day.fall_days as usize];
            day.fall_pct = fall_pct(bar.close, anchor.close);
            day.fall_turnover_pct = fall_turnover;
        }
        out.push(day);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from;

    #[test]
    fn up_streak_resets_on_break() {
        let s = price_streaks(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        let lens: Vec<u32> = s.iter().map(|d| d.up_days).collect();
        assert_eq!(lens, vec![0, 1, 2, 0, 1]);
        assert!((s[2].up_pct - (12.0 / 10.0 - 1.0) * 100.0).abs() < 1e-10);
        assert_eq!(s[3].up_pct, 0.0);
        // One-day streak magnitude is the single day's return.
        assert!((s[4].up_pct - (13.0 / 11.0 * 100.0 - 100.0)).abs() < 1e-10);
    }

    #[test]
    fn down_streak_magnitude_is_positive() {
        let s = price_streaks(&[20.0, 18.0, 15.0, 15.0]);
        assert_eq!(s[2].down_days, 2);
        assert!((s[2].down_pct - 25.0).abs() < 1e-10);
        // Flat day breaks both streaks.
        assert_eq!(s[3].down_days, 0);
        assert_eq!(s[3].up_days, 0);
    }

    #[test]
    fn volume_streaks_are_independent() {
        let v = volume_streaks(&[100.0, 120.0, 130.0, 90.0, 80.0, 80.0]);
        let ups: Vec<u32> = v.iter().map(|d| d.up_days).collect();
        let downs: Vec<u32> = v.iter().map(|d| d.down_days).collect();
        assert_eq!(ups, vec![0, 1, 2, 0, 0, 0]);
        assert_eq!(downs, vec![0, 0, 0, 1, 2, 0]);
    }

    #[test]
    fn co_movement_requires_both() {
        let bars = bars_from(
            &[10.0, 11.0, 12.0, 13.0, 12.0],
            &[100.0, 110.0, 105.0, 120.0, 90.0],
        );
        let s = co_movement_streaks(&bars);
        let rises: Vec<u32> = s.iter().map(|d| d.rise_days).collect();
        assert_eq!(rises, vec![0, 1, 0, 1, 0]);
        assert_eq!(s[4].fall_days, 1);
    }

    #[test]
    fn co_movement_turnover_includes_anchor_day() {
        let mut bars = bars_from(&[10.0, 11.0, 12.0], &[100.0, 110.0, 120.0]);
        bars[0].turnover_rate_pct = 0.5;
        bars[1].turnover_rate_pct = 1.5;
        bars[2].turnover_rate_pct = 2.0;
        let s = co_movement_streaks(&bars);
        assert_eq!(s[2].rise_days, 2);
        assert!((s[2].rise_turnover_pct - 4.0).abs() < 1e-12);
        assert!((s[2].rise_pct - 20.0).abs() < 1e-10);
        assert!((s[1].rise_turnover_pct - 2.0).abs() < 1e-12);
    }

    #[test]
    fn co_movement_turnover_restarts_with_new_run() {
        let mut bars = bars_from(
            &[10.0, 11.0, 10.0, 11.0],
            &[100.0, 110.0, 100.0, 110.0],
        );
        for (i, b) in bars.iter_mut().enumerate() {
            b.turnover_rate_pct = (i + 1) as f64;
        }
        let s = co_movement_streaks(&bars);
        assert_eq!(s[3].rise_days, 1);
        assert!((s[3].rise_turnover_pct - 7.0).abs() < 1e-12);
        assert_eq!(s[2].fall_days, 1);
        assert!((s[2].fall_turnover_pct - 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs() {
        assert!(price_streaks(&[]).is_empty());
        assert!(volume_streaks(&[]).is_empty());
        assert!(co_movement_streaks(&[]).is_empty());
    }
}
