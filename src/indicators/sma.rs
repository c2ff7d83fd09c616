// =============================================================================
// Simple moving averages of close
// =============================================================================

use super::rolling::rolling_mean;

/// Fixed set of moving-average windows, shortest first.
pub const MA_WINDOWS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

/// Display name used in breakout lists, e.g. `"20日均线"`.
pub fn ma_name(window: usize) -> String {
    format!("{window}日均线")
}

/// Per-day values for every window in [`MA_WINDOWS`], in the same order.
pub fn moving_averages(closes: &[f64]) -> Vec<[Option<f64>; MA_WINDOWS.len()]> {
    let series: Vec<Vec<Option<f64>>> = MA_WINDOWS
        .iter()
        .map(|&w| rolling_mean(closes, w))
        .collect();

    (0..closes.len())
        .map(|i| std::array::from_fn(|k| series[k][i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(ma_name(5), "5日均线");
        assert_eq!(ma_name(250), "250日均线");
    }

    #[test]
    fn each_window_fills_independently() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let mas = moving_averages(&closes);
        assert_eq!(mas.len(), 30);
        // MA5 on day index 4 = mean(1..=5)
        assert_eq!(mas[4][0], Some(3.0));
        assert!(mas[3][0].is_none());
        // MA30 only on the last day
        assert_eq!(mas[29][3], Some(15.5));
        assert!(mas[28][3].is_none());
        // MA60 and beyond never
        assert!(mas[29][4].is_none());
    }
}
