// =============================================================================
// KDJ stochastic oscillator
// =============================================================================
//
//   RSV_t = (close_t - min(low, 9)) / (max(high, 9) - min(low, 9)) * 100
//
// K and D are seeded to 50.0 on the first day RSV is defined. Afterwards, on
// every day with a defined RSV:
//
//   K_t = 2/3 * K_{t-1} + 1/3 * RSV_t
//   D_t = 2/3 * D_{t-1} + 1/3 * K_t
//
// On a day without RSV, K and D carry forward unchanged. J = 3K - 2D. The
// recursion runs on unrounded values; K, D, J are rounded to 2 dp only when
// reported.
// =============================================================================

use serde::Serialize;

use super::rolling::{rolling_max, rolling_min, round2};

pub const RSV_PERIOD: usize = 9;
pub const KDJ_SEED: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kdj {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// Raw stochastic value per day. A window whose high-low range is zero has
/// no defined position and yields `None`.
pub fn calculate_rsv(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let hh = rolling_max(highs, period);
    let ll = rolling_min(lows, period);

    closes
        .iter()
        .zip(hh.into_iter().zip(ll))
        .map(|(&close, (h, l))| {
            let (h, l) = (h?, l?);
            let range = h - l;
            if range == 0.0 {
                return None;
            }
            let rsv = (close - l) / range * 100.0;
            rsv.is_finite().then_some(rsv)
        })
        .collect()
}

/// Running K/D state carried across days.
#[derive(Debug, Clone, Copy, Default)]
struct KdState {
    kd: Option<(f64, f64)>,
}

impl KdState {
    fn step(&mut self, rsv: Option<f64>) -> Option<(f64, f64)> {
        self.kd = match (self.kd, rsv) {
            (None, Some(_)) => Some((KDJ_SEED, KDJ_SEED)),
            (Some((k, d)), Some(rsv)) => {
                let k = 2.0 / 3.0 * k + 1.0 / 3.0 * rsv;
                let d = 2.0 / 3.0 * d + 1.0 / 3.0 * k;
                Some((k, d))
            }
            (kd, None) => kd,
        };
        self.kd
    }
}

/// Unrounded K and D per day, `None` before the first defined RSV.
pub fn kd_recursion(rsv: &[Option<f64>]) -> Vec<Option<(f64, f64)>> {
    let mut state = KdState::default();
    rsv.iter().map(|&r| state.step(r)).collect()
}

/// Reported K, D, J per day.
pub fn calculate_kdj(rsv: &[Option<f64>]) -> Vec<Option<Kdj>> {
    kd_recursion(rsv)
        .into_iter()
        .map(|kd| {
            kd.map(|(k, d)| Kdj {
                k: round2(k),
                d: round2(d),
                j: round2(3.0 * k - 2.0 * d),
            })
        })
        .collect()
}
