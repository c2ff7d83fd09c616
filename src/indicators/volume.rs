// =============================================================================
// Volume amplification
// =============================================================================
//
// volume_t / mean(volume_{t-19..=t}), rounded to 2 dp. The 20-day volume
// average itself is reported alongside.

use super::rolling::{finite, rolling_mean, round2};

pub const VOLUME_MA_WINDOW: usize = 20;

/// Returns `(vol_ma20, amplification)` per day.
pub fn volume_amplification(volumes: &[f64]) -> Vec<(Option<f64>, Option<f64>)> {
    rolling_mean(volumes, VOLUME_MA_WINDOW)
        .into_iter()
        .zip(volumes)
        .map(|(ma, &v)| {
            let amp = ma.filter(|m| *m != 0.0).and_then(|m| finite(round2(v / m)));
            (ma, amp)
        })
        .collect()
}
