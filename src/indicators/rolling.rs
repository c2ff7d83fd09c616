// =============================================================================
// Trailing-window primitives
// =============================================================================
//
// Every helper here looks back over a window that ends at (and includes) the
// current index. A window is defined only once it is full and every value in
// it is finite; `NaN` in the input marks a missing observation, exactly like a
// gap in a column of daily data.
//
// Output vectors always have the same length as the input, with `None` where
// the window is undefined, so they can be zipped back against the bar series.
// =============================================================================

/// Round to two decimals the way numpy's `round(2)` does: scale, round half to
/// even, unscale.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Lift a finite value into `Some`, anything else into `None`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn rolling_map<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            if slice.iter().all(|v| v.is_finite()) {
                finite(f(slice))
            } else {
                None
            }
        })
        .collect()
}

/// Arithmetic mean over the trailing `window`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_map(values, window, mean)
}

/// Sample standard deviation (n - 1 denominator) over the trailing `window`.
///
/// A window of one value has no sample deviation and yields `None`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling_map(values, window, sample_std)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_map(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_map(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

fn sample_std(window: &[f64]) -> f64 {
    let m = mean(window);
    let ss: f64 = window.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (window.len() - 1) as f64).sqrt()
}
