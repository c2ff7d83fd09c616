// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (span + 1)
//   EMA_0      = close_0
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// Seeded with the first value and never bias-adjusted, so the output has a
// value for every input from day one.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// # Edge cases
/// - `span == 0` or empty input => empty vec
/// - A non-finite input is skipped: the previous EMA is carried over that day.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (span + 1) as f64;
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &v in values {
        let next = match (prev, v.is_finite()) {
            (None, true) => Some(v),
            (Some(p), true) => Some(v * multiplier + p * (1.0 - multiplier)),
            (p, false) => p,
        };
        result.push(next.unwrap_or(f64::NAN));
        prev = next;
    }

    result
}
