// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average.
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period`
// values.

/// Compute the EMA series for `values` with the given `period`, aligned 1:1
/// with the input.
///
/// Index `i` is defined from `period - 1` onward. If a non-finite value
/// enters the recurrence the series stops there — downstream consumers must
/// not trust a broken tail.
///
/// # Edge cases
/// - `period == 0` or `values.len() < period` => all `None`
/// - Non-finite seed => all `None`
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of the first `period` values.
    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return out;
    }

    out[period - 1] = Some(seed);
    let mut prev = seed;

    for i in period..values.len() {
        let ema = values[i] * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        out[i] = Some(ema);
        prev = ema;
    }

    out
}
