// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The arithmetic mean over a trailing window. Output is aligned 1:1 with the
// input: positions before the window is full hold `None`, never a numeric
// placeholder.

/// Compute the SMA series for `values` with the given `period`.
///
/// The returned vector has the same length as `values`; index `i` is defined
/// (`Some`) from `period - 1` onward, provided every value in the window is
/// finite.
///
/// # Edge cases
/// - `period == 0` or `values.len() < period` => all `None`
/// - A non-finite value anywhere in a window => `None` at that position.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let sum: f64 = window.iter().sum();
        let sma = sum / period as f64;
        if sma.is_finite() {
            out[i] = Some(sma);
        }
    }

    out
}

/// SMA over an already-gappy series (`Option` inputs).
///
/// A window produces a value only when every element in it is defined; used
/// for second-stage smoothing (stochastic %K smoothing and %D).
pub fn calculate_sma_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mut sum = 0.0;
        let mut complete = true;
        for v in window {
            match v {
                Some(x) => sum += x,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            let sma = sum / period as f64;
            if sma.is_finite() {
                out[i] = Some(sma);
            }
        }
    }

    out
}
