// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(fast) - EMA(slow)
// Signal line = EMA(signal) of the MACD line
//
// Standard parameters are (12, 26, 9). The MACD line is defined once both
// EMAs are (index slow - 1); the signal line needs a further `signal - 1`
// defined MACD values on top of that.

use crate::indicators::ema::calculate_ema;

/// MACD line and signal line, both aligned 1:1 with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Compute MACD for `closes` with the given fast/slow/signal periods.
///
/// The signal EMA runs over the defined region of the MACD line and is
/// mapped back onto the original index space, so both outputs stay aligned
/// with the input series.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => {
                let v = f - s;
                if v.is_finite() {
                    Some(v)
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect();

    let mut signal_out = vec![None; closes.len()];
    if let Some(first) = line.iter().position(Option::is_some) {
        // The defined region is contiguous unless a non-finite value broke
        // an EMA mid-series; map_while stops at the first gap either way.
        let region: Vec<f64> = line[first..].iter().map_while(|v| *v).collect();
        let sig = calculate_ema(&region, signal);
        for (k, v) in sig.into_iter().enumerate() {
            signal_out[first + k] = v;
        }
    }

    MacdSeries {
        line,
        signal: signal_out,
    }
}
