// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period

use crate::market_data::Bar;

/// Compute the ATR series for `bars` (oldest first), aligned 1:1 with the
/// input.
///
/// Each TR needs the previous bar's close, so the seed lands at index
/// `period` and the series is defined from there onward.
///
/// # Edge cases
/// - `period == 0` or `bars.len() < period + 1` => all `None`
/// - A non-finite value stops the series at that position.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    let mut out = vec![None; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    // --- Step 1: True Range for each consecutive pair ------------------------
    let mut tr_values: Vec<f64> = Vec::with_capacity(n - 1);
    for i in 1..n {
        let high = bars[i].high;
        let low = bars[i].low;
        let prev_close = bars[i - 1].close;

        let hl = high - low;
        let hc = (high - prev_close).abs();
        let lc = (low - prev_close).abs();

        tr_values.push(hl.max(hc).max(lc));
    }

    // --- Step 2: Seed with the SMA of the first `period` TR values -----------
    let seed: f64 = tr_values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return out;
    }
    out[period] = Some(seed);

    // --- Step 3: Wilder's smoothing for the remaining TR values --------------
    let period_f = period as f64;
    let mut atr = seed;
    for i in (period + 1)..n {
        atr = (atr * (period_f - 1.0) + tr_values[i - 1]) / period_f;
        if !atr.is_finite() {
            break;
        }
        out[i] = Some(atr);
    }

    out
}
