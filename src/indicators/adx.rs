// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use crate::market_data::Bar;

/// Compute the ADX series for `bars` (oldest first), aligned 1:1 with the
/// input.
///
/// The first DX value lands at index `period` (after the initial Wilder sum
/// of +DM/-DM/TR), and the ADX seed needs `period` DX values, so the series
/// is defined from index `2 * period - 1` onward.
///
/// # Edge cases
/// - `period == 0` or `bars.len() < 2 * period` => all `None`
/// - A zero smoothed TR or a non-finite intermediate stops the series.
pub fn calculate_adx(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let n = bars.len();
    let mut out = vec![None; n];
    if period == 0 || n < 2 * period {
        return out;
    }

    let period_f = period as f64;

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range per bar-to-bar transition
    // ------------------------------------------------------------------
    let transitions = n - 1;
    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut tr_vals = Vec::with_capacity(transitions);

    for i in 1..n {
        let high = bars[i].high;
        let low = bars[i].low;
        let prev_high = bars[i - 1].high;
        let prev_low = bars[i - 1].low;
        let prev_close = bars[i - 1].close;

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());

        let up_move = high - prev_high;
        let down_move = prev_low - low;

        let pdm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let mdm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        plus_dm.push(pdm);
        minus_dm.push(mdm);
        tr_vals.push(tr);
    }

    // ------------------------------------------------------------------
    // Step 3-5: Wilder smoothing and the DX sequence
    // ------------------------------------------------------------------
    let mut smooth_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    // dx_values[k] sits at bar index `period + k`.
    let mut dx_values: Vec<f64> = Vec::with_capacity(transitions - period + 1);

    match compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr) {
        Some(dx) => dx_values.push(dx),
        None => return out,
    }

    for t in period..transitions {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[t];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[t];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[t];

        match compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr) {
            Some(dx) => dx_values.push(dx),
            None => break,
        }
    }

    // ------------------------------------------------------------------
    // Step 6: ADX = Wilder's smoothed average of DX
    // ------------------------------------------------------------------
    if dx_values.len() < period {
        return out;
    }

    let seed: f64 = dx_values[..period].iter().sum::<f64>() / period_f;
    if !seed.is_finite() {
        return out;
    }
    out[2 * period - 1] = Some(seed);

    let mut adx = seed;
    for (k, &dx) in dx_values.iter().enumerate().skip(period) {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
        if !adx.is_finite() {
            break;
        }
        out[period + k] = Some(adx);
    }

    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
///
/// Returns `None` if the divisor is zero or the result is non-finite.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // Both +DI and -DI are zero — no directional movement.
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;

    if dx.is_finite() {
        Some(dx)
    } else {
        None
    }
}
