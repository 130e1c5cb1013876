// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation over
// the window (divide by n, not n-1) — this is held fixed; a sample deviation
// would shift the lower band slightly and with it the breakdown condition.

/// Per-bar-aligned Bollinger Band series.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands for `closes` with the given `period` and band
/// width multiplier `num_std`, aligned 1:1 with the input.
///
/// Index `i` is defined from `period - 1` onward when the whole window is
/// finite.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let n = closes.len();
    let mut bands = BollingerSeries {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if period == 0 || n < period {
        return bands;
    }

    for i in (period - 1)..n {
        let window = &closes[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;

        // Population variance over the window.
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();

        let upper = mean + num_std * std_dev;
        let lower = mean - num_std * std_dev;

        if mean.is_finite() && upper.is_finite() && lower.is_finite() {
            bands.middle[i] = Some(mean);
            bands.upper[i] = Some(upper);
            bands.lower[i] = Some(lower);
        }
    }

    bands
}
