// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// Compares the latest close to the recent high/low range:
//
//   raw %K = (close - lowestLow(k_period)) / (highestHigh - lowestLow) * 100
//   %K     = SMA(k_smoothing) of raw %K   ("slow" stochastic)
//   %D     = SMA(d_period) of %K
//
// Standard parameters are (14, 3, 3). A window where high == low has no
// defined %K (zero range) — that position stays undefined rather than being
// forced to an arbitrary midpoint.

use crate::indicators::sma::calculate_sma_opt;
use crate::market_data::Bar;

/// Smoothed %K and %D, both aligned 1:1 with the input bars.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Compute the slow stochastic oscillator for `bars` (oldest first).
///
/// With (14, 3, 3): raw %K is defined from index 13, smoothed %K from 15,
/// and %D from 17.
pub fn calculate_stochastic(
    bars: &[Bar],
    k_period: usize,
    k_smoothing: usize,
    d_period: usize,
) -> StochasticSeries {
    let n = bars.len();
    let mut raw_k: Vec<Option<f64>> = vec![None; n];

    if k_period == 0 || k_smoothing == 0 || d_period == 0 || n < k_period {
        return StochasticSeries {
            k: vec![None; n],
            d: vec![None; n],
        };
    }

    for i in (k_period - 1)..n {
        let window = &bars[i + 1 - k_period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let range = highest - lowest;

        if !range.is_finite() || range == 0.0 {
            continue;
        }

        let k = (bars[i].close - lowest) / range * 100.0;
        if k.is_finite() {
            raw_k[i] = Some(k);
        }
    }

    let k = calculate_sma_opt(&raw_k, k_smoothing);
    let d = calculate_sma_opt(&k, d_period);

    StochasticSeries { k, d }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: i64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(i, (high + low) / 2.0, high, low, close, 100.0)
    }

    #[test]
    fn stochastic_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 105.0, 95.0, 100.0)).collect();
        let s = calculate_stochastic(&bars, 14, 3, 3);
        assert!(s.k.iter().all(Option::is_none));
        assert!(s.d.iter().all(Option::is_none));
    }

    #[test]
    fn stochastic_alignment_14_3_3() {
        let bars: Vec<Bar> = (0..30)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                bar(i, base + 2.0, base - 2.0, base + 1.0)
            })
            .collect();
        let s = calculate_stochastic(&bars, 14, 3, 3);
        // Smoothed %K from 13 + 2 = 15, %D from 15 + 2 = 17.
        assert!(s.k[14].is_none());
        assert!(s.k[15].is_some());
        assert!(s.d[16].is_none());
        assert!(s.d[17].is_some());
    }

    #[test]
    fn stochastic_close_at_high_reads_100() {
        // Close pinned at the window high => raw %K = 100 everywhere, and
        // smoothing preserves it.
        let bars: Vec<Bar> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(i, base, base - 5.0, base)
            })
            .collect();
        let s = calculate_stochastic(&bars, 14, 3, 3);
        let k = s.k[29].unwrap();
        assert!((k - 100.0).abs() < 1e-9, "expected %K = 100, got {k}");
    }

    #[test]
    fn stochastic_bounded_0_100() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.4).sin() * 10.0;
                bar(i, base + 1.5, base - 1.5, base + (i as f64 * 0.9).cos())
            })
            .collect();
        let s = calculate_stochastic(&bars, 14, 3, 3);
        for v in s.k.iter().chain(s.d.iter()).filter_map(|v| *v) {
            assert!((0.0..=100.0).contains(&v), "stochastic {v} out of range");
        }
    }

    #[test]
    fn stochastic_zero_range_is_undefined() {
        // Perfectly flat bars: highest == lowest, so raw %K never defines.
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0, 100.0, 100.0)).collect();
        let s = calculate_stochastic(&bars, 14, 3, 3);
        assert!(s.k.iter().all(Option::is_none));
        assert!(s.d.iter().all(Option::is_none));
    }
}
