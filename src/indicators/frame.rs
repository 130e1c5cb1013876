// =============================================================================
// IndicatorFrame — the full per-bar-aligned indicator battery for one ticker
// =============================================================================
//
// Every column has the same length as the input series; positions before an
// indicator's warm-up window hold `None`. The frame is a pure function of
// the series: computing it twice over the same bars yields identical values.
//
// Battery parameters are fixed (the setup definition depends on them);
// only the evaluator *thresholds* are configurable.

use crate::indicators::adx::calculate_adx;
use crate::indicators::atr::calculate_atr;
use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::macd::calculate_macd;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::indicators::stochastic::calculate_stochastic;
use crate::indicators::volume::calculate_relative_volume;
use crate::market_data::{Bar, MIN_BARS};

const SMA_FAST: usize = 50;
const SMA_SLOW: usize = 200;
const RSI_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;
const ADX_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const BB_PERIOD: usize = 20;
const BB_NUM_STD: f64 = 2.0;
const STOCH_K: usize = 14;
const STOCH_SMOOTH: usize = 3;
const STOCH_D: usize = 3;
const VOLUME_PERIOD: usize = 20;

/// All derived columns for one series, aligned 1:1 with its bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub close: Vec<f64>,
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
    pub atr14: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub adx14: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub avg_volume20: Vec<Option<f64>>,
    pub rel_volume: Vec<Option<f64>>,
}

/// The final aligned row of a frame with every evaluator input defined.
/// Produced only when *none* of the values is undefined — the fail-closed
/// projection the evaluator works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestRow {
    pub close: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi: f64,
    pub atr: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_lower: f64,
    pub adx: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub rel_volume: f64,
}

impl IndicatorFrame {
    /// Compute the full battery over `bars` (oldest first).
    ///
    /// Returns `None` when fewer than [`MIN_BARS`] bars are supplied — the
    /// series is categorically unusable and no computation is attempted.
    pub fn compute(bars: &[Bar]) -> Option<Self> {
        if bars.len() < MIN_BARS {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let macd = calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let bands = calculate_bollinger(&closes, BB_PERIOD, BB_NUM_STD);
        let stoch = calculate_stochastic(bars, STOCH_K, STOCH_SMOOTH, STOCH_D);
        let vol = calculate_relative_volume(&volumes, VOLUME_PERIOD);

        Some(Self {
            sma50: calculate_sma(&closes, SMA_FAST),
            sma200: calculate_sma(&closes, SMA_SLOW),
            rsi14: calculate_rsi(&closes, RSI_PERIOD),
            atr14: calculate_atr(bars, ATR_PERIOD),
            macd: macd.line,
            macd_signal: macd.signal,
            bb_lower: bands.lower,
            adx14: calculate_adx(bars, ADX_PERIOD),
            stoch_k: stoch.k,
            stoch_d: stoch.d,
            avg_volume20: vol.average,
            rel_volume: vol.relative,
            close: closes,
        })
    }

    /// Number of aligned rows (same as the input series length).
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Project the most recent aligned row, or `None` if any required value
    /// is undefined there. An entirely-undefined column (a degenerate
    /// sub-computation) ends up here too: its last element is `None`, so the
    /// projection fails closed.
    pub fn latest(&self) -> Option<LatestRow> {
        let i = self.close.len().checked_sub(1)?;
        Some(LatestRow {
            close: self.close[i],
            sma50: self.sma50[i]?,
            sma200: self.sma200[i]?,
            rsi: self.rsi14[i]?,
            atr: self.atr14[i]?,
            macd: self.macd[i]?,
            macd_signal: self.macd_signal[i]?,
            bb_lower: self.bb_lower[i]?,
            adx: self.adx14[i]?,
            stoch_k: self.stoch_k[i]?,
            stoch_d: self.stoch_d[i]?,
            rel_volume: self.rel_volume[i]?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// A gently trending, mildly oscillating series long enough for every
    /// indicator in the battery.
    fn synthetic_series(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                let base = 100.0 + t * 0.2 + (t * 0.35).sin() * 3.0;
                let volume = 1_000_000.0 + (t * 0.8).cos() * 200_000.0;
                Bar::new(i as i64, base - 0.3, base + 1.2, base - 1.4, base + 0.4, volume)
            })
            .collect()
    }

    #[test]
    fn compute_rejects_short_series() {
        let bars = synthetic_series(199);
        assert!(IndicatorFrame::compute(&bars).is_none());
    }

    #[test]
    fn compute_accepts_exact_minimum() {
        let bars = synthetic_series(200);
        let frame = IndicatorFrame::compute(&bars).unwrap();
        assert_eq!(frame.len(), 200);
        assert!(frame.latest().is_some());
    }

    #[test]
    fn columns_align_with_series() {
        let bars = synthetic_series(260);
        let frame = IndicatorFrame::compute(&bars).unwrap();

        assert_eq!(frame.sma200.len(), 260);

        // Warm-up boundaries for each column.
        assert!(frame.sma50[48].is_none());
        assert!(frame.sma50[49].is_some());
        assert!(frame.sma200[198].is_none());
        assert!(frame.sma200[199].is_some());
        assert!(frame.rsi14[13].is_none());
        assert!(frame.rsi14[14].is_some());
        assert!(frame.atr14[13].is_none());
        assert!(frame.atr14[14].is_some());
        assert!(frame.macd[24].is_none());
        assert!(frame.macd[25].is_some());
        assert!(frame.macd_signal[32].is_none());
        assert!(frame.macd_signal[33].is_some());
        assert!(frame.bb_lower[18].is_none());
        assert!(frame.bb_lower[19].is_some());
        assert!(frame.adx14[26].is_none());
        assert!(frame.adx14[27].is_some());
        assert!(frame.stoch_k[14].is_none());
        assert!(frame.stoch_k[15].is_some());
        assert!(frame.stoch_d[16].is_none());
        assert!(frame.stoch_d[17].is_some());
        assert!(frame.avg_volume20[18].is_none());
        assert!(frame.avg_volume20[19].is_some());
        assert!(frame.rel_volume[19].is_some());
    }

    #[test]
    fn latest_row_fully_defined_on_clean_series() {
        let bars = synthetic_series(260);
        let frame = IndicatorFrame::compute(&bars).unwrap();
        let row = frame.latest().unwrap();
        assert!(row.close > 0.0);
        assert!((0.0..=100.0).contains(&row.rsi));
        assert!((0.0..=100.0).contains(&row.adx));
        assert!(row.atr > 0.0);
        assert!(row.rel_volume > 0.0);
    }

    #[test]
    fn latest_fails_closed_on_degenerate_column() {
        // Flat bars: the stochastic range is zero everywhere, so %K/%D are
        // entirely undefined and the projection must refuse.
        let bars: Vec<Bar> = (0..220)
            .map(|i| Bar::new(i as i64, 100.0, 100.0, 100.0, 100.0, 1_000.0))
            .collect();
        let frame = IndicatorFrame::compute(&bars).unwrap();
        assert!(frame.stoch_k.iter().all(Option::is_none));
        assert!(frame.latest().is_none());
    }

    #[test]
    fn compute_is_idempotent() {
        let bars = synthetic_series(230);
        let a = IndicatorFrame::compute(&bars).unwrap();
        let b = IndicatorFrame::compute(&bars).unwrap();
        assert_eq!(a, b);
    }
}
