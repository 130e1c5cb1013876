// =============================================================================
// Market data model — OHLCV bars and the provider seam
// =============================================================================
//
// A `Bar` is one daily (or other fixed-interval) OHLCV observation; a series
// is a `Vec<Bar>` in ascending timestamp order with no duplicates. Providers
// hand back oldest-first series; `validate_series` enforces the ordering
// invariant right after the wire boundary so everything downstream can rely
// on it.

use anyhow::{bail, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Minimum number of bars a series must have before any indicator is
/// computed. 200 is the longest lookback in the battery (SMA200); shorter
/// series are categorically unusable.
pub const MIN_BARS: usize = 200;

/// A single OHLCV observation. Timestamp is epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar is usable when every field is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p >= 0.0)
            && self.volume.is_finite()
            && self.volume >= 0.0
    }
}

/// Check a freshly fetched series: non-empty, strictly ascending timestamps
/// (which also rules out duplicates), all bars valid.
pub fn validate_series(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        bail!("series is empty");
    }
    for w in bars.windows(2) {
        if w[1].timestamp <= w[0].timestamp {
            bail!(
                "series timestamps not strictly ascending ({} then {})",
                w[0].timestamp,
                w[1].timestamp
            );
        }
    }
    if let Some(bad) = bars.iter().find(|b| !b.is_valid()) {
        bail!("series contains an invalid bar at timestamp {}", bad.timestamp);
    }
    Ok(())
}

/// External collaborator that supplies historical OHLCV series.
///
/// `period` is the lookback window (how far back from now), `interval` the
/// bar width as the provider's interval token (e.g. "1d"). Implementations
/// return bars oldest-first. Any failure — network, unknown ticker, empty
/// result — surfaces as an error; the scanner isolates it per ticker.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, ticker: &str, period: Duration, interval: &str) -> Result<Vec<Bar>>;
}
