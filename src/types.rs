// =============================================================================
// Shared types used across the swingscan engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Round to one decimal place.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A single passing scan result — one row of the final report.
///
/// Values are rounded for display at construction time (close to two
/// decimals, RSI/ADX to one, RelVol/ATR% to two) so that table rendering and
/// CSV export agree with each other exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub ticker: String,
    pub close: f64,
    pub rsi: f64,
    pub rel_vol: f64,
    pub atr_pct: f64,
    pub adx: f64,
}

impl MatchRecord {
    /// Build a record from raw (unrounded) indicator values.
    pub fn new(
        ticker: impl Into<String>,
        close: f64,
        rsi: f64,
        rel_vol: f64,
        atr_pct: f64,
        adx: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            close: round2(close),
            rsi: round1(rsi),
            rel_vol: round2(rel_vol),
            atr_pct: round2(atr_pct),
            adx: round1(adx),
        }
    }
}

/// Why a ticker produced no match. All of these are expected, non-exceptional
/// outcomes — the scan continues regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatchReason {
    /// Fewer than the minimum required bars came back; no indicator was
    /// computed at all.
    InsufficientHistory { bars: usize },
    /// One or more required indicators were undefined at the latest bar
    /// (or an entire indicator column was undefined).
    IndicatorUndefined,
    /// Everything was defined but the eight-condition filter failed —
    /// the common case on any given day.
    PredicateNotMet,
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientHistory { bars } => {
                write!(f, "insufficient history ({bars} bars)")
            }
            Self::IndicatorUndefined => write!(f, "indicators undefined at latest bar"),
            Self::PredicateNotMet => write!(f, "predicate not met"),
        }
    }
}

/// Outcome of scanning a single ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// All eight conditions held on the latest bar.
    Match(MatchRecord),
    /// Evaluated, but no setup today.
    NoMatch(NoMatchReason),
    /// The data provider could not supply a series (network failure, unknown
    /// ticker, timeout, empty result). Isolated to this ticker.
    Unavailable(String),
}

impl ScanOutcome {
    /// True when the ticker was actually evaluated (data arrived and the
    /// pipeline ran), whether or not it matched.
    pub fn evaluated(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match(r) => write!(f, "match (close {:.2}, rsi {:.1})", r.close, r.rsi),
            Self::NoMatch(reason) => write!(f, "no match: {reason}"),
            Self::Unavailable(e) => write!(f, "unavailable: {e}"),
        }
    }
}
