// =============================================================================
// Setup Evaluator — the eight-condition bullish-pullback predicate
// =============================================================================
//
// Inspects only the most recent fully-defined indicator row. All eight
// conditions must hold simultaneously on that one bar:
//
//   1. Close > SMA50 > SMA200      (established uptrend)
//   2. RSI below the cutoff        (pullback, momentum cooled)
//   3. Relative volume above par   (participation)
//   4. ATR/Close above the floor   (enough volatility to trade)
//   5. MACD line > signal line     (bullish momentum crossover state)
//   6. Close above the lower band  (no volatility breakdown)
//   7. ADX above the floor         (trend strength)
//   8. %K > %D                     (bullish stochastic crossover state)
//
// "No setup today" is an expected outcome, never an error. Undefined inputs
// never reach this code — the frame's latest-row projection fails closed.

use tracing::debug;

use crate::indicators::LatestRow;
use crate::scan_config::SetupThresholds;
use crate::types::MatchRecord;

/// Name of the first condition that fails, or `None` when all eight hold.
///
/// Checked in the documented order so diagnostics are stable.
pub fn first_failed_condition(row: &LatestRow, th: &SetupThresholds) -> Option<&'static str> {
    if !(row.close > row.sma50 && row.sma50 > row.sma200) {
        return Some("uptrend (close > SMA50 > SMA200)");
    }
    if !(row.rsi < th.rsi_max) {
        return Some("rsi pullback");
    }
    if !(row.rel_volume > th.min_rel_volume) {
        return Some("relative volume");
    }
    // A zero close would divide away; fail the condition instead.
    if !(row.close > 0.0 && row.atr / row.close > th.min_atr_ratio) {
        return Some("atr ratio");
    }
    if !(row.macd > row.macd_signal) {
        return Some("macd crossover");
    }
    if !(row.close > row.bb_lower) {
        return Some("lower bollinger band");
    }
    if !(row.adx > th.min_adx) {
        return Some("adx trend strength");
    }
    if !(row.stoch_k > row.stoch_d) {
        return Some("stochastic crossover");
    }
    None
}

/// Apply the full predicate to the latest row. Returns the match record on a
/// full pass, `None` otherwise.
pub fn evaluate(ticker: &str, row: &LatestRow, th: &SetupThresholds) -> Option<MatchRecord> {
    if let Some(condition) = first_failed_condition(row, th) {
        debug!(ticker, condition, "setup rejected");
        return None;
    }

    let atr_pct = row.atr / row.close * 100.0;
    debug!(
        ticker,
        close = row.close,
        rsi = row.rsi,
        rel_volume = row.rel_volume,
        atr_pct,
        adx = row.adx,
        "bullish pullback setup found"
    );

    Some(MatchRecord::new(
        ticker,
        row.close,
        row.rsi,
        row.rel_volume,
        atr_pct,
        row.adx,
    ))
}
