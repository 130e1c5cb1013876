// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator battery used by
// the setup evaluator. Every series is returned aligned 1:1 with its input,
// with `None` marking positions where the lookback window is not yet full —
// callers are forced to handle insufficient-data and numerical-edge-case
// scenarios instead of reading placeholder zeros.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;

pub use frame::{IndicatorFrame, LatestRow};
