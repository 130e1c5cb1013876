// =============================================================================
// Scan Configuration — tunable thresholds and scan parameters
// =============================================================================
//
// Every tunable of the scanner lives here. The eight-condition thresholds
// have drifted across revisions of the pullback rule (RSI cutoff 40–50,
// RelVol 1.2–1.5, ADX 20–25), so they are an explicit named structure with
// the canonical values as defaults rather than literals in the evaluator.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry serde defaults so that adding new fields never
// breaks loading an older config file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_max() -> f64 {
    50.0
}

fn default_min_rel_volume() -> f64 {
    1.2
}

fn default_min_atr_ratio() -> f64 {
    0.01
}

fn default_min_adx() -> f64 {
    20.0
}

fn default_period_days() -> i64 {
    365
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

// =============================================================================
// SetupThresholds
// =============================================================================

/// Thresholds for the eight-condition bullish-pullback predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupThresholds {
    /// RSI must be strictly below this (pullback, momentum cooled).
    #[serde(default = "default_rsi_max")]
    pub rsi_max: f64,

    /// Relative volume must be strictly above this (participation).
    #[serde(default = "default_min_rel_volume")]
    pub min_rel_volume: f64,

    /// ATR / Close must be strictly above this (minimum relative
    /// volatility; 0.01 = 1 % of price).
    #[serde(default = "default_min_atr_ratio")]
    pub min_atr_ratio: f64,

    /// ADX must be strictly above this (trend strength).
    #[serde(default = "default_min_adx")]
    pub min_adx: f64,
}

impl Default for SetupThresholds {
    fn default() -> Self {
        Self {
            rsi_max: default_rsi_max(),
            min_rel_volume: default_min_rel_volume(),
            min_atr_ratio: default_min_atr_ratio(),
            min_adx: default_min_adx(),
        }
    }
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Top-level configuration for a scan run.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Predicate thresholds (see [`SetupThresholds`]).
    #[serde(default)]
    pub thresholds: SetupThresholds,

    /// Historical lookback requested from the data provider, in days.
    /// One calendar year of daily bars comfortably clears the 200-bar
    /// minimum on a typical trading calendar.
    #[serde(default = "default_period_days")]
    pub period_days: i64,

    /// Bar interval token passed to the provider.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Maximum number of tickers fetched/evaluated at once. 1 reproduces
    /// strictly sequential scanning.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-ticker fetch timeout in seconds; expiry is an isolated
    /// per-ticker failure, not a scan abort.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            thresholds: SetupThresholds::default(),
            period_days: default_period_days(),
            interval: default_interval(),
            max_concurrency: default_max_concurrency(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_max = config.thresholds.rsi_max,
            min_rel_volume = config.thresholds.min_rel_volume,
            min_adx = config.thresholds.min_adx,
            "scan config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise scan config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "scan config saved (atomic)");
        Ok(())
    }
}
