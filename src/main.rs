// =============================================================================
// Swingscan — S&P 100 bullish-pullback scanner, main entry point
// =============================================================================
//
// Fetches daily history for each ticker in the universe, computes the full
// indicator battery, applies the eight-condition setup filter, and prints the
// matches sorted by RSI (deepest pullback first). Results are also written to
// setups.csv next to the binary.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod evaluator;
mod indicators;
mod market_data;
mod provider;
mod report;
mod scan_config;
mod scanner;
mod types;
mod universe;

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::provider::YahooChartClient;
use crate::scan_config::ScanConfig;
use crate::scanner::{CancelToken, LogProgress, Scanner};
use crate::universe::{parse_ticker_list, TickerUniverse};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ScanConfig::load("scan_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScanConfig::default()
    });

    // Override the universe from env if available.
    let universe = match std::env::var("SWINGSCAN_SYMBOLS") {
        Ok(raw) => {
            let list = parse_ticker_list(&raw);
            info!(count = list.len(), "Using custom ticker list from SWINGSCAN_SYMBOLS");
            TickerUniverse::Custom(list)
        }
        Err(_) => TickerUniverse::Sp100,
    };
    let tickers = universe.tickers();

    info!(
        tickers = tickers.len(),
        rsi_max = config.thresholds.rsi_max,
        min_rel_volume = config.thresholds.min_rel_volume,
        min_adx = config.thresholds.min_adx,
        "Starting bullish-pullback scan"
    );

    // ── 2. Wire cancellation to Ctrl-C ───────────────────────────────────
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C received — finishing in-flight tickers, skipping the rest");
                cancel.cancel();
            }
        });
    }

    // ── 3. Run the scan ──────────────────────────────────────────────────
    let provider = Arc::new(YahooChartClient::new());
    let scanner = Scanner::new(provider, config);

    let report = scanner.scan(&tickers, &LogProgress, &cancel).await?;

    // ── 4. Present results ───────────────────────────────────────────────
    // Deepest pullback (lowest RSI) first.
    let mut matches = report.matches.clone();
    matches.sort_by(|a, b| a.rsi.partial_cmp(&b.rsi).unwrap_or(Ordering::Equal));

    println!("{}", report::render_table(&matches));

    std::fs::write("setups.csv", report::to_csv(&matches))
        .context("failed to write setups.csv")?;

    info!(
        matches = matches.len(),
        failures = report.failures(),
        total = report.total,
        cancelled = report.cancelled,
        "Scan complete — results written to setups.csv"
    );

    Ok(())
}
