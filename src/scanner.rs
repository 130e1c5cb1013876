// =============================================================================
// Batch Scanner — fetch, compute, evaluate across a ticker universe
// =============================================================================
//
// Drives the full pipeline for a list of tickers with bounded concurrency.
// Per-ticker failures (network, timeout, bad data) are isolated: they become
// `ScanOutcome::Unavailable` and the scan keeps going. The only hard error is
// an empty ticker list, which is a caller bug rather than a data condition.
//
// Progress is reported after every completed ticker, whether it succeeded or
// failed, so `done` reaches `total` exactly once per scan. Cancellation stops
// new dispatches; tickers already in flight are allowed to finish and are
// included in the report.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::evaluator;
use crate::indicators::IndicatorFrame;
use crate::market_data::MarketDataProvider;
use crate::scan_config::ScanConfig;
use crate::types::{MatchRecord, NoMatchReason, ScanOutcome};

// =============================================================================
// Progress + cancellation
// =============================================================================

/// Receives progress callbacks during a scan. `done` is the number of
/// tickers fully resolved so far (monotonically non-decreasing), `total`
/// the number the scan set out to cover.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, done: usize, total: usize);
}

/// Default sink: one log line per completed ticker at debug level.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, done: usize, total: usize) {
        debug!(done, total, "scan progress");
    }
}

/// Cooperative cancellation handle. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Scan report
// =============================================================================

/// Aggregated result of a whole scan run.
#[derive(Debug)]
pub struct ScanReport {
    /// Passing records, in completion order.
    pub matches: Vec<MatchRecord>,
    /// Every ticker's outcome, in completion order.
    pub outcomes: Vec<(String, ScanOutcome)>,
    /// Number of tickers the scan set out to cover.
    pub total: usize,
    /// True if the scan stopped early because of cancellation.
    pub cancelled: bool,
}

impl ScanReport {
    /// Tickers whose data never arrived (fetch error or timeout).
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| !o.evaluated()).count()
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Orchestrates fetch → indicator computation → setup evaluation for a
/// ticker list.
pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: ScanConfig) -> Self {
        Self { provider, config }
    }

    /// Scan the full ticker list. Errors only on an empty list; every
    /// per-ticker problem is folded into the report instead.
    #[instrument(skip_all, fields(tickers = tickers.len()))]
    pub async fn scan(
        &self,
        tickers: &[String],
        sink: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<ScanReport> {
        if tickers.is_empty() {
            bail!("ticker list is empty; nothing to scan");
        }

        let total = tickers.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let done = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<(String, ScanOutcome)> = JoinSet::new();

        info!(
            total,
            max_concurrency = self.config.max_concurrency,
            interval = %self.config.interval,
            "scan started"
        );

        let mut dispatched = 0_usize;
        for ticker in tickers {
            if cancel.is_cancelled() {
                warn!(dispatched, total, "scan cancelled; skipping remaining tickers");
                break;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore closed");
            let provider = Arc::clone(&self.provider);
            let config = self.config.clone();
            let ticker = ticker.clone();

            dispatched += 1;
            tasks.spawn(async move {
                let outcome = scan_one(provider.as_ref(), &config, &ticker).await;
                drop(permit);
                (ticker, outcome)
            });
        }

        let cancelled = dispatched < total;
        let effective_total = if cancelled { dispatched } else { total };

        let mut matches = Vec::new();
        let mut outcomes = Vec::with_capacity(dispatched);

        while let Some(joined) = tasks.join_next().await {
            let (ticker, outcome) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    // A panicking worker is still an isolated failure.
                    warn!(error = %e, "scan worker panicked");
                    continue;
                }
            };

            if let ScanOutcome::Match(record) = &outcome {
                info!(ticker = %ticker, close = record.close, rsi = record.rsi, "setup matched");
                matches.push(record.clone());
            }
            outcomes.push((ticker, outcome));

            let n = done.fetch_add(1, Ordering::SeqCst) + 1;
            sink.on_progress(n, effective_total);
        }

        info!(
            matches = matches.len(),
            evaluated = outcomes.iter().filter(|(_, o)| o.evaluated()).count(),
            failures = outcomes.iter().filter(|(_, o)| !o.evaluated()).count(),
            cancelled,
            "scan finished"
        );

        Ok(ScanReport {
            matches,
            outcomes,
            total,
            cancelled,
        })
    }
}

/// Run the pipeline for one ticker. Never errors — every failure mode maps
/// to a `ScanOutcome` variant.
async fn scan_one(
    provider: &dyn MarketDataProvider,
    config: &ScanConfig,
    ticker: &str,
) -> ScanOutcome {
    let period = Duration::days(config.period_days);
    let timeout = std::time::Duration::from_secs(config.fetch_timeout_secs);

    let fetched = tokio::time::timeout(timeout, provider.fetch(ticker, period, &config.interval));

    let bars = match fetched.await {
        Err(_) => {
            warn!(ticker, timeout_secs = config.fetch_timeout_secs, "fetch timed out");
            return ScanOutcome::Unavailable(format!(
                "fetch timed out after {}s",
                config.fetch_timeout_secs
            ));
        }
        Ok(Err(e)) => {
            warn!(ticker, error = %format!("{e:#}"), "fetch failed");
            return ScanOutcome::Unavailable(format!("{e:#}"));
        }
        Ok(Ok(bars)) => bars,
    };

    let Some(frame) = IndicatorFrame::compute(&bars) else {
        debug!(ticker, bars = bars.len(), "insufficient history");
        return ScanOutcome::NoMatch(NoMatchReason::InsufficientHistory { bars: bars.len() });
    };

    let Some(row) = frame.latest() else {
        debug!(ticker, "indicators undefined at latest bar");
        return ScanOutcome::NoMatch(NoMatchReason::IndicatorUndefined);
    };

    match evaluator::evaluate(ticker, &row, &config.thresholds) {
        Some(record) => ScanOutcome::Match(record),
        None => ScanOutcome::NoMatch(NoMatchReason::PredicateNotMet),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Bar;
    use parking_lot::Mutex;

    /// Scripted provider: per-ticker canned responses.
    struct FakeProvider {
        responses: std::collections::HashMap<String, Result<Vec<Bar>, String>>,
        delay: Option<std::time::Duration>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                responses: Default::default(),
                delay: None,
            }
        }

        fn ok(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
            self.responses.insert(ticker.to_string(), Ok(bars));
            self
        }

        fn err(mut self, ticker: &str, msg: &str) -> Self {
            self.responses
                .insert(ticker.to_string(), Err(msg.to_string()));
            self
        }
    }

    #[async_trait::async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn fetch(&self, ticker: &str, _period: Duration, _interval: &str) -> Result<Vec<Bar>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.responses.get(ticker) {
                Some(Ok(bars)) => Ok(bars.clone()),
                Some(Err(msg)) => bail!("{msg}"),
                None => bail!("no data for {ticker}"),
            }
        }
    }

    /// Captures every progress callback for later assertions.
    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_progress(&self, done: usize, total: usize) {
            self.calls.lock().push((done, total));
        }
    }

    /// A gently rising series long enough for the full indicator battery.
    fn long_series(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                Bar::new(
                    86_400 * (i as i64 + 1),
                    base,
                    base + 1.0,
                    base - 1.0,
                    base + 0.5,
                    1_000_000.0 + (i % 7) as f64 * 50_000.0,
                )
            })
            .collect()
    }

    fn config() -> ScanConfig {
        ScanConfig {
            max_concurrency: 2,
            fetch_timeout_secs: 5,
            ..ScanConfig::default()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_ticker_list_is_an_error() {
        let provider = Arc::new(FakeProvider::new());
        let scanner = Scanner::new(provider, config());
        let err = scanner
            .scan(&[], &LogProgress, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn mid_list_failure_is_isolated() {
        let provider = Arc::new(
            FakeProvider::new()
                .ok("AAA", long_series(250))
                .err("BBB", "connection reset")
                .ok("CCC", long_series(250)),
        );
        let scanner = Scanner::new(provider, config());
        let sink = RecordingSink::default();

        let report = scanner
            .scan(&names(&["AAA", "BBB", "CCC"]), &sink, &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failures(), 1);
        assert_eq!(
            report.outcomes.iter().filter(|(_, o)| o.evaluated()).count(),
            2
        );

        // The failure reason is preserved on the right ticker.
        let (_, bbb) = report
            .outcomes
            .iter()
            .find(|(t, _)| t == "BBB")
            .unwrap();
        match bbb {
            ScanOutcome::Unavailable(msg) => assert!(msg.contains("connection reset")),
            other => panic!("expected Unavailable, got {other:?}"),
        }

        // Progress still completed: final callback reports done == total.
        let calls = sink.calls.lock();
        assert_eq!(calls.last(), Some(&(3, 3)));
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_complete() {
        let mut provider = FakeProvider::new();
        for t in ["A", "B", "C", "D", "E"] {
            provider = provider.ok(t, long_series(250));
        }
        let scanner = Scanner::new(Arc::new(provider), config());
        let sink = RecordingSink::default();

        scanner
            .scan(
                &names(&["A", "B", "C", "D", "E"]),
                &sink,
                &CancelToken::new(),
            )
            .await
            .unwrap();

        let calls = sink.calls.lock();
        assert_eq!(calls.len(), 5);
        for (i, (done, total)) in calls.iter().enumerate() {
            assert_eq!(*done, i + 1);
            assert_eq!(*total, 5);
        }
    }

    #[tokio::test]
    async fn short_history_yields_no_match_not_error() {
        let provider = Arc::new(FakeProvider::new().ok("TINY", long_series(199)));
        let scanner = Scanner::new(provider, config());

        let report = scanner
            .scan(&names(&["TINY"]), &LogProgress, &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(
            report.outcomes[0].1,
            ScanOutcome::NoMatch(NoMatchReason::InsufficientHistory { bars: 199 })
        );
        assert_eq!(report.failures(), 0);
    }

    #[tokio::test]
    async fn pre_cancelled_scan_dispatches_nothing() {
        let provider = Arc::new(FakeProvider::new().ok("AAA", long_series(250)));
        let scanner = Scanner::new(provider, config());
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = scanner
            .scan(&names(&["AAA", "BBB"]), &LogProgress, &cancel)
            .await
            .unwrap();

        assert!(report.cancelled);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.total, 2);
    }

    #[tokio::test]
    async fn slow_fetch_times_out_as_unavailable() {
        let mut provider = FakeProvider::new().ok("SLOW", long_series(250));
        provider.delay = Some(std::time::Duration::from_secs(60));
        let cfg = ScanConfig {
            fetch_timeout_secs: 1,
            ..config()
        };
        let scanner = Scanner::new(Arc::new(provider), cfg);

        tokio::time::pause();
        let handle = tokio::spawn(async move {
            scanner
                .scan(&names(&["SLOW"]), &LogProgress, &CancelToken::new())
                .await
        });
        tokio::time::advance(std::time::Duration::from_secs(2)).await;
        let report = handle.await.unwrap().unwrap();

        match &report.outcomes[0].1 {
            ScanOutcome::Unavailable(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sequential_mode_preserves_input_order() {
        let mut provider = FakeProvider::new();
        for t in ["X", "Y", "Z"] {
            provider = provider.ok(t, long_series(250));
        }
        let cfg = ScanConfig {
            max_concurrency: 1,
            ..config()
        };
        let scanner = Scanner::new(Arc::new(provider), cfg);

        let report = scanner
            .scan(&names(&["X", "Y", "Z"]), &LogProgress, &CancelToken::new())
            .await
            .unwrap();

        let order: Vec<&str> = report.outcomes.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["X", "Y", "Z"]);
    }
}
