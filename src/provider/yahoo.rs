// =============================================================================
// Yahoo Finance chart API client — historical daily OHLCV
// =============================================================================
//
// The v8 chart endpoint is public (no key, no signing). The response nests
// parallel arrays under chart.result[0]: a `timestamp` array plus
// indicators.quote[0].{open,high,low,close,volume}. Entries can be null for
// halted sessions; those bars are skipped rather than zero-filled.

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use crate::market_data::{validate_series, Bar, MarketDataProvider};

/// Yahoo Finance chart API client.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for YahooChartClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooChartClient {
    pub fn new() -> Self {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    /// Point the client at a different host. Used by tests to stub the
    /// endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; swingscan/1.0)")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Parse the chart payload into bars, skipping null/partial entries.
    fn parse_chart(ticker: &str, body: &serde_json::Value) -> Result<Vec<Bar>> {
        if let Some(err) = body["chart"]["error"].as_object() {
            let desc = err
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown provider error");
            bail!("chart error for {ticker}: {desc}");
        }

        let result = body["chart"]["result"]
            .as_array()
            .and_then(|arr| arr.first())
            .with_context(|| format!("chart response for {ticker} has no result"))?;

        let timestamps = result["timestamp"]
            .as_array()
            .with_context(|| format!("chart response for {ticker} has no timestamps"))?;

        let quote = result["indicators"]["quote"]
            .as_array()
            .and_then(|arr| arr.first())
            .with_context(|| format!("chart response for {ticker} has no quote block"))?;

        let opens = quote["open"].as_array();
        let highs = quote["high"].as_array();
        let lows = quote["low"].as_array();
        let closes = quote["close"].as_array();
        let volumes = quote["volume"].as_array();

        let (Some(opens), Some(highs), Some(lows), Some(closes), Some(volumes)) =
            (opens, highs, lows, closes, volumes)
        else {
            bail!("chart response for {ticker} is missing OHLCV arrays");
        };

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut skipped = 0_usize;
        let mut last_ts = i64::MIN;

        for (i, ts) in timestamps.iter().enumerate() {
            let Some(ts) = ts.as_i64() else {
                skipped += 1;
                continue;
            };

            let fields = (
                opens.get(i).and_then(|v| v.as_f64()),
                highs.get(i).and_then(|v| v.as_f64()),
                lows.get(i).and_then(|v| v.as_f64()),
                closes.get(i).and_then(|v| v.as_f64()),
                volumes.get(i).and_then(|v| v.as_f64()),
            );

            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
                // Nulls happen on halted or partial sessions.
                skipped += 1;
                continue;
            };

            if ts <= last_ts {
                skipped += 1;
                continue;
            }
            last_ts = ts;

            bars.push(Bar::new(ts, open, high, low, close, volume));
        }

        if skipped > 0 {
            warn!(ticker, skipped, "skipped null or out-of-order chart entries");
        }
        if bars.is_empty() {
            bail!("chart response for {ticker} contained no usable bars");
        }

        validate_series(&bars)
            .with_context(|| format!("chart series for {ticker} failed validation"))?;

        Ok(bars)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooChartClient {
    /// GET /v8/finance/chart/{ticker} for the trailing `period`, oldest
    /// bars first.
    #[instrument(skip(self, period), name = "yahoo::fetch")]
    async fn fetch(&self, ticker: &str, period: Duration, interval: &str) -> Result<Vec<Bar>> {
        let now = Utc::now();
        let period2 = now.timestamp();
        let period1 = (now - period).timestamp();

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}",
            self.base_url, ticker, period1, period2, interval
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET chart request for {ticker} failed"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {ticker}"))?;

        if !status.is_success() {
            bail!("chart endpoint returned {status} for {ticker}: {body}");
        }

        let bars = Self::parse_chart(ticker, &body)?;
        debug!(ticker, interval, count = bars.len(), "chart history fetched");
        Ok(bars)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_body(timestamps: Vec<i64>, closes: Vec<serde_json::Value>) -> serde_json::Value {
        let n = timestamps.len();
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": vec![json!(100.0); n],
                            "high": vec![json!(101.0); n],
                            "low": vec![json!(99.0); n],
                            "close": closes,
                            "volume": vec![json!(1_000_000.0); n],
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn parse_chart_happy_path() {
        let body = chart_body(vec![1, 2, 3], vec![json!(100.1), json!(100.2), json!(100.3)]);
        let bars = YahooChartClient::parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, 1);
        assert!((bars[2].close - 100.3).abs() < 1e-10);
    }

    #[test]
    fn parse_chart_skips_null_entries() {
        let body = chart_body(vec![1, 2, 3], vec![json!(100.1), json!(null), json!(100.3)]);
        let bars = YahooChartClient::parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].timestamp, 3);
    }

    #[test]
    fn parse_chart_skips_out_of_order_timestamps() {
        let body = chart_body(vec![1, 3, 2], vec![json!(100.1), json!(100.2), json!(100.3)]);
        let bars = YahooChartClient::parse_chart("AAPL", &body).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn parse_chart_surfaces_provider_error() {
        let body = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        });
        let err = YahooChartClient::parse_chart("ZZZZ", &body).unwrap_err();
        assert!(err.to_string().contains("No data found"));
    }

    #[test]
    fn parse_chart_rejects_all_null_series() {
        let body = chart_body(vec![1, 2], vec![json!(null), json!(null)]);
        assert!(YahooChartClient::parse_chart("AAPL", &body).is_err());
    }

    #[test]
    fn parse_chart_rejects_missing_result() {
        let body = json!({ "chart": { "result": [], "error": null } });
        assert!(YahooChartClient::parse_chart("AAPL", &body).is_err());
    }
}
