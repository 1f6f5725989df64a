// =============================================================================
// Chart API Client — OHLCV history over HTTP
// =============================================================================
//
// Talks to the Yahoo Finance v8 chart endpoint:
//
//   GET {base}/v8/finance/chart/{symbol}?range={range}&interval={interval}
//
// The response carries one `timestamp` array plus parallel OHLCV arrays in
// `indicators.quote[0]`. Any slot may be `null` (halted bars, the in-progress
// bar); those rows are skipped rather than zero-filled.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::Bar;

/// Chart API client.
#[derive(Clone)]
pub struct ChartClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChartClient {
    /// Create a client for `base_url` (scheme + host, no trailing slash).
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = super::http_client(user_agent)?;

        debug!(base_url = %base_url, "ChartClient initialised");

        Ok(Self { base_url, client })
    }

    /// GET /v8/finance/chart/{symbol}.
    ///
    /// Returns the bars oldest-first. An empty vec means the provider had no
    /// data for the window.
    #[instrument(skip(self), name = "chart::get_bars")]
    pub async fn get_bars(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<Bar>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .with_context(|| format!("GET chart for {symbol} request failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart response for {symbol}"))?;

        if !status.is_success() {
            anyhow::bail!("chart API returned {} for {}: {}", status, symbol, body);
        }

        let bars = parse_chart(&body)?;
        debug!(symbol, range, interval, count = bars.len(), "bars fetched");
        Ok(bars)
    }
}

impl std::fmt::Debug for ChartClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart response body into oldest-first bars.
///
/// Rows with any missing OHLCV value, an invalid timestamp, or non-finite
/// numbers are dropped. A response without a result array yields an empty
/// vec; an explicit API error becomes an `Err`.
pub fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart JSON")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("chart API error {}: {}", err.code, err.description);
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let row = (
            DateTime::<Utc>::from_timestamp(ts, 0),
            column(&quote.open, i),
            column(&quote.high, i),
            column(&quote.low, i),
            column(&quote.close, i),
            column(&quote.volume, i),
        );
        match row {
            (Some(t), Some(o), Some(h), Some(l), Some(c), Some(v)) => {
                let bar = Bar::new(t, o, h, l, c, v);
                if bar.is_well_formed() {
                    bars.push(bar);
                } else {
                    skipped += 1;
                }
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = bars.len(), "dropped incomplete chart rows");
    }

    // Callers rely on oldest-first order.
    if bars.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
        bars.sort_by_key(|b| b.timestamp);
    }

    Ok(bars)
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
