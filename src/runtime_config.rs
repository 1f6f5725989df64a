// =============================================================================
// Runtime Configuration — JSON settings with serde defaults
// =============================================================================
//
// Every tunable for the three commands lives here: the monitored instruments,
// poll intervals, data endpoints and indicator parameters.
//
// All fields carry `#[serde(default)]` so that a partial (or empty) config
// file still loads, and a missing file falls back to `RuntimeConfig::default`.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::PriceBasis;
use crate::types::{Instrument, InstrumentKind};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_instruments() -> Vec<Instrument> {
    vec![
        Instrument::new("VIX", InstrumentKind::Index),
        Instrument::new("SPX", InstrumentKind::Index),
        Instrument::new("SPY", InstrumentKind::Stock),
        Instrument::new("QQQ", InstrumentKind::Stock),
        Instrument::new("AMD", InstrumentKind::Stock),
        Instrument::new("NVDA", InstrumentKind::Stock),
    ]
}

fn default_sentiment_poll_secs() -> u64 {
    1200
}

fn default_monitor_poll_secs() -> u64 {
    5
}

fn default_history_range() -> String {
    "1y".to_string()
}

fn default_history_interval() -> String {
    "1d".to_string()
}

fn default_intraday_range() -> String {
    "1d".to_string()
}

fn default_intraday_interval() -> String {
    "5m".to_string()
}

fn default_chart_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_sentiment_url() -> String {
    "https://production.dataviz.cnn.io/index/fearandgreed/graphdata".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/80.0.3987.149 Safari/537.36"
        .to_string()
}

fn default_rsi_period() -> usize {
    9
}

fn default_band_std() -> f64 {
    2.0
}

fn default_band_window() -> usize {
    20
}

fn default_reversal_threshold_pct() -> f64 {
    2.0
}

fn default_pullback_threshold() -> f64 {
    0.02
}

fn default_divergence_window() -> usize {
    14
}

fn default_divergence_tolerance_pct() -> f64 {
    1.0
}

fn default_slope_window() -> usize {
    10
}

fn default_volume_window() -> usize {
    20
}

fn default_volume_multiplier() -> f64 {
    1.5
}

fn default_stop_factor() -> f64 {
    0.98
}

fn default_monitor_vwap_basis() -> PriceBasis {
    PriceBasis::Close
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Tunable parameters for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// RSI look-back in bars.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_band_std")]
    pub band_std: f64,

    /// Rolling window for band dispersion.
    #[serde(default = "default_band_window")]
    pub band_window: usize,

    /// Minimum |% distance| from VWAP for a reversal signal.
    #[serde(default = "default_reversal_threshold_pct")]
    pub reversal_threshold_pct: f64,

    /// How far (fraction of VWAP) the low may sit below VWAP in a pullback.
    #[serde(default = "default_pullback_threshold")]
    pub pullback_threshold: f64,

    #[serde(default = "default_divergence_window")]
    pub divergence_window: usize,

    /// Momentum gap in percentage points that counts as divergence.
    #[serde(default = "default_divergence_tolerance_pct")]
    pub divergence_tolerance_pct: f64,

    #[serde(default = "default_slope_window")]
    pub slope_window: usize,

    #[serde(default = "default_volume_window")]
    pub volume_window: usize,

    /// Volume must exceed this multiple of its rolling mean to confirm.
    #[serde(default = "default_volume_multiplier")]
    pub volume_multiplier: f64,

    /// Trailing stop sits at `vwap * stop_factor`.
    #[serde(default = "default_stop_factor")]
    pub stop_factor: f64,

    /// Price basis for the intraday monitor's VWAP.
    #[serde(default = "default_monitor_vwap_basis")]
    pub monitor_vwap_basis: PriceBasis,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            band_std: default_band_std(),
            band_window: default_band_window(),
            reversal_threshold_pct: default_reversal_threshold_pct(),
            pullback_threshold: default_pullback_threshold(),
            divergence_window: default_divergence_window(),
            divergence_tolerance_pct: default_divergence_tolerance_pct(),
            slope_window: default_slope_window(),
            volume_window: default_volume_window(),
            volume_multiplier: default_volume_multiplier(),
            stop_factor: default_stop_factor(),
            monitor_vwap_basis: default_monitor_vwap_basis(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Monitor ------------------------------------------------------------

    /// Instruments printed by the intraday monitor, in display order.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,

    #[serde(default = "default_monitor_poll_secs")]
    pub monitor_poll_secs: u64,

    #[serde(default = "default_intraday_range")]
    pub intraday_range: String,

    #[serde(default = "default_intraday_interval")]
    pub intraday_interval: String,

    // --- Analyzer -----------------------------------------------------------

    #[serde(default = "default_history_range")]
    pub history_range: String,

    #[serde(default = "default_history_interval")]
    pub history_interval: String,

    // --- Sentiment ----------------------------------------------------------

    #[serde(default = "default_sentiment_poll_secs")]
    pub sentiment_poll_secs: u64,

    #[serde(default = "default_sentiment_url")]
    pub sentiment_url: String,

    // --- Endpoints ----------------------------------------------------------

    /// Base URL of the chart API (scheme + host, no trailing slash).
    #[serde(default = "default_chart_base_url")]
    pub chart_base_url: String,

    /// User-Agent sent with every HTTP request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // --- Indicators ---------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            monitor_poll_secs: default_monitor_poll_secs(),
            intraday_range: default_intraday_range(),
            intraday_interval: default_intraday_interval(),
            history_range: default_history_range(),
            history_interval: default_history_interval(),
            sentiment_poll_secs: default_sentiment_poll_secs(),
            sentiment_url: default_sentiment_url(),
            chart_base_url: default_chart_base_url(),
            user_agent: default_user_agent(),
            indicators: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            instruments = config.instruments.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// unreadable, then apply environment overrides.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let mut config = Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        });
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `VWAP_SCOPE_*` overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(list) = lookup("VWAP_SCOPE_INSTRUMENTS") {
            let parsed: Result<Vec<Instrument>> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<Instrument>)
                .collect();
            match parsed {
                Ok(instruments) if !instruments.is_empty() => {
                    info!(count = instruments.len(), "instruments overridden from env");
                    self.instruments = instruments;
                }
                Ok(_) => warn!("VWAP_SCOPE_INSTRUMENTS is empty, keeping configured list"),
                Err(e) => warn!(error = %e, "ignoring invalid VWAP_SCOPE_INSTRUMENTS"),
            }
        }

        if let Some(url) = lookup("VWAP_SCOPE_CHART_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.is_empty() {
                self.chart_base_url = url;
            }
        }
    }
}
