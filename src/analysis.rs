// =============================================================================
// VWAP Analysis
// =============================================================================
//
// Bundles indicator-engine output for the two consumers:
//
//   VwapReport          full derived series + signal sets for one ticker's
//                       history (the interactive analyzer)
//   InstrumentSnapshot  last-bar statistics for one instrument (the intraday
//                       monitor)
//
// Both are rebuilt from scratch on every call.

use tracing::debug;

use crate::indicators::{self, signals, VwapBands};
use crate::market_data::Bar;
use crate::runtime_config::IndicatorParams;

/// Every derived output of the analyzer for one bar history.
#[derive(Debug, Clone)]
pub struct VwapReport {
    pub vwap: Vec<Option<f64>>,
    pub breakout: Vec<usize>,
    pub reversal: Vec<usize>,
    pub pullback: Vec<usize>,
    /// Volume-dispersion bands around VWAP.
    pub bands: VwapBands,
    pub divergence: Vec<usize>,
    pub slope: Vec<usize>,
    pub support: Vec<usize>,
    pub resistance: Vec<usize>,
    pub volume_confirmation: Vec<usize>,
    pub trailing_stop: Vec<Option<f64>>,
    pub crossover: Vec<usize>,
}

impl VwapReport {
    /// Run the engine over `bars` (one VWAP accumulation period).
    ///
    /// Returns `None` when `bars` is empty.
    pub fn build(bars: &[Bar], params: &IndicatorParams) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }

        let vwap = indicators::vwap(bars);

        let report = Self {
            breakout: signals::breakout(bars, &vwap),
            reversal: signals::reversal(bars, &vwap, params.reversal_threshold_pct),
            pullback: signals::pullback(bars, &vwap, params.pullback_threshold),
            bands: indicators::vwap_volume_bands(bars, &vwap, params.band_std, params.band_window),
            divergence: signals::divergence(
                bars,
                &vwap,
                params.divergence_window,
                params.divergence_tolerance_pct,
            ),
            slope: signals::slope(&vwap, params.slope_window),
            support: signals::support(bars, &vwap),
            resistance: signals::resistance(bars, &vwap),
            volume_confirmation: signals::volume_confirmation(
                bars,
                params.volume_multiplier,
                params.volume_window,
            ),
            trailing_stop: signals::trailing_stop(&vwap, params.stop_factor),
            crossover: signals::crossover(bars, &vwap),
            vwap,
        };

        debug!(
            bars = bars.len(),
            breakouts = report.breakout.len(),
            crossovers = report.crossover.len(),
            divergences = report.divergence.len(),
            "VWAP report built"
        );

        Some(report)
    }

    /// VWAP at the last bar.
    pub fn latest_vwap(&self) -> Option<f64> {
        self.vwap.last().copied().flatten()
    }
}

/// Last-bar statistics for one instrument.
#[derive(Debug, Clone)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub price: f64,
    pub vwap: Option<f64>,
    pub rsi: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub distance_pct: Option<f64>,
}

impl InstrumentSnapshot {
    /// Summarise the last bar of `bars` (one session of intraday bars).
    ///
    /// Returns `None` when `bars` is empty. Individual statistics that are
    /// undefined at the last bar (short history, zero VWAP) are `None`.
    pub fn from_bars(symbol: &str, bars: &[Bar], params: &IndicatorParams) -> Option<Self> {
        let last = bars.last()?;

        let vwap_series = indicators::vwap_with_basis(bars, params.monitor_vwap_basis);
        let vwap = vwap_series.last().copied().flatten();
        let rsi = indicators::rsi(bars, params.rsi_period)
            .last()
            .copied()
            .flatten();
        let bands =
            indicators::vwap_price_bands(bars, &vwap_series, params.band_std, params.band_window);
        let (upper_band, lower_band) = match bands.latest() {
            Some((u, l)) => (Some(u), Some(l)),
            None => (None, None),
        };
        let distance_pct = vwap.and_then(|v| indicators::percentage_distance(last.close, v));

        debug!(
            symbol,
            price = last.close,
            vwap = ?vwap,
            rsi = ?rsi,
            "snapshot computed"
        );

        Some(Self {
            symbol: symbol.to_string(),
            price: last.close,
            vwap,
            rsi,
            upper_band,
            lower_band,
            distance_pct,
        })
    }
}
