// =============================================================================
// VWAP Deviation Bands
// =============================================================================
//
// Two band families are centred on the VWAP line and answer different
// questions, so they stay separate operations:
//
//   price bands   upper/lower = VWAP ± k * σ(close, window)
//   volume bands  upper/lower = VWAP ± k * σ(volume, window) / μ(volume, window)
//
// Price bands measure price dispersion in price units. Volume bands offset
// the VWAP by the coefficient of variation of volume, a unitless measure of
// how erratic participation has been.
// =============================================================================

use super::rolling::{rolling_mean, rolling_std};
use crate::market_data::bar::{closes, volumes};
use crate::market_data::Bar;

/// Upper and lower band series, both aligned with the input bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VwapBands {
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl VwapBands {
    /// Upper and lower value at the last bar, when both are defined.
    pub fn latest(&self) -> Option<(f64, f64)> {
        let upper = self.upper.last().copied().flatten()?;
        let lower = self.lower.last().copied().flatten()?;
        Some((upper, lower))
    }
}

/// VWAP ± `num_std` rolling sample standard deviations of the close.
///
/// A position is `None` when the VWAP or the rolling deviation is undefined
/// there (including the first `window - 1` bars).
pub fn vwap_price_bands(
    bars: &[Bar],
    vwap: &[Option<f64>],
    num_std: f64,
    window: usize,
) -> VwapBands {
    let std = rolling_std(&closes(bars), window);
    build_bands(vwap, &std, num_std)
}

/// VWAP ± `num_std` times the rolling coefficient of variation of volume.
///
/// A position is `None` when the VWAP is undefined, the window is not yet
/// full, or the rolling mean volume is zero.
pub fn vwap_volume_bands(
    bars: &[Bar],
    vwap: &[Option<f64>],
    num_std: f64,
    window: usize,
) -> VwapBands {
    let vols = volumes(bars);
    let std = rolling_std(&vols, window);
    let mean = rolling_mean(&vols, window);

    let cv: Vec<Option<f64>> = std
        .iter()
        .zip(&mean)
        .map(|(s, m)| match (s, m) {
            (Some(s), Some(m)) if *m != 0.0 => Some(s / m),
            _ => None,
        })
        .collect();

    build_bands(vwap, &cv, num_std)
}

fn build_bands(vwap: &[Option<f64>], offset: &[Option<f64>], num_std: f64) -> VwapBands {
    let (upper, lower) = vwap
        .iter()
        .zip(offset)
        .map(|(v, o)| match (v, o) {
            (Some(v), Some(o)) => (Some(v + num_std * o), Some(v - num_std * o)),
            _ => (None, None),
        })
        .unzip();

    VwapBands { upper, lower }
}
