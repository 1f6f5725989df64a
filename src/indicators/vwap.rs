// =============================================================================
// Volume-Weighted Average Price (VWAP)
// =============================================================================
//
// Cumulative volume-weighted mean price from the first bar of the supplied
// window:
//
//   VWAP_i = Σ_{j<=i}(volume_j * price_j) / Σ_{j<=i} volume_j
//
// `price_j` is the typical price (H + L + C) / 3 by default. The engine has
// no notion of a session boundary; callers pass exactly the bars of one
// accumulation period.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::Bar;

/// Per-bar price that VWAP weights by volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// `(high + low + close) / 3`
    #[default]
    Typical,
    /// `close`
    Close,
}

impl PriceBasis {
    fn price(self, bar: &Bar) -> f64 {
        match self {
            Self::Typical => bar.typical_price(),
            Self::Close => bar.close,
        }
    }
}

/// Typical-price VWAP, one value per bar.
///
/// A position is `None` while the cumulative volume is still zero.
pub fn vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    vwap_with_basis(bars, PriceBasis::Typical)
}

/// VWAP with a selectable price basis, one value per bar.
///
/// # Edge cases
/// - empty input => empty vec
/// - cumulative volume of zero (leading zero-volume bars) => `None`
/// - a non-finite running value => `None` at that position
pub fn vwap_with_basis(bars: &[Bar], basis: PriceBasis) -> Vec<Option<f64>> {
    let mut cum_pv = 0.0_f64;
    let mut cum_vol = 0.0_f64;

    bars.iter()
        .map(|bar| {
            cum_pv += bar.volume * basis.price(bar);
            cum_vol += bar.volume;
            if cum_vol == 0.0 {
                return None;
            }
            let value = cum_pv / cum_vol;
            value.is_finite().then_some(value)
        })
        .collect()
}

/// `(price - vwap) / vwap * 100`.
///
/// Returns `None` when `vwap` is zero or either input is non-finite.
pub fn percentage_distance(price: f64, vwap: f64) -> Option<f64> {
    if vwap == 0.0 || !vwap.is_finite() || !price.is_finite() {
        return None;
    }
    Some((price - vwap) / vwap * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(h: f64, l: f64, c: f64, v: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Bar::new(ts, c, h, l, c, v)
    }

    #[test]
    fn two_bar_example() {
        let bars = vec![bar(10.0, 8.0, 9.0, 100.0), bar(11.0, 9.0, 10.0, 200.0)];
        let v = vwap(&bars);
        assert_eq!(v.len(), 2);
        assert!((v[0].unwrap() - 9.0).abs() < 1e-12);
        assert!((v[1].unwrap() - 2900.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn single_bar_equals_typical_price() {
        let bars = vec![bar(12.0, 6.0, 9.0, 42.0)];
        assert!((vwap(&bars)[0].unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn close_basis_weights_closes() {
        let bars = vec![bar(20.0, 0.0, 10.0, 1.0), bar(20.0, 0.0, 20.0, 3.0)];
        let v = vwap_with_basis(&bars, PriceBasis::Close);
        assert!((v[1].unwrap() - 17.5).abs() < 1e-12);
    }

    #[test]
    fn leading_zero_volume_is_undefined() {
        let bars = vec![bar(10.0, 8.0, 9.0, 0.0), bar(10.0, 8.0, 9.0, 5.0)];
        let v = vwap(&bars);
        assert_eq!(v[0], None);
        assert!((v[1].unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input() {
        assert!(vwap(&[]).is_empty());
    }

    #[test]
    fn percentage_distance_values() {
        assert!((percentage_distance(102.0, 100.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((percentage_distance(95.0, 100.0).unwrap() + 5.0).abs() < 1e-12);
        assert_eq!(percentage_distance(10.0, 0.0), None);
        assert_eq!(percentage_distance(f64::NAN, 1.0), None);
    }
}
