// =============================================================================
// VWAP Signal Predicates
// =============================================================================
//
// Each predicate scans a bar slice together with its VWAP series and returns
// the ascending indices where the condition holds. Positions where the VWAP
// (or any other input the predicate needs) is undefined never fire.
//
// The predicates are independent of each other; every one of them only needs
// the bars and the VWAP line.
// =============================================================================

use super::rolling::rolling_mean;
use super::vwap::percentage_distance;
use crate::market_data::bar::volumes;
use crate::market_data::Bar;

/// Indices where `close > vwap`.
pub fn breakout(bars: &[Bar], vwap: &[Option<f64>]) -> Vec<usize> {
    select(bars, vwap, |bar, v| bar.close > v)
}

/// Indices where the close sits more than `threshold_pct` percent away from
/// the VWAP, in either direction.
pub fn reversal(bars: &[Bar], vwap: &[Option<f64>], threshold_pct: f64) -> Vec<usize> {
    select(bars, vwap, |bar, v| {
        percentage_distance(bar.close, v).is_some_and(|d| d.abs() > threshold_pct)
    })
}

/// Indices where the close is below the VWAP while the low stayed within
/// `threshold` (a fraction, e.g. `0.02`) of it.
pub fn pullback(bars: &[Bar], vwap: &[Option<f64>], threshold: f64) -> Vec<usize> {
    select(bars, vwap, |bar, v| {
        bar.close < v && bar.low > v * (1.0 - threshold)
    })
}

/// Indices where price momentum and VWAP momentum over `window` bars disagree.
///
/// Momentum is the percent change versus `window` bars earlier. The two
/// disagree when they point in strictly opposite directions, or when their
/// absolute gap exceeds `tolerance_pct` percentage points.
pub fn divergence(
    bars: &[Bar],
    vwap: &[Option<f64>],
    window: usize,
    tolerance_pct: f64,
) -> Vec<usize> {
    if window == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for i in window..bars.len().min(vwap.len()) {
        let price_mom = momentum(bars[i - window].close, bars[i].close);
        let vwap_mom = match (vwap[i - window], vwap[i]) {
            (Some(prev), Some(curr)) => momentum(prev, curr),
            _ => None,
        };
        let (Some(p), Some(v)) = (price_mom, vwap_mom) else {
            continue;
        };

        let opposite = (p > 0.0 && v < 0.0) || (p < 0.0 && v > 0.0);
        if opposite || (p - v).abs() > tolerance_pct {
            out.push(i);
        }
    }
    out
}

/// Indices where the VWAP is higher than it was `window` bars earlier.
pub fn slope(vwap: &[Option<f64>], window: usize) -> Vec<usize> {
    if window == 0 {
        return Vec::new();
    }
    (window..vwap.len())
        .filter(|&i| {
            matches!(
                (vwap[i - window], vwap[i]),
                (Some(prev), Some(curr)) if curr - prev > 0.0
            )
        })
        .collect()
}

/// VWAP acting as support: the low reached the VWAP but the close held above.
pub fn support(bars: &[Bar], vwap: &[Option<f64>]) -> Vec<usize> {
    select(bars, vwap, |bar, v| bar.low <= v && bar.close > v)
}

/// VWAP acting as resistance: the high reached the VWAP but the close was
/// rejected below it.
pub fn resistance(bars: &[Bar], vwap: &[Option<f64>]) -> Vec<usize> {
    select(bars, vwap, |bar, v| bar.high >= v && bar.close < v)
}

/// Indices where volume exceeds `multiplier` times its trailing `window` mean.
///
/// The mean includes the current bar. Bars before the first full window never
/// fire.
pub fn volume_confirmation(bars: &[Bar], multiplier: f64, window: usize) -> Vec<usize> {
    rolling_mean(&volumes(bars), window)
        .iter()
        .enumerate()
        .filter_map(|(i, mean)| match mean {
            Some(m) if bars[i].volume > multiplier * m => Some(i),
            _ => None,
        })
        .collect()
}

/// Stop level `vwap * stop_factor` at every bar.
pub fn trailing_stop(vwap: &[Option<f64>], stop_factor: f64) -> Vec<Option<f64>> {
    vwap.iter().map(|v| v.map(|v| v * stop_factor)).collect()
}

/// Indices where the close moves from at-or-below the VWAP on the previous bar
/// to strictly above it on this bar.
pub fn crossover(bars: &[Bar], vwap: &[Option<f64>]) -> Vec<usize> {
    let n = bars.len().min(vwap.len());
    (1..n)
        .filter(|&i| match (vwap[i - 1], vwap[i]) {
            (Some(prev), Some(curr)) => bars[i - 1].close <= prev && bars[i].close > curr,
            _ => false,
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

fn select<F>(bars: &[Bar], vwap: &[Option<f64>], pred: F) -> Vec<usize>
where
    F: Fn(&Bar, f64) -> bool,
{
    bars.iter()
        .zip(vwap)
        .enumerate()
        .filter_map(|(i, (bar, v))| match v {
            Some(v) if pred(bar, *v) => Some(i),
            _ => None,
        })
        .collect()
}

/// Percent change from `prev` to `curr`; `None` when `prev` is zero.
fn momentum(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }
    let m = (curr / prev - 1.0) * 100.0;
    m.is_finite().then_some(m)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::vwap::vwap;
    use chrono::{Duration, TimeZone, Utc};

    fn bar(h: f64, l: f64, c: f64, v: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        Bar::new(ts, c, h, l, c, v)
    }

    /// Bars with a hand-picked VWAP so each predicate can be checked in
    /// isolation.
    fn fixed(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(h, l, c))| Bar::new(start + Duration::days(i as i64), c, h, l, c, 1.0))
            .collect()
    }

    #[test]
    fn two_bar_breakout_example() {
        let bars = vec![bar(10.0, 8.0, 9.0, 100.0), bar(11.0, 9.0, 10.0, 200.0)];
        let v = vwap(&bars);
        assert_eq!(breakout(&bars, &v), vec![1]);
    }

    #[test]
    fn breakout_skips_undefined_vwap() {
        let bars = vec![bar(10.0, 8.0, 9.0, 1.0), bar(10.0, 8.0, 9.5, 1.0)];
        assert!(breakout(&bars, &[None, None]).is_empty());
    }

    #[test]
    fn reversal_flags_large_deviation() {
        let bars = fixed(&[(103.0, 97.0, 101.5), (104.0, 96.0, 97.0), (101.0, 99.0, 100.5)]);
        let v = vec![Some(100.0); 3];
        // +1.5% and +0.5% stay inside the band, -3% does not
        assert_eq!(reversal(&bars, &v, 2.0), vec![1]);
        assert!(reversal(&bars, &[Some(0.0); 3], 2.0).is_empty());
    }

    #[test]
    fn pullback_requires_close_below_and_shallow_low() {
        let bars = fixed(&[
            (101.0, 99.0, 99.5), // close below, low within 2%
            (101.0, 97.0, 99.5), // low too deep
            (102.0, 99.0, 101.0), // close above
        ]);
        let v = vec![Some(100.0); 3];
        assert_eq!(pullback(&bars, &v, 0.02), vec![0]);
    }

    #[test]
    fn divergence_flags_direction_mismatch() {
        // price falls while vwap rises
        let bars = fixed(&[(11.0, 9.0, 10.0), (10.0, 9.0, 9.5), (10.0, 8.0, 9.0)]);
        let v = vec![Some(10.0), Some(10.05), Some(10.1)];
        assert_eq!(divergence(&bars, &v, 2, 100.0), vec![2]);
    }

    #[test]
    fn divergence_flags_magnitude_gap_only_above_tolerance() {
        let bars = fixed(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0)]);
        // price +10%, vwap +1% => gap 9 points
        let v = vec![Some(10.0), Some(10.1)];
        assert_eq!(divergence(&bars, &v, 1, 1.0), vec![1]);
        assert!(divergence(&bars, &v, 1, 10.0).is_empty());
    }

    #[test]
    fn divergence_ignores_identical_momentum() {
        let bars = fixed(&[(11.0, 9.0, 10.0), (12.0, 10.0, 11.0)]);
        let v = vec![Some(10.0), Some(11.0)];
        assert!(divergence(&bars, &v, 1, 1e-9).is_empty());
        assert!(divergence(&bars, &v, 0, 1.0).is_empty());
    }

    #[test]
    fn slope_detects_rising_vwap() {
        let v = vec![Some(1.0), Some(2.0), Some(1.5), Some(3.0), None];
        assert_eq!(slope(&v, 1), vec![1, 3]);
        assert_eq!(slope(&v, 2), vec![2, 3]);
        assert!(slope(&v, 0).is_empty());
    }

    #[test]
    fn support_and_resistance() {
        let bars = fixed(&[
            (102.0, 99.0, 101.0), // dipped through, held above => support
            (101.0, 98.0, 99.0),  // poked through, closed below => resistance
            (103.0, 101.0, 102.0), // never touched
        ]);
        let v = vec![Some(100.0); 3];
        assert_eq!(support(&bars, &v), vec![0]);
        assert_eq!(resistance(&bars, &v), vec![1]);
    }

    #[test]
    fn volume_confirmation_needs_full_window() {
        let bars = vec![
            bar(1.0, 1.0, 1.0, 100.0),
            bar(1.0, 1.0, 1.0, 100.0),
            bar(1.0, 1.0, 1.0, 400.0),
            bar(1.0, 1.0, 1.0, 100.0),
        ];
        // window 3 means at idx 2 = 200 => 400 > 300
        assert_eq!(volume_confirmation(&bars, 1.5, 3), vec![2]);
        assert!(volume_confirmation(&bars, 1.5, 10).is_empty());
    }

    #[test]
    fn trailing_stop_scales_vwap() {
        let stops = trailing_stop(&[Some(100.0), None], 0.98);
        assert!((stops[0].unwrap() - 98.0).abs() < 1e-12);
        assert_eq!(stops[1], None);
    }

    #[test]
    fn crossover_fires_on_transition_only() {
        let bars = fixed(&[
            (10.0, 9.0, 9.0),   // below
            (11.0, 9.0, 10.0),  // tie
            (12.0, 10.0, 11.0), // above after tie => cross
            (13.0, 11.0, 12.0), // still above, no cross
            (10.0, 8.0, 9.0),   // back below
            (12.0, 9.0, 11.0),  // above again => cross
        ]);
        let v = vec![Some(10.0); 6];
        assert_eq!(crossover(&bars, &v), vec![2, 5]);
    }

    #[test]
    fn empty_inputs_give_empty_sets() {
        assert!(breakout(&[], &[]).is_empty());
        assert!(crossover(&[], &[]).is_empty());
        assert!(divergence(&[], &[], 14, 1.0).is_empty());
        assert!(volume_confirmation(&[], 1.5, 20).is_empty());
        assert!(trailing_stop(&[], 0.98).is_empty());
    }
}
