// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// Step 1: Price changes (deltas) between consecutive closes.
// Step 2: Split each delta into gain (positive part) and loss (negated
//         negative part).
// Step 3: Simple rolling mean of gains and losses over the last `period`
//         deltas.
// Step 4: RS  = mean_gain / mean_loss
//         RSI = 100 - 100 / (1 + RS)
//
// Output is aligned with the input bars. Bar 0 has no delta, so the first
// defined value sits at index `period`.
// =============================================================================

use crate::market_data::Bar;

/// Compute the RSI series for `bars`, one entry per bar.
///
/// # Edge cases
/// - `period == 0` => every position is `None`
/// - indices `< period` => `None` (window not yet full)
/// - mean loss of zero with gains => 100.0
/// - flat window (no gains, no losses) => 50.0
/// - a window touching a non-finite close => `None`
pub fn rsi(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    // deltas[k] = close[k + 1] - close[k]
    let deltas: Vec<f64> = bars.windows(2).map(|w| w[1].close - w[0].close).collect();
    let period_f = period as f64;

    for (i, slot) in out.iter_mut().enumerate().skip(period) {
        let window = &deltas[i - period..i];
        if window.iter().any(|d| !d.is_finite()) {
            continue;
        }
        let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });
        *slot = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert mean gain / mean loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
