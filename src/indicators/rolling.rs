// =============================================================================
// Rolling-window statistics
// =============================================================================
//
// Fixed-size trailing windows over a value series. Output is aligned with the
// input: position `i` covers `values[i + 1 - window ..= i]`, and positions
// before the first full window are `None`.
//
// Standard deviation uses the sample estimator (n - 1 denominator), so a
// window of one value has no defined deviation.
// =============================================================================

/// Trailing simple mean over `window` values.
///
/// # Edge cases
/// - `window == 0` => every position is `None`
/// - a window containing a non-finite value => `None` at that position
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_map(values, window, |w| Some(w.iter().sum::<f64>() / w.len() as f64))
}

/// Trailing sample standard deviation over `window` values.
///
/// # Edge cases
/// - `window < 2` => every position is `None`
/// - a window containing a non-finite value => `None` at that position
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling_map(values, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(var.sqrt())
    })
}

fn rolling_map<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            out.push(None);
            continue;
        }
        out.push(f(slice).filter(|v| v.is_finite()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_aligned_and_warms_up() {
        let m = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(m, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn mean_zero_window_is_undefined() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn std_uses_sample_denominator() {
        // 2, 4, 4, 4, 5, 5, 7, 9: sample variance = 32 / 7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = rolling_std(&v, 8);
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((s[7].unwrap() - expected).abs() < 1e-12);
        assert!(s[..7].iter().all(Option::is_none));
    }

    #[test]
    fn std_of_single_value_window_is_undefined() {
        assert!(rolling_std(&[1.0, 2.0, 3.0], 1).iter().all(Option::is_none));
    }

    #[test]
    fn nan_poisons_only_windows_that_contain_it() {
        let m = rolling_mean(&[1.0, f64::NAN, 3.0, 5.0], 2);
        assert_eq!(m[1], None);
        assert_eq!(m[2], None);
        assert_eq!(m[3], Some(4.0));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(rolling_mean(&[], 3).is_empty());
        assert!(rolling_std(&[], 3).is_empty());
    }
}
