use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar for one sampled interval.
///
/// Bars are produced by a market-data client and handed to the indicator
/// engine as an oldest-first slice. Nothing downstream mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// `(high + low + close) / 3`.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True when every price and the volume are finite and the volume is not
    /// negative.
    pub fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
            && self.volume >= 0.0
    }
}

/// Extract the close prices of `bars` (oldest-first).
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Extract the volumes of `bars` (oldest-first).
pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(close: f64, volume: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        Bar::new(ts, close, close + 1.0, close - 1.0, close, volume)
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let bar = sample(9.0, 100.0);
        assert!((bar.typical_price() - 9.0).abs() < 1e-12);

        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        let skewed = Bar::new(ts, 1.0, 12.0, 6.0, 9.0, 1.0);
        assert!((skewed.typical_price() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn well_formed_rejects_nan_and_negative_volume() {
        assert!(sample(10.0, 5.0).is_well_formed());
        assert!(!sample(f64::NAN, 5.0).is_well_formed());
        assert!(!sample(10.0, -1.0).is_well_formed());
    }

    #[test]
    fn column_extractors_keep_order() {
        let bars = vec![sample(1.0, 10.0), sample(2.0, 20.0), sample(3.0, 30.0)];
        assert_eq!(closes(&bars), vec![1.0, 2.0, 3.0]);
        assert_eq!(volumes(&bars), vec![10.0, 20.0, 30.0]);
    }
}
