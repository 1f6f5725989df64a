// =============================================================================
// Shared types used across vwap-scope
// =============================================================================

use std::str::FromStr;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// What kind of contract a monitored symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentKind {
    Stock,
    Index,
    Future,
}

impl Default for InstrumentKind {
    fn default() -> Self {
        Self::Stock
    }
}

impl FromStr for InstrumentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STOCK" => Ok(Self::Stock),
            "INDEX" => Ok(Self::Index),
            "FUTURE" => Ok(Self::Future),
            other => bail!("unknown instrument kind '{other}'"),
        }
    }
}

/// A symbol watched by the intraday monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    #[serde(default)]
    pub kind: InstrumentKind,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
        }
    }

    /// Symbol as understood by the chart API: indices are prefixed with `^`,
    /// continuous futures are suffixed with `=F`.
    pub fn chart_symbol(&self) -> String {
        match self.kind {
            InstrumentKind::Stock => self.symbol.clone(),
            InstrumentKind::Index => format!("^{}", self.symbol),
            InstrumentKind::Future => format!("{}=F", self.symbol),
        }
    }
}

impl FromStr for Instrument {
    type Err = anyhow::Error;

    /// Parse `SYMBOL` or `SYMBOL:KIND` (e.g. `VIX:INDEX`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (symbol, kind) = match s.split_once(':') {
            Some((sym, kind)) => (
                sym,
                kind.parse::<InstrumentKind>()
                    .with_context(|| format!("invalid instrument '{s}'"))?,
            ),
            None => (s, InstrumentKind::Stock),
        };
        if symbol.is_empty() {
            bail!("empty symbol in instrument '{s}'");
        }
        Ok(Self::new(symbol.to_uppercase(), kind))
    }
}

/// Rating bucket published with the Fear & Greed index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentRating {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentRating {
    /// Parse the lowercase label used by the index feed ("extreme fear", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "extreme fear" => Some(Self::ExtremeFear),
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            "extreme greed" => Some(Self::ExtremeGreed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtremeFear => write!(f, "extreme fear"),
            Self::Fear => write!(f, "fear"),
            Self::Neutral => write!(f, "neutral"),
            Self::Greed => write!(f, "greed"),
            Self::ExtremeGreed => write!(f, "extreme greed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_symbol_mapping() {
        assert_eq!(Instrument::new("SPY", InstrumentKind::Stock).chart_symbol(), "SPY");
        assert_eq!(Instrument::new("VIX", InstrumentKind::Index).chart_symbol(), "^VIX");
        assert_eq!(Instrument::new("ES", InstrumentKind::Future).chart_symbol(), "ES=F");
    }

    #[test]
    fn parse_instrument_strings() {
        let i: Instrument = "vix:index".parse().unwrap();
        assert_eq!(i, Instrument::new("VIX", InstrumentKind::Index));

        let plain: Instrument = " nvda ".parse().unwrap();
        assert_eq!(plain.kind, InstrumentKind::Stock);
        assert_eq!(plain.symbol, "NVDA");

        assert!("SPY:BOND".parse::<Instrument>().is_err());
        assert!(":INDEX".parse::<Instrument>().is_err());
    }

    #[test]
    fn instrument_kind_serde_is_uppercase() {
        let json = serde_json::to_string(&InstrumentKind::Future).unwrap();
        assert_eq!(json, "\"FUTURE\"");
        let i: Instrument = serde_json::from_str(r#"{ "symbol": "QQQ" }"#).unwrap();
        assert_eq!(i.kind, InstrumentKind::Stock);
    }

    #[test]
    fn sentiment_rating_labels() {
        assert_eq!(
            SentimentRating::from_label("Extreme Greed"),
            Some(SentimentRating::ExtremeGreed)
        );
        assert_eq!(SentimentRating::from_label("fear"), Some(SentimentRating::Fear));
        assert_eq!(SentimentRating::from_label("panic"), None);
        assert_eq!(SentimentRating::Neutral.to_string(), "neutral");
    }
}
