pub mod bar;
pub mod chart;
pub mod sentiment;

use std::time::Duration;

use anyhow::{Context, Result};

// Re-export the Bar struct for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::Bar;
pub use chart::ChartClient;
pub use sentiment::{SentimentClient, SentimentReading};

/// Shared reqwest client settings: fixed User-Agent and a 10 s timeout.
pub(crate) fn http_client(user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")
}
