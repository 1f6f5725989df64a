// =============================================================================
// Fear & Greed Index Client
// =============================================================================
//
// The graph-data endpoint returns a large JSON document; only the current
// reading under `fear_and_greed` is used:
//
//   { "fear_and_greed": { "score": 43.2, "rating": "fear", ... }, ... }
//
// The endpoint rejects requests without a browser-like User-Agent.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::types::SentimentRating;

/// Current index value and its rating bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    pub score: f64,
    pub rating: SentimentRating,
}

/// HTTP client for the sentiment index.
#[derive(Clone)]
pub struct SentimentClient {
    url: String,
    client: reqwest::Client,
}

impl SentimentClient {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: super::http_client(user_agent)?,
        })
    }

    /// GET the graph-data document and extract the current reading.
    #[instrument(skip(self), name = "sentiment::fetch")]
    pub async fn fetch(&self) -> Result<SentimentReading> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("GET fear & greed request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("fear & greed endpoint returned {}: {}", status, body);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse fear & greed response")?;

        let reading = parse_reading(&body)?;
        debug!(score = reading.score, rating = %reading.rating, "sentiment fetched");
        Ok(reading)
    }
}

impl std::fmt::Debug for SentimentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClient")
            .field("url", &self.url)
            .finish()
    }
}

/// Extract `fear_and_greed.score` and `fear_and_greed.rating`.
pub fn parse_reading(body: &serde_json::Value) -> Result<SentimentReading> {
    let fg = &body["fear_and_greed"];

    let score = fg["score"]
        .as_f64()
        .context("unable to find fear score in the data")?;
    let label = fg["rating"]
        .as_str()
        .context("unable to find rating in the data")?;
    let rating = SentimentRating::from_label(label)
        .with_context(|| format!("unknown fear & greed rating '{label}'"))?;

    Ok(SentimentReading { score, rating })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parse_reading_ok() {
        let body = json!({
            "fear_and_greed": { "score": 27.4285714, "rating": "fear", "timestamp": "2024-08-05T23:59:57+00:00" },
            "fear_and_greed_historical": { "data": [] }
        });
        let r = parse_reading(&body).unwrap();
        assert!((r.score - 27.4285714).abs() < 1e-9);
        assert_eq!(r.rating, SentimentRating::Fear);
    }

    #[test]
    fn parse_reading_missing_fields() {
        assert!(parse_reading(&json!({})).is_err());
        assert!(parse_reading(&json!({ "fear_and_greed": { "score": 50.0 } })).is_err());
        assert!(parse_reading(&json!({ "fear_and_greed": { "rating": "greed" } })).is_err());
    }

    #[test]
    fn parse_reading_unknown_rating() {
        let body = json!({ "fear_and_greed": { "score": 50.0, "rating": "euphoria" } });
        let err = parse_reading(&body).unwrap_err();
        assert!(err.to_string().contains("euphoria"));
    }

    #[tokio::test]
    async fn fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "agent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fear_and_greed": { "score": 81.0, "rating": "extreme greed" }
            })))
            .mount(&server)
            .await;

        let client = SentimentClient::new(server.uri(), "agent/1.0").unwrap();
        let reading = client.fetch().await.unwrap();
        assert_eq!(reading.rating, SentimentRating::ExtremeGreed);
    }

    #[tokio::test]
    async fn fetch_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(418))
            .mount(&server)
            .await;

        let client = SentimentClient::new(server.uri(), "agent/1.0").unwrap();
        assert!(client.fetch().await.is_err());
    }
}
