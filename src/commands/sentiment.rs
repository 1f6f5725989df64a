use std::future::Future;

use anyhow::Result;
use tracing::{info, warn};

use crate::display;
use crate::market_data::SentimentClient;
use crate::runtime_config::RuntimeConfig;

/// Poll the Fear & Greed index every `sentiment_poll_secs` until Ctrl+C.
pub async fn run(config: &RuntimeConfig) -> Result<()> {
    let client = SentimentClient::new(&config.sentiment_url, &config.user_agent)?;
    info!(every_secs = config.sentiment_poll_secs, "sentiment polling started");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    poll_loop(&client, config.sentiment_poll_secs, shutdown).await;
    Ok(())
}

/// Poll every `every_secs` until `shutdown` resolves, even mid-fetch.
pub(crate) async fn poll_loop<F>(client: &SentimentClient, every_secs: u64, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = super::poll_interval(every_secs);

    loop {
        let cycle = async {
            interval.tick().await;
            poll_once(client).await
        };
        tokio::select! {
            out = cycle => {
                if out.ok {
                    display::clear_screen();
                }
                print!("{}", out.body);
            }
            _ = &mut shutdown => {
                warn!("Shutdown signal received — stopping sentiment polling");
                return;
            }
        }
    }
}

/// Output of one poll: whether the fetch succeeded and what to print.
pub(crate) struct PollOutput {
    pub ok: bool,
    pub body: String,
}

pub(crate) async fn poll_once(client: &SentimentClient) -> PollOutput {
    match client.fetch().await {
        Ok(reading) => {
            info!(score = reading.score, rating = %reading.rating, "fear & greed updated");
            PollOutput {
                ok: true,
                body: display::render_sentiment(&reading),
            }
        }
        Err(e) => {
            warn!(error = %e, "fear & greed fetch failed");
            PollOutput {
                ok: false,
                body: format!("Error fetching or parsing the data: {e:#}\n"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn poll_once_renders_reading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fear_and_greed": { "score": 55.5, "rating": "neutral" }
            })))
            .mount(&server)
            .await;

        let client = SentimentClient::new(server.uri(), "ua").unwrap();
        let out = poll_once(&client).await;
        assert!(out.ok);
        assert!(out.body.contains("55.50"));
        assert!(out.body.contains("neutral"));
    }

    #[tokio::test]
    async fn poll_once_reports_missing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "other": 1 })))
            .mount(&server)
            .await;

        let client = SentimentClient::new(server.uri(), "ua").unwrap();
        let out = poll_once(&client).await;
        assert!(!out.ok);
        assert!(out.body.contains("unable to find fear score"));
    }

    #[tokio::test]
    async fn poll_loop_stops_on_shutdown_during_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "fear_and_greed": { "score": 40.0, "rating": "fear" }
                    }))
                    .set_delay(Duration::from_secs(8)),
            )
            .mount(&server)
            .await;

        let client = SentimentClient::new(server.uri(), "ua").unwrap();
        let shutdown = tokio::time::sleep(Duration::from_millis(100));

        let finished =
            tokio::time::timeout(Duration::from_secs(2), poll_loop(&client, 1200, shutdown)).await;
        assert!(finished.is_ok());
    }
}
