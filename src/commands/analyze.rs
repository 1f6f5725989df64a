use std::future::Future;
use std::io::BufRead;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::analysis::VwapReport;
use crate::display;
use crate::market_data::ChartClient;
use crate::runtime_config::RuntimeConfig;

const FIRST_PROMPT: &str = "Enter a ticker symbol (e.g., AAPL): ";
const NEXT_PROMPT: &str = "\nEnter another ticker symbol or 'quit' to exit: ";

/// Analyze `ticker` once, or prompt for tickers until `quit` / end of input.
pub async fn run(config: &RuntimeConfig, ticker: Option<String>, rows: usize) -> Result<()> {
    let client = ChartClient::new(&config.chart_base_url, &config.user_agent)?;

    if let Some(ticker) = ticker {
        println!("{}", analyze_ticker(&client, config, &ticker, rows).await);
        return Ok(());
    }

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    prompt_loop(&client, config, rows, stdin_lines(), shutdown).await
}

/// Read stdin lines on a detached OS thread and forward them over a channel.
///
/// A pending read must not keep the runtime from shutting down on Ctrl+C.
/// The channel closes on EOF or a read error.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read ticker from stdin");
                    break;
                }
            }
        }
    });
    rx
}

/// Prompt until `quit`, a closed input channel, or `shutdown` resolving.
pub(crate) async fn prompt_loop<F>(
    client: &ChartClient,
    config: &RuntimeConfig,
    rows: usize,
    mut input: mpsc::Receiver<String>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stdout = tokio::io::stdout();
    let mut prompt = FIRST_PROMPT;

    loop {
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = input.recv() => line,
            _ = &mut shutdown => {
                warn!("Shutdown signal received — leaving analyzer");
                return Ok(());
            }
        };
        let Some(line) = line else {
            info!("input closed — leaving analyzer");
            return Ok(());
        };

        let ticker = line.trim();
        if ticker.is_empty() {
            continue;
        }
        if ticker.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        tokio::select! {
            text = analyze_ticker(client, config, ticker, rows) => println!("{text}"),
            _ = &mut shutdown => {
                warn!("Shutdown signal received — leaving analyzer");
                return Ok(());
            }
        }
        prompt = NEXT_PROMPT;
    }
}

/// Fetch the configured history window for `ticker` and render the report.
///
/// Fetch failures and empty histories become a message instead of an error
/// so the prompt loop can carry on with the next ticker.
pub(crate) async fn analyze_ticker(
    client: &ChartClient,
    config: &RuntimeConfig,
    ticker: &str,
    rows: usize,
) -> String {
    let ticker = ticker.to_uppercase();

    let bars = match client
        .get_bars(&ticker, &config.history_range, &config.history_interval)
        .await
    {
        Ok(bars) => bars,
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "history fetch failed");
            return format!("Failed to fetch history for {ticker}: {e:#}");
        }
    };

    match VwapReport::build(&bars, &config.indicators) {
        Some(report) => {
            info!(
                ticker = %ticker,
                bars = bars.len(),
                vwap = ?report.latest_vwap(),
                "history analysed"
            );
            display::render_report(&ticker, &bars, &report, rows)
        }
        None => "No data available for the provided ticker symbol.".to_string(),
    }
}
