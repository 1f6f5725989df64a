use std::future::Future;

use anyhow::Result;
use tracing::{info, warn};

use crate::analysis::InstrumentSnapshot;
use crate::display;
use crate::market_data::ChartClient;
use crate::runtime_config::RuntimeConfig;

/// Print one statistics line per configured instrument every
/// `monitor_poll_secs`, until Ctrl+C (or after one cycle with `once`).
pub async fn run(config: &RuntimeConfig, once: bool) -> Result<()> {
    let client = ChartClient::new(&config.chart_base_url, &config.user_agent)?;

    info!(
        instruments = ?config.instruments.iter().map(|i| i.symbol.as_str()).collect::<Vec<_>>(),
        every_secs = config.monitor_poll_secs,
        "intraday monitor started"
    );

    if once {
        print!("{}", render_cycle(&client, config).await);
        return Ok(());
    }

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    poll_loop(&client, config, shutdown).await;
    Ok(())
}

/// Redraw the frame every `monitor_poll_secs` until `shutdown` resolves.
///
/// `shutdown` is raced against the whole cycle, fetches included.
pub(crate) async fn poll_loop<F>(client: &ChartClient, config: &RuntimeConfig, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = super::poll_interval(config.monitor_poll_secs);

    loop {
        let cycle = async {
            interval.tick().await;
            render_cycle(client, config).await
        };
        tokio::select! {
            frame = cycle => {
                display::clear_screen();
                print!("{frame}");
            }
            _ = &mut shutdown => {
                warn!("Shutdown signal received — stopping monitor");
                return;
            }
        }
    }
}

/// Fetch every instrument in order and render the whole frame.
///
/// One instrument failing only replaces its own line.
pub(crate) async fn render_cycle(client: &ChartClient, config: &RuntimeConfig) -> String {
    let time = chrono::Local::now().format("%H:%M:%S").to_string();
    let params = &config.indicators;
    let mut frame = String::new();

    for instrument in &config.instruments {
        let chart_symbol = instrument.chart_symbol();
        let line = match client
            .get_bars(&chart_symbol, &config.intraday_range, &config.intraday_interval)
            .await
        {
            Ok(bars) => match InstrumentSnapshot::from_bars(&instrument.symbol, &bars, params) {
                Some(snap) => display::render_snapshot_line(&snap, &time, params.rsi_period),
                None => {
                    warn!(symbol = %instrument.symbol, "no intraday bars returned");
                    display::render_unavailable_line(&instrument.symbol, &time, "no data returned")
                }
            },
            Err(e) => {
                warn!(symbol = %instrument.symbol, error = %e, "intraday fetch failed");
                display::render_unavailable_line(&instrument.symbol, &time, &format!("{e:#}"))
            }
        };
        frame.push_str(&line);
        frame.push('\n');
    }

    frame
}
