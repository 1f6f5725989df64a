// =============================================================================
// VWAP Scope — Main Entry Point
// =============================================================================
//
// Three console tools over one indicator engine:
//   sentiment  Fear & Greed index, polled every 20 minutes
//   analyze    one year of daily bars per ticker, full VWAP signal report
//   monitor    intraday VWAP / RSI / band line per instrument every 5 s
//
// Logs go to stderr so stdout stays a clean, redrawn console.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod cli;
mod commands;
mod display;
mod indicators;
mod market_data;
mod runtime_config;
mod types;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RuntimeConfig::load_or_default(&cli.config);

    info!(
        config = %cli.config,
        instruments = config.instruments.len(),
        "VWAP Scope starting"
    );

    // ── 2. Dispatch ──────────────────────────────────────────────────────
    match cli.command {
        Commands::Sentiment => commands::sentiment::run(&config).await,
        Commands::Analyze { ticker, rows } => commands::analyze::run(&config, ticker, rows).await,
        Commands::Monitor { once } => commands::monitor::run(&config, once).await,
    }
}
