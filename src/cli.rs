use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "VWAP / RSI market-data console tools")]
pub struct Cli {
    /// Path to the JSON runtime config
    #[arg(short, long, default_value = "vwap_scope.json")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Poll the Fear & Greed index and print it in color
    Sentiment,

    /// Download daily history for tickers and print the VWAP signal report
    Analyze {
        /// Analyze this ticker once and exit instead of prompting
        #[arg(short, long)]
        ticker: Option<String>,

        /// Rows shown in the band and trailing-stop tables
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Poll intraday bars for the configured instruments and print VWAP/RSI stats
    Monitor {
        /// Render a single cycle and exit
        #[arg(long)]
        once: bool,
    },
}
