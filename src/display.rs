// =============================================================================
// Console Rendering
// =============================================================================
//
// Formats analysis output for a terminal. Every `render_*` function returns a
// `String` so the layout can be unit-tested; the commands decide when to clear
// the screen and print.
// =============================================================================

use std::fmt::Write as _;
use std::io::Write as _;

use crate::analysis::{InstrumentSnapshot, VwapReport};
use crate::market_data::{Bar, SentimentReading};
use crate::types::SentimentRating;

pub const RED: &str = "\x1b[91m";
pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";
pub const BLUE: &str = "\x1b[94m";
pub const CYAN: &str = "\x1b[96m";
pub const RESET: &str = "\x1b[0m";

/// Full terminal reset (`ESC c`).
const CLEAR: &str = "\x1bc";

/// Most recent signal dates listed per section.
const MAX_LISTED: usize = 10;

/// Reset the terminal and move the cursor home.
pub fn clear_screen() {
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(CLEAR.as_bytes());
    let _ = out.flush();
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

fn rating_color(rating: SentimentRating) -> &'static str {
    match rating {
        SentimentRating::ExtremeFear => BLUE,
        SentimentRating::Fear => GREEN,
        SentimentRating::Neutral => CYAN,
        SentimentRating::Greed => YELLOW,
        SentimentRating::ExtremeGreed => RED,
    }
}

pub fn render_sentiment(reading: &SentimentReading) -> String {
    format!(
        "Fear and Greed Index:\nFear Score: {RED}{:.2}{RESET}\nRating: {}{}{RESET}\n",
        reading.score,
        rating_color(reading.rating),
        reading.rating,
    )
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// One monitor line, e.g.
/// `Symbol: SPY Time: 10:31:05 | Price: 512.10 | VWAP: 511.84 | RSI (9): 58.21 | ...`
pub fn render_snapshot_line(snap: &InstrumentSnapshot, time: &str, rsi_period: usize) -> String {
    let distance = snap
        .distance_pct
        .map_or_else(|| "n/a".to_string(), |d| format!("{d:.2}%"));
    format!(
        "Symbol: {} Time: {} | Price: {:.2} | VWAP: {} | RSI ({}): {} | Upper Band: {} | \
         Lower Band: {} | Percentage Distance: {}",
        snap.symbol,
        time,
        snap.price,
        fmt_opt(snap.vwap),
        rsi_period,
        fmt_opt(snap.rsi),
        fmt_opt(snap.upper_band),
        fmt_opt(snap.lower_band),
        distance,
    )
}

/// Line shown in place of a snapshot when the instrument could not be loaded.
pub fn render_unavailable_line(symbol: &str, time: &str, reason: &str) -> String {
    format!("Symbol: {symbol} Time: {time} | {RED}unavailable{RESET}: {reason}")
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

fn date(bar: &Bar) -> String {
    bar.timestamp.format("%Y-%m-%d").to_string()
}

/// `[2024-05-01, 2024-05-02] (2 total)`, keeping only the latest entries.
fn render_index_set(bars: &[Bar], indices: &[usize]) -> String {
    if indices.is_empty() {
        return "[] (0 total)".to_string();
    }
    let skip = indices.len().saturating_sub(MAX_LISTED);
    let dates: Vec<String> = indices[skip..]
        .iter()
        .filter_map(|&i| bars.get(i).map(date))
        .collect();
    let ellipsis = if skip > 0 { "..., " } else { "" };
    format!("[{}{}] ({} total)", ellipsis, dates.join(", "), indices.len())
}

/// Multi-section text report for one ticker. `tail_rows` bounds the band and
/// trailing-stop tables.
pub fn render_report(ticker: &str, bars: &[Bar], report: &VwapReport, tail_rows: usize) -> String {
    let mut out = String::new();
    let start = bars.len().saturating_sub(tail_rows);

    let _ = writeln!(out, "\nAnalysis Results for Ticker: {ticker}\n");

    let sections: [(&str, &[usize]); 3] = [
        ("VWAP Breakout Indices", &report.breakout),
        ("VWAP Reversal Indices", &report.reversal),
        ("VWAP Pullback Indices", &report.pullback),
    ];
    for (title, set) in sections {
        let _ = writeln!(out, "{title}:\n{}\n", render_index_set(bars, set));
    }

    let _ = writeln!(out, "VWAP Bands (last {} bars):", bars.len() - start);
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>12} {:>12}",
        "Date", "Close", "VWAP", "Lower", "Upper"
    );
    for i in start..bars.len() {
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>12} {:>12} {:>12}",
            date(&bars[i]),
            bars[i].close,
            fmt_opt(report.vwap.get(i).copied().flatten()),
            fmt_opt(report.bands.lower.get(i).copied().flatten()),
            fmt_opt(report.bands.upper.get(i).copied().flatten()),
        );
    }
    out.push('\n');

    let sections: [(&str, &[usize]); 6] = [
        ("VWAP Divergence Indices", &report.divergence),
        ("VWAP Slope (rising)", &report.slope),
        ("VWAP Support Indices", &report.support),
        ("VWAP Resistance Indices", &report.resistance),
        ("VWAP Volume Confirmation Indices", &report.volume_confirmation),
        ("VWAP Crosses", &report.crossover),
    ];
    for (title, set) in sections {
        let _ = writeln!(out, "{title}:\n{}\n", render_index_set(bars, set));
    }

    let _ = writeln!(out, "VWAP Trailing Stop (last {} bars):", bars.len() - start);
    for i in start..bars.len() {
        let _ = writeln!(
            out,
            "{:<12} {:>12}",
            date(&bars[i]),
            fmt_opt(report.trailing_stop.get(i).copied().flatten()),
        );
    }

    out
}
