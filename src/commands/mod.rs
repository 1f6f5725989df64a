// =============================================================================
// Command loops
// =============================================================================
//
// Each command owns its own fetch -> compute -> render cycle. The indicator
// engine is called fresh on every cycle; nothing carries over between ticks
// except the HTTP client.

pub mod analyze;
pub mod monitor;
pub mod sentiment;

use std::time::Duration;

/// Build a polling interval that fires immediately and never bursts to catch
/// up after a slow cycle.
pub(crate) fn poll_interval(secs: u64) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(Duration::from_secs(secs.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval
}
