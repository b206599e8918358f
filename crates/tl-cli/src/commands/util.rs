//! Shared formatting for CLI commands.

use std::io::{self, Write};

use chrono::{DateTime, Local};
use tl_core::{Outcome, Timestamp};

/// Prints one line per outcome.
pub fn write_outcomes<W: Write>(writer: &mut W, outcomes: &[Outcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(writer, "{outcome}")?;
    }
    Ok(())
}

/// Formats seconds as `"Xh Ymin"`, rounding down to whole minutes.
/// Negative durations are shown as `0h 0min`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}min")
}

/// Formats an epoch timestamp as local `HH:MM`.
pub fn format_clock(timestamp: Timestamp) -> String {
    DateTime::from_timestamp(timestamp, 0).map_or_else(
        || "--:--".to_string(),
        |dt| dt.with_timezone(&Local).format("%H:%M").to_string(),
    )
}
