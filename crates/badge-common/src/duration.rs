//! Human-readable playing time.

use std::time::Duration;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Format a duration as days, hours and minutes, e.g. "2 days, 3 hrs".
///
/// Zero units are left out, sub-minute remainders are dropped, and a
/// duration under one minute formats as an empty string.
pub fn format_playing_time(d: Duration) -> String {
    let mut minutes = d.as_secs() / 60;
    let days = minutes / MINUTES_PER_DAY;
    minutes -= days * MINUTES_PER_DAY;
    let hours = minutes / MINUTES_PER_HOUR;
    minutes -= hours * MINUTES_PER_HOUR;

    [
        unit(days, "day", "days"),
        unit(hours, "hr", "hrs"),
        unit(minutes, "min", "mins"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ")
}

fn unit(n: u64, singular: &str, plural: &str) -> Option<String> {
    match n {
        0 => None,
        1 => Some(format!("1 {}", singular)),
        n => Some(format!("{} {}", n, plural)),
    }
}
