//! Relative timestamps for post cards ("just now", "3 hours ago", ...).

use chrono::{DateTime, Utc};

/// Format `then` relative to `now`.
///
/// Anything under a minute (including future timestamps) is "just now"; a week or more
/// falls back to the calendar date as `M/D/YYYY`.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_owned();
    }

    let minutes = secs / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = hours / 24;
    if days < 7 {
        return plural(days, "day");
    }

    then.format("%-m/%-d/%Y").to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
