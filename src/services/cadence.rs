use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: u64 = 1000 * 60 * 60 * 24;

/// Derived cadence facts merged into every event returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadenceStats {
    pub days_since: u64,
    pub average_days: u64,
    pub last_occurrence: String,
}

impl CadenceStats {
    pub fn compute(timestamps: &[DateTime<Utc>], now: DateTime<Utc>) -> Self {
        Self {
            days_since: days_since(timestamps, now),
            average_days: average_interval(timestamps),
            last_occurrence: last_occurrence_label(timestamps),
        }
    }
}

/// Whole days between two instants, order-insensitive.
fn whole_days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> u64 {
    (b - a).num_milliseconds().unsigned_abs() / MILLIS_PER_DAY
}

/// Days elapsed since the last recorded occurrence.
///
/// The last element by position is used; the history is never re-sorted.
/// A `now` earlier than that occurrence still yields a non-negative count.
pub fn days_since(timestamps: &[DateTime<Utc>], now: DateTime<Utc>) -> u64 {
    match timestamps.last() {
        Some(last) => whole_days_between(*last, now),
        None => 0,
    }
}

/// Average of the floored per-interval day counts, rounded half up.
///
/// Each consecutive gap is floored to whole days before summing, so three
/// occurrences 2 and 3 days apart give `round(2.5) = 3`.
pub fn average_interval(timestamps: &[DateTime<Utc>]) -> u64 {
    if timestamps.len() < 2 {
        return 0;
    }

    let total_days: u64 = timestamps
        .windows(2)
        .map(|pair| whole_days_between(pair[0], pair[1]))
        .sum();
    let intervals = (timestamps.len() - 1) as u64;

    (2 * total_days + intervals) / (2 * intervals)
}

/// Calendar date of the last occurrence in UTC, e.g. `Mar 7, 2024`, or `Never`.
pub fn last_occurrence_label(timestamps: &[DateTime<Utc>]) -> String {
    match timestamps.last() {
        Some(last) => last.format("%b %-d, %Y").to_string(),
        None => "Never".to_string(),
    }
}

pub fn days_since_text(days: u64) -> String {
    match days {
        0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

pub fn average_interval_text(average_days: u64) -> String {
    match average_days {
        0 => "No pattern yet".to_string(),
        1 => "Every day".to_string(),
        n => format!("Every {} days", n),
    }
}
