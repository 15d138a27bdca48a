//! Civil-week definition used to bucket feed timestamps.
//!
//! The feed producer writes wall-clock times for its own timezone, so every
//! timestamp is interpreted at a fixed UTC offset rather than in UTC or in
//! the host's local zone.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};

/// Display order of the heatmap rows paired with the numeric day-of-week
/// (0 = Sunday .. 6 = Saturday) each label buckets.
pub const DAY_AXIS: [(&str, u32); 7] = [
    ("Mon", 1),
    ("Tue", 2),
    ("Wed", 3),
    ("Thu", 4),
    ("Fri", 5),
    ("Sat", 6),
    ("Sun", 0),
];

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Row in [`DAY_AXIS`] for a numeric day-of-week.
pub fn display_row(day_of_week: u32) -> Option<usize> {
    DAY_AXIS.iter().position(|(_, number)| *number == day_of_week)
}

/// Producer-local wall-clock time for a feed timestamp.
///
/// Timestamps carrying an offset are converted to `offset`; naive ones are
/// already producer-local. Unparseable input yields `None`.
pub fn local_time(timestamp: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let timestamp = timestamp.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(instant.with_timezone(&offset).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
}

/// `(day_of_week, hour)` bucket of a feed timestamp, Sunday = 0.
pub fn bucket(timestamp: &str, offset: FixedOffset) -> Option<(u32, u32)> {
    let local = local_time(timestamp, offset)?;
    Some((local.weekday().num_days_from_sunday(), local.hour()))
}
