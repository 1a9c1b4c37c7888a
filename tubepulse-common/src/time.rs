//! Timestamp utilities

use chrono::{Days, NaiveDate, NaiveDateTime};

/// Timestamp layout used by the platform for `publishedAt`
pub const PLATFORM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Calendar-date layout stored for published dates and predictions
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Truncate a platform timestamp to its calendar date
///
/// Returns an empty string when the value does not match
/// [`PLATFORM_TIMESTAMP_FORMAT`].
pub fn published_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, PLATFORM_TIMESTAMP_FORMAT)
        .map(|dt| dt.date().format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Date `days` after `start`, formatted as `YYYY-MM-DD`
pub fn date_after(start: NaiveDate, days: u64) -> String {
    start
        .checked_add_days(Days::new(days))
        .unwrap_or(start)
        .format(DATE_FORMAT)
        .to_string()
}
