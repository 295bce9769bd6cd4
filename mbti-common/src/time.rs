//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// UTC instant as stored and served
pub type Timestamp = DateTime<Utc>;

/// Get current UTC timestamp, truncated to the precision stored in the database
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Current time as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a timestamp as fixed-width RFC 3339 text.
///
/// Fixed width keeps lexicographic order equal to chronological order,
/// which the `ORDER BY created_at` queries rely on.
pub fn to_db_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse timestamp text written by [`to_db_text`]
pub fn from_db_text(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}
