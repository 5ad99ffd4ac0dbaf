//! Date parsing and day-boundary helpers for filter bounds.

use crate::error::{Result, TaskError};
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Parse a filter bound into a calendar date.
///
/// Supports:
/// - Simple date: `2025-01-15`
/// - RFC3339: `2025-01-15T12:00:00Z` (the UTC date part is used)
///
/// # Errors
///
/// Returns a validation error naming `field_name` when the input matches
/// neither format.
pub fn parse_filter_date(s: &str, field_name: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    Err(TaskError::validation(
        field_name,
        format!("invalid date '{s}' (expected YYYY-MM-DD)"),
    ))
}

/// Like [`parse_filter_date`] but treats blank input as "no bound".
///
/// # Errors
///
/// Returns a validation error for non-blank input that does not parse.
pub fn parse_optional_filter_date(s: Option<&str>, field_name: &str) -> Result<Option<NaiveDate>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_filter_date(value, field_name).map(Some),
    }
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Midnight UTC at the start of the day after `date`.
///
/// Used as an exclusive upper bound so the whole of `date` is included.
#[must_use]
pub fn start_of_next_day(date: NaiveDate) -> DateTime<Utc> {
    date.checked_add_days(Days::new(1))
        .map_or(DateTime::<Utc>::MAX_UTC, start_of_day)
}
