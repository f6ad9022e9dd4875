//! Parsing of the hub API's human-readable publication dates.

use chrono::NaiveDate;

/// Parse a date string in the hub's "14 April 2025" format.
///
/// Returns `None` for anything that doesn't match: wrong format, empty
/// string, unexpected locale. Parse failures never propagate as errors;
/// callers exclude unparsable dates from recency filtering and sort them
/// last.
pub fn parse_formatted_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d %B %Y").ok()
}

/// Sort key for descending-by-date ordering.
///
/// Unparsable dates map to the earliest representable date so they end up
/// at the tail of a descending sort.
pub fn sort_key(raw: &str) -> NaiveDate {
    parse_formatted_date(raw).unwrap_or(NaiveDate::MIN)
}
