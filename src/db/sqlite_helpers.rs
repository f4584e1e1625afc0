//! SQLite helper utilities for type conversion
//!
//! SQLite has no native date, timestamp or boolean types. Dates are stored as
//! `YYYY-MM-DD` TEXT, timestamps as RFC 3339 TEXT and booleans as 0/1 integers.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Date Helpers (stored as YYYY-MM-DD TEXT)
// ============================================================================

/// Convert a calendar date to its SQLite TEXT form
#[inline]
pub fn date_to_str(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a SQLite TEXT date
#[inline]
pub fn str_to_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| anyhow!("Invalid date '{}': {}", s, e))
}

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT)
// ============================================================================

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    datetime_to_str(Utc::now())
}

/// Convert a chrono DateTime to ISO8601 string.
/// Fixed width (whole seconds, `Z` suffix) so stored values compare correctly as TEXT.
#[inline]
pub fn datetime_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an ISO8601 string to DateTime
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // SQLite's datetime() format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
                .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
        })
}

// ============================================================================
// Boolean Helpers (SQLite uses 0/1 integers)
// ============================================================================

/// Convert SQLite integer to bool
#[inline]
pub fn int_to_bool(i: i32) -> bool {
    i != 0
}

// ============================================================================
// Query Building Helpers
// ============================================================================

/// Build `?1, ?2, ...` placeholders for an IN clause
pub fn in_placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_date_roundtrip() {
        let date = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
        assert_eq!(date_to_str(date), "1950-01-01");
        assert_eq!(str_to_date("1950-01-01").unwrap(), date);
    }

    #[test]
    fn test_invalid_date() {
        assert!(str_to_date("2020-13-01").is_err());
        assert!(str_to_date("not a date").is_err());
    }

    #[test]
    fn test_datetime_is_fixed_width() {
        let dt = str_to_datetime("2024-01-15T10:30:45.123456Z").unwrap();
        assert_eq!(datetime_to_str(dt), "2024-01-15T10:30:45Z");
    }

    #[test]
    fn test_sqlite_datetime_format() {
        let parsed = str_to_datetime("2024-01-15 10:30:45").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 1);
        assert_eq!(parsed.day(), 15);
    }

    #[test]
    fn test_bool_conversion() {
        assert!(int_to_bool(42));
        assert!(!int_to_bool(0));
    }

    #[test]
    fn test_in_placeholders() {
        assert_eq!(in_placeholders(3), "?1, ?2, ?3");
        assert_eq!(in_placeholders(0), "");
    }
}
