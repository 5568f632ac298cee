//! Timestamp utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Parse a `YYYY-MM-DD` calendar date as midnight UTC.
///
/// Returns `None` for empty or malformed input.
pub fn parse_release_date(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_millis_to_duration_one_second() {
        let duration = millis_to_duration(1000);
        assert_eq!(duration, Duration::from_secs(1));
    }

    #[test]
    fn test_parse_release_date_valid() {
        let dt = parse_release_date("1999-03-31").unwrap();
        assert_eq!(dt.year(), 1999);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 31);
        assert_eq!(dt.timestamp() % 86_400, 0);
    }

    #[test]
    fn test_parse_release_date_rejects_garbage() {
        assert!(parse_release_date("").is_none());
        assert!(parse_release_date("   ").is_none());
        assert!(parse_release_date("1999").is_none());
        assert!(parse_release_date("1999-13-01").is_none());
    }
}
