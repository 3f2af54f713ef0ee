//! Timestamp normalization.
//!
//! Providers report times in different units and representations
//! (VirusTotal: epoch seconds; urlscan.io: RFC 3339 strings). Everything
//! externally visible is normalized to epoch milliseconds.

use chrono::{DateTime, Utc};

/// Converts an epoch-seconds timestamp to epoch milliseconds.
pub fn seconds_to_millis(seconds: i64) -> i64 {
    seconds.saturating_mul(1000)
}

/// Parses an RFC 3339 timestamp string into epoch milliseconds.
///
/// Returns `None` for unparseable input; an absent or malformed provider
/// timestamp is tagged as missing rather than treated as an error.
pub fn rfc3339_to_millis(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(seconds_to_millis(1_700_000_000), 1_700_000_000_000);
        assert_eq!(seconds_to_millis(0), 0);
    }

    #[test]
    fn test_seconds_to_millis_saturates() {
        assert_eq!(seconds_to_millis(i64::MAX), i64::MAX);
    }

    #[test]
    fn test_rfc3339_to_millis() {
        assert_eq!(
            rfc3339_to_millis("2026-08-24T10:00:00.000Z"),
            Some(1_787_565_600_000)
        );
        assert_eq!(rfc3339_to_millis("not a timestamp"), None);
    }

    #[test]
    fn test_rfc3339_to_millis_with_offset() {
        // Same instant expressed with an offset must yield the same value.
        let utc = rfc3339_to_millis("2026-08-24T10:00:00Z").unwrap();
        let offset = rfc3339_to_millis("2026-08-24T12:00:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }
}
