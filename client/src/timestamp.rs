//! Conversions for the Unix timestamps the API returns in most selections.

use chrono::{DateTime, TimeZone, Utc};

/// Whole seconds since the Unix epoch.
pub fn from_secs(timestamp: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0).single()
}

/// Fractional seconds since the Unix epoch, kept to millisecond precision.
pub fn from_secs_f64(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt((timestamp * 1000.0).round() as i64)
        .single()
}

pub fn to_secs_f64(datetime: DateTime<Utc>) -> f64 {
    datetime.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs() {
        let dt = from_secs(1_700_000_000).unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert_eq!(from_secs(0).unwrap().timestamp(), 0);
    }

    #[test]
    fn test_fractional() {
        let dt = from_secs_f64(1.5).unwrap();
        assert_eq!(dt.timestamp_millis(), 1500);
        assert_eq!(to_secs_f64(dt), 1.5);
        assert!(from_secs_f64(f64::NAN).is_none());
    }
}
