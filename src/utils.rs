// Utility functions
use chrono::{DateTime, NaiveDate};

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Unix timestamp of midnight UTC on `date`.
pub fn to_unix_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Trading date of a bar, shifted into the exchange's local time.
pub fn timestamp_to_date(timestamp: i64, gmt_offset_seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmt_offset_seconds, 0).map(|dt| dt.date_naive())
}

/// Fixed six-decimal rendering, `NaN` for missing or non-finite values.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.6}", v),
        Some(v) if v == f64::INFINITY => "inf".to_string(),
        Some(v) if v == f64::NEG_INFINITY => "-inf".to_string(),
        _ => "NaN".to_string(),
    }
}
