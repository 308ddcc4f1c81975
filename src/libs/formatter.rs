//! Date and timestamp formatting for record files and console output.
//!
//! Record files store timestamps in ISO-8601 local form without an offset
//! (`2025-01-15T14:30:22`) and calendar dates as `2025-01-15`. Reading is
//! more lenient than writing: fractional seconds and minute precision are
//! accepted so files written by other tools still load.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const ACCEPTED_TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Current local time truncated to whole seconds, matching what the record
/// files can represent.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_optional_timestamp(value: Option<&NaiveDateTime>) -> String {
    value.map(format_timestamp).unwrap_or_default()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn display_timestamp(value: Option<&NaiveDateTime>) -> String {
    match value {
        Some(value) => value.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_writes() {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-09T08:05:00");
        assert_eq!(parse_timestamp(&format_timestamp(&ts)), Some(ts));
    }

    #[test]
    fn accepts_minute_precision_and_fractions() {
        let minute = parse_timestamp("2025-03-09T08:05").unwrap();
        assert_eq!(minute.second(), 0);

        let fraction = parse_timestamp("2025-03-09T08:05:01.250").unwrap();
        assert_eq!(fraction.second(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_date("2025-13-40").is_none());
    }

    #[test]
    fn now_has_no_fraction() {
        assert_eq!(now().nanosecond(), 0);
    }
}
