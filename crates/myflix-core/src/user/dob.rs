//! Date-of-birth formatting.
//!
//! Profile forms display the date as `YYYY-MM-DD`; the API expects a full
//! UTC timestamp with millisecond precision (`1990-05-01T00:00:00.000Z`).

use crate::error::{ClientError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

fn parse_dob(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    None
}

/// Converts a date of birth in any supported display format to the wire
/// timestamp form.
///
/// # Errors
///
/// Returns a `Precondition` error when the input is not a recognizable date.
pub fn normalize_dob(input: &str) -> Result<String> {
    parse_dob(input)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| {
            ClientError::precondition(format!("'{}' is not a valid date of birth", input.trim()))
        })
}

/// Formats a stored date of birth as `YYYY-MM-DD` for display.
///
/// Unparseable input is returned unchanged.
pub fn display_dob(input: &str) -> String {
    parse_dob(input)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| input.to_string())
}
