//! Calendar frequencies, date ranges and datetime text formats

mod date_range;
mod frequency;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

pub use self::date_range::{date_range, extend_after, infer_spacing};
pub use self::frequency::Frequency;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a date, a datetime or an RFC 3339 timestamp
///
/// RFC 3339 offsets are converted to UTC and dropped.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::Format(format!("cannot place '{}' at midnight", s)));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .map_err(|e| Error::Format(format!("cannot parse '{}' as a datetime: {}", s, e)))
}

/// Render timestamps as text, dropping the time part when every value is midnight
pub fn format_datetimes(values: &[NaiveDateTime]) -> Vec<String> {
    let date_only = values
        .iter()
        .all(|dt| dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0);
    let format = if date_only { "%Y-%m-%d" } else { "%Y-%m-%d %H:%M:%S" };
    values
        .iter()
        .map(|dt| dt.format(format).to_string())
        .collect()
}
