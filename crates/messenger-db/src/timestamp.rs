//! Conversion between `YYYY-MM-DD` dates and epoch-second timestamps.

use chrono::{Local, NaiveDate, TimeZone, Utc};

use crate::error::ParseError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Epoch seconds of `date` at 00:00:00 local time, or at 23:59:59 when
/// `end_of_day` is set.
pub fn to_timestamp(date: &str, end_of_day: bool) -> Result<f64, ParseError> {
    let format_err = || ParseError::Format {
        input: date.to_string(),
    };

    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| format_err())?;
    let naive = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    }
    .ok_or_else(format_err)?;

    // Ambiguous local times (DST fold) resolve to the earlier instant.
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ParseError::NonexistentLocalTime {
            input: date.to_string(),
        })?;

    Ok(local.timestamp() as f64)
}

/// Current wall-clock time in epoch seconds, with microsecond precision.
pub fn now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
