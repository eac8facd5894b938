//! Parsing and formatting of dates, times and durations for the CLI.

use crate::libs::error::CountJoyError;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// The current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CountJoyError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| CountJoyError::InvalidDate(input.to_string()))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`.
/// A bare date means midnight.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, CountJoyError> {
    let trimmed = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(value);
        }
    }

    parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN))
}

/// Target `days` days from `now` at the same time of day.
///
/// Fails with [`CountJoyError::InvalidDate`] when the result falls outside
/// the representable calendar.
pub fn in_days(now: NaiveDateTime, days: i64) -> Result<NaiveDateTime, CountJoyError> {
    Duration::try_days(days)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| CountJoyError::InvalidDate(format!("{} days from now", days)))
}

/// `HH:MM` for durations under a day, `Nd HH:MM` beyond. Negative durations print as zero.
pub fn format_duration(duration: &Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let mins = total_minutes % 60;

    if days > 0 {
        format!("{}d {:02}:{:02}", days, hours, mins)
    } else {
        format!("{:02}:{:02}", hours, mins)
    }
}

pub fn format_date_time(value: &NaiveDateTime, format: &str) -> String {
    value.format(format).to_string()
}
