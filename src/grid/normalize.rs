use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::utils::time::date_to_key;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Brings a date coming from a source into `YYYY-MM-DD` form so it can be matched against grid
/// days. Strings that can't be understood are returned as is, they simply won't match any day.
pub fn normalize_date(value: &str) -> String {
    match parse_calendar_date(value) {
        Some(date) => date_to_key(date),
        None => value.to_string(),
    }
}

/// UTC calendar date of `value`. `YYYY-MM-DD` is tried first, then generic formats.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    parse_dashed(value).or_else(|| parse_generic(value.trim()))
}

/// Splits on `-` and reads the first three parts as year, month and day. Month and day are allowed
/// to overflow: `2024-02-30` is the same day as `2024-03-01`.
fn parse_dashed(value: &str) -> Option<NaiveDate> {
    let parts = value
        .split('-')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let [year, month, day, ..] = parts[..] else {
        return None;
    };

    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = months.rem_euclid(12) as u32 + 1;
    let offset = Duration::try_days(day.checked_sub(1)?)?;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_signed(offset)
}

fn parse_generic(value: &str) -> Option<NaiveDate> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Some(moment.with_timezone(&Utc).date_naive());
    }
    if let Ok(moment) = DateTime::parse_from_rfc2822(value) {
        return Some(moment.with_timezone(&Utc).date_naive());
    }
    // Without an offset the moment is taken as UTC.
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|moment| moment.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
}
