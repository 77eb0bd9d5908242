//! Relative date phrases ("3 weeks ago") to calendar dates.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable relative date: {0:?}")]
    Unparseable(String),
}

/// Length of one unit of a relative phrase.
///
/// Months and years are fixed approximations (30 and 365 days). Seconds are
/// scaled as minutes.
fn unit_length(unit: &str) -> Option<Duration> {
    let length = match unit {
        "year" | "years" => Duration::days(365),
        "month" | "months" => Duration::days(30),
        "week" | "weeks" => Duration::weeks(1),
        "day" | "days" => Duration::days(1),
        "hour" | "hours" => Duration::hours(1),
        "minute" | "minutes" => Duration::minutes(1),
        "second" | "seconds" => Duration::minutes(1),
        _ => return None,
    };
    Some(length)
}

/// Convert `"{N} {unit} ago"` into the date `N × unit` before `now`.
///
/// Only the first two words are read, so suffixes like `"(edited)"` are
/// ignored.
pub fn parse_time_ago(phrase: &str, now: NaiveDateTime) -> Result<NaiveDate, DateError> {
    let unparseable = || DateError::Unparseable(phrase.to_string());

    let mut words = phrase.split_whitespace();
    let value: u32 = words
        .next()
        .and_then(|w| w.parse().ok())
        .ok_or_else(unparseable)?;
    let unit = words.next().ok_or_else(unparseable)?.to_lowercase();
    let length = unit_length(&unit).ok_or_else(unparseable)?;

    let delta = i32::try_from(value)
        .ok()
        .and_then(|n| length.checked_mul(n))
        .ok_or_else(unparseable)?;
    now.checked_sub_signed(delta)
        .map(|dt| dt.date())
        .ok_or_else(unparseable)
}
