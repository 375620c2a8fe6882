//! Internal helpers for input normalization and date arithmetic.
//!
//! These utilities are **not** part of the public API.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Trim a required text field and reject it when empty.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank values become `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Advance a date by one calendar month, clamping to the end of shorter
/// months (Jan 31 becomes Feb 28/29).
pub(crate) fn advance_one_month(date: NaiveDate) -> ResultEngine<NaiveDate> {
    date.checked_add_months(Months::new(1))
        .ok_or_else(|| EngineError::invalid(format!("cannot advance due date {date}")))
}

pub(crate) fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sunday of the week containing `date`.
pub(crate) fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// `[start, end)` bounds of a calendar month.
pub(crate) fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::invalid(format!("invalid month {month}/{year}")))?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| EngineError::invalid(format!("invalid month {month}/{year}")))?;
    Ok((start, end))
}
