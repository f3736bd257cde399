//! Date parsing with a day-then-year fallback
//!
//! Accepted shapes, tried in order:
//! 1. `YYYY-MM-DD`, calendar-validated (`1999-02-30` is rejected)
//! 2. `YYYY`
//!
//! Nothing else is accepted and invalid dates are never clamped.

use super::error::{ImportError, ImportResult};
use crate::graph::{DatePrecision, PropertyValue};
use chrono::NaiveDate;

/// A date together with the precision it was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlexibleDate {
    pub date: NaiveDate,
    pub precision: DatePrecision,
}

impl From<FlexibleDate> for PropertyValue {
    fn from(d: FlexibleDate) -> Self {
        PropertyValue::Date {
            date: d.date,
            precision: d.precision,
        }
    }
}

/// Parse `value` found in `field`
pub fn parse_flexible_date(field: &'static str, value: &str) -> ImportResult<FlexibleDate> {
    if let Some(date) = parse_day(value) {
        return Ok(FlexibleDate {
            date,
            precision: DatePrecision::Day,
        });
    }
    if let Some(date) = parse_year(value) {
        return Ok(FlexibleDate {
            date,
            precision: DatePrecision::Year,
        });
    }
    Err(ImportError::UnparsableDate {
        field,
        value: value.to_string(),
    })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    // chrono accepts signs and variable widths; pin the shape first
    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if !(is_digits(year) && is_digits(month) && is_digits(day)) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn parse_year(value: &str) -> Option<NaiveDate> {
    if value.len() != 4 || !is_digits(value) {
        return None;
    }
    let year: i32 = value.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}
