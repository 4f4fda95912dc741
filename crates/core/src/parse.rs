//! Cell coercions used by the cleaner.
//!
//! Each function maps one cell to the typed cell its column requires, or to
//! `CellValue::Null` when the value cannot be read.

use crate::config::DateOrder;
use chrono::{Datelike, NaiveDate};
use notas_sheet::CellValue;
use std::ops::RangeInclusive;

/// Years a spreadsheet date cell can hold.
pub const DATE_YEARS: RangeInclusive<i32> = 1900..=9999;

/// Parse a score. Accepts `.` or a single `,` as decimal separator.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let normalized = if !s.contains('.') && s.matches(',').count() == 1 {
        s.replacen(',', ".", 1)
    } else {
        s.to_string()
    };

    normalized.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parse a birth date, dropping any time-of-day suffix.
///
/// `yyyy-mm-dd` is always year first; otherwise `order` decides which of the
/// first two fields is the day. Two-digit years 69..=99 map to the 1900s and
/// 00..=68 to the 2000s. Dates outside [`DATE_YEARS`] are rejected.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    parse_calendar_date(raw, order).filter(|d| DATE_YEARS.contains(&d.year()))
}

fn parse_calendar_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next()?;
    let fields: Vec<&str> = date_part.split(['/', '-', '.']).collect();

    let [a, b, c] = fields.as_slice() else {
        return None;
    };
    if [a, b, c]
        .iter()
        .any(|f| f.is_empty() || !f.bytes().all(|ch| ch.is_ascii_digit()))
    {
        return None;
    }

    if a.len() == 4 {
        return NaiveDate::from_ymd_opt(a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);
    }

    let (day, month) = match order {
        DateOrder::DayFirst => (a, b),
        DateOrder::MonthFirst => (b, a),
    };
    let year: i32 = match c.len() {
        4 => c.parse().ok()?,
        2 => {
            let yy: i32 = c.parse().ok()?;
            if yy >= 69 {
                1900 + yy
            } else {
                2000 + yy
            }
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Coerce a cell to a number, or null.
pub fn coerce_number(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Int(i) => CellValue::Float(*i as f64),
        CellValue::Float(f) if f.is_finite() => CellValue::Float(*f),
        CellValue::String(s) => CellValue::from(parse_number(s)),
        _ => CellValue::Null,
    }
}

/// Coerce a cell to a date, or null.
pub fn coerce_date(cell: &CellValue, order: DateOrder) -> CellValue {
    match cell {
        CellValue::Date(d) if DATE_YEARS.contains(&d.year()) => CellValue::Date(*d),
        CellValue::String(s) => CellValue::from(parse_date(s, order)),
        _ => CellValue::Null,
    }
}

/// Coerce a cell to an integer, truncating decimals.
///
/// Returns `None` when the value is unreadable; the caller decides the default.
pub fn coerce_int(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Int(i) => Some(*i),
        CellValue::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| parse_number(s).map(|f| f.trunc() as i64)),
        CellValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}
