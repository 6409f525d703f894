//! Date normalization.
//!
//! Incident sources disagree on date layout: ISO strings, US slash dates,
//! English month names, year-only values exported as floats (`2019.0`), and
//! dates split across separate year/month/day columns. All of them normalize to
//! ISO 8601 at the precision the source actually carried.

use chrono::{Datelike, NaiveDate};
use incident_model::RawValue;

use crate::Normalized;
use crate::numeric::parse_numeric;

/// Full-date layouts tried in order. Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 9999;

/// A parsed date with the precision it was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DatePrecision {
    Year(i32),
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

impl DatePrecision {
    pub fn year(&self) -> i32 {
        match self {
            Self::Year(year) | Self::Month { year, .. } => *year,
            Self::Day(date) => date.year(),
        }
    }

    /// Renders `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::Year(year) => format!("{year:04}"),
            Self::Month { year, month } => format!("{year:04}-{month:02}"),
            Self::Day(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Resolves a month from a number (`3`, `03`, `3.0`) or an English name or
/// three-letter abbreviation, case-insensitively.
pub fn month_number(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(number) = whole_number(trimmed) {
        return u32::try_from(number).ok().filter(|month| (1..=12).contains(month));
    }
    let lower = trimmed.trim_end_matches('.').to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == lower || (lower.len() >= 3 && name.starts_with(&lower)))
        .and_then(|index| u32::try_from(index + 1).ok())
}

/// Parses free-form date text. Returns `None` for blank or unrecognized input.
pub fn parse_date_text(value: &str) -> Option<DatePrecision> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = strip_time(trimmed);

    for format in DATE_FORMATS {
        // A space in a format also matches no space, so "March 2019" reads
        // as day 20 of year 19 under "%B %d %Y".
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format)
            && valid_year(date.year()).is_some()
        {
            return Some(DatePrecision::Day(date));
        }
    }
    if let Some(date) = parse_abbreviated(date_part) {
        return Some(date);
    }
    if let Some(partial) = parse_year_month(date_part) {
        return Some(partial);
    }
    whole_number(date_part)
        .and_then(|year| i32::try_from(year).ok())
        .and_then(valid_year)
        .map(DatePrecision::Year)
}

/// Normalizes a single date cell.
pub fn normalize_date(raw: &RawValue) -> Normalized {
    match raw {
        RawValue::Blank => Normalized::Blank,
        RawValue::Date(date) => Normalized::Value(DatePrecision::Day(*date).to_iso8601()),
        RawValue::Number(number) if number.is_nan() => Normalized::Blank,
        RawValue::Number(number) => year_from_number(*number)
            .map(|year| Normalized::Value(DatePrecision::Year(year).to_iso8601()))
            .unwrap_or_else(|| Normalized::Unparseable(number.to_string())),
        RawValue::Text(text) if text.trim().is_empty() => Normalized::Blank,
        RawValue::Text(text) => match parse_date_text(text) {
            Some(date) => Normalized::Value(date.to_iso8601()),
            None => Normalized::Unparseable(text.trim().to_string()),
        },
    }
}

/// Composes a date from separate year, month, and day cells.
///
/// A blank month yields year precision and a blank day yields month precision.
/// A day without a month is ignored. Any present component that cannot be read
/// makes the whole value unparseable.
pub fn compose_date(year: &RawValue, month: &RawValue, day: Option<&RawValue>) -> Normalized {
    let day = day.filter(|value| !value.is_blank());
    if year.is_blank() {
        if month.is_blank() && day.is_none() {
            return Normalized::Blank;
        }
        return Normalized::Unparseable(joined_parts(year, month, day));
    }
    let unparseable = || Normalized::Unparseable(joined_parts(year, month, day));

    let Some(year_value) = year_from_raw(year) else {
        return unparseable();
    };
    if month.is_blank() {
        return Normalized::Value(DatePrecision::Year(year_value).to_iso8601());
    }
    let Some(month_value) = month_from_raw(month) else {
        return unparseable();
    };
    let Some(day) = day else {
        return Normalized::Value(
            DatePrecision::Month {
                year: year_value,
                month: month_value,
            }
            .to_iso8601(),
        );
    };
    let day_value = whole_number(&day.to_text()).and_then(|value| u32::try_from(value).ok());
    match day_value.and_then(|day| NaiveDate::from_ymd_opt(year_value, month_value, day)) {
        Some(date) => Normalized::Value(DatePrecision::Day(date).to_iso8601()),
        None => unparseable(),
    }
}

fn strip_time(value: &str) -> &str {
    // "2019-03-05T10:00:00Z" and "2019-03-05 10:00" keep only the date.
    match value.find(['T', ' ']) {
        Some(index) if index == 10 && value.as_bytes().get(4) == Some(&b'-') => &value[..index],
        _ => value,
    }
}

/// `Mar 5, 2019` / `5 Mar 2019` style dates with abbreviated or dotted months.
fn parse_abbreviated(value: &str) -> Option<DatePrecision> {
    let tokens: Vec<&str> = value
        .split([' ', ','])
        .filter(|token| !token.is_empty())
        .collect();
    let [first, second, third] = tokens.as_slice() else {
        return None;
    };
    let (month, day) = if first.chars().all(|ch| ch.is_ascii_digit()) {
        (month_name(second)?, first)
    } else {
        (month_name(first)?, second)
    };
    let day = day.parse::<u32>().ok()?;
    let year = third.parse::<i32>().ok().and_then(valid_year)?;
    NaiveDate::from_ymd_opt(year, month, day).map(DatePrecision::Day)
}

/// `YYYY-MM`, `YYYY/MM`, `March 2019`, `Mar 2019`.
fn parse_year_month(value: &str) -> Option<DatePrecision> {
    if let Some((year, month)) = value.split_once(['-', '/']) {
        if year.len() == 4 && (1..=2).contains(&month.len()) {
            let year = year.parse::<i32>().ok().and_then(valid_year)?;
            let month = month.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
            return Some(DatePrecision::Month { year, month });
        }
        return None;
    }
    let (month, year) = value.split_once(' ')?;
    let month = month_name(month.trim_end_matches(','))?;
    let year = year.trim().parse::<i32>().ok().and_then(valid_year)?;
    Some(DatePrecision::Month { year, month })
}

fn month_name(token: &str) -> Option<u32> {
    if token.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    month_number(token)
}

/// Reads an integral number, accepting float renderings such as `2019.0`.
fn whole_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Some(number);
    }
    let number = parse_numeric(trimmed)?;
    (number.fract() == 0.0 && number.abs() < i64::MAX as f64).then_some(number as i64)
}

fn year_from_number(number: f64) -> Option<i32> {
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    i32::try_from(number as i64).ok().and_then(valid_year)
}

fn year_from_raw(raw: &RawValue) -> Option<i32> {
    match raw {
        RawValue::Number(number) => year_from_number(*number),
        RawValue::Date(date) => Some(date.year()),
        RawValue::Text(text) => whole_number(text)
            .and_then(|year| i32::try_from(year).ok())
            .and_then(valid_year),
        RawValue::Blank => None,
    }
}

fn month_from_raw(raw: &RawValue) -> Option<u32> {
    match raw {
        RawValue::Date(date) => Some(date.month()),
        other => month_number(&other.to_text()),
    }
}

fn valid_year(year: i32) -> Option<i32> {
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

fn joined_parts(year: &RawValue, month: &RawValue, day: Option<&RawValue>) -> String {
    let mut parts = vec![year.to_text(), month.to_text()];
    if let Some(day) = day {
        parts.push(day.to_text());
    }
    parts.join("-")
}
