//! Date recovery for the menu sources.
//!
//! Neither source carries full dates: the HTML schedule only prints a day and
//! a month, and the weekly text table is identified by year and week number.

use crate::utils::error::{MenuError, Result};
use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\s*[./]\s*(\d{1,2})").unwrap());

static NAMED_MONTH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.?\s*(\p{L}+)").unwrap());

static LEADING_WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}+)\s*\.?\s*,?\s*").unwrap());

fn is_weekday_name(word: &str) -> bool {
    matches!(
        word,
        "montag"
            | "dienstag"
            | "mittwoch"
            | "donnerstag"
            | "freitag"
            | "samstag"
            | "sonnabend"
            | "sonntag"
            | "monday"
            | "tuesday"
            | "wednesday"
            | "thursday"
            | "friday"
            | "saturday"
            | "sunday"
            // abbreviations, e.g. "Mo., 15.01."
            | "mo"
            | "di"
            | "mi"
            | "do"
            | "fr"
            | "sa"
            | "so"
            | "tu"
            | "we"
            | "th"
            | "su"
            | "mon"
            | "tue"
            | "wed"
            | "thu"
            | "fri"
            | "sat"
            | "sun"
    )
}

fn month_from_name(word: &str) -> Option<u32> {
    let month = match word {
        "januar" | "jänner" | "january" | "jan" => 1,
        "februar" | "february" | "feb" => 2,
        "märz" | "maerz" | "march" | "mär" | "mar" => 3,
        "april" | "apr" => 4,
        "mai" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nov" => 11,
        "dezember" | "december" | "dez" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Resolves a day/month string such as `"15. Januar"`, `"Montag, 15.01."` or
/// `"Monday, 15 January"` to a date in `reference_year`.
///
/// A leading weekday name is skipped. Anything after the month, including a
/// year, is ignored: the year always comes from `reference_year`.
pub fn resolve_free_text(text: &str, reference_year: i32) -> Result<NaiveDate> {
    let parse_error = || MenuError::DateParse {
        input: text.to_string(),
    };

    let lowered = text.trim().to_lowercase();
    let mut rest = lowered.as_str();
    if let Some(caps) = LEADING_WEEKDAY.captures(rest) {
        if is_weekday_name(&caps[1]) {
            rest = &rest[caps[0].len()..];
        }
    }

    let (day, month) = if let Some(caps) = NUMERIC_DATE.captures(rest) {
        let day: u32 = caps[1].parse().map_err(|_| parse_error())?;
        let month: u32 = caps[2].parse().map_err(|_| parse_error())?;
        (day, month)
    } else if let Some(caps) = NAMED_MONTH_DATE.captures(rest) {
        let day: u32 = caps[1].parse().map_err(|_| parse_error())?;
        let month = month_from_name(&caps[2]).ok_or_else(parse_error)?;
        (day, month)
    } else {
        return Err(parse_error());
    };

    NaiveDate::from_ymd_opt(reference_year, month, day).ok_or_else(parse_error)
}

/// Resolves `(year, week, weekday)` with `%Y-W%W-%w` semantics.
///
/// Weeks start on Monday. Days before the first Monday of the year belong to
/// week 0, so week 1 starts on the first Monday, which is not the ISO-8601
/// week 1 in every year. Out-of-range combinations roll over into the
/// adjacent year instead of being rejected.
pub fn resolve_from_week(year: i32, week: u32, weekday: Weekday) -> Result<NaiveDate> {
    let out_of_range = || MenuError::InvalidWeekDate { year, week };

    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
    let first_weekday = i64::from(jan1.weekday().num_days_from_monday());
    let day_of_week = i64::from(weekday.num_days_from_monday());
    let week0_len = (7 - first_weekday) % 7;

    // 1-based day of the year; may be <= 0 or past the end of the year
    let day_of_year = if week == 0 {
        1 + day_of_week - first_weekday
    } else {
        1 + week0_len + 7 * (i64::from(week) - 1) + day_of_week
    };

    TimeDelta::try_days(day_of_year - 1)
        .and_then(|offset| jan1.checked_add_signed(offset))
        .ok_or_else(out_of_range)
}

/// The `%W` week number of `date` (0 until the first Monday of the year).
pub fn week_of_year(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - date.weekday().num_days_from_monday()) / 7
}

/// Maps a `%w` weekday code (0 = Sunday, 1 = Monday, ..., 6 = Saturday).
pub fn weekday_from_code(code: u32) -> Option<Weekday> {
    match code {
        0 => Some(Weekday::Sun),
        1..=6 => Weekday::try_from((code - 1) as u8).ok(),
        _ => None,
    }
}
