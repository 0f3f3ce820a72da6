//! Lenient parsing of human-written date phrases ("Friday, July 5", "Aug 10th").
//!
//! Words that aren't part of a date are ignored, so "July 15 at the park" still yields
//! July 15. When no year is present the year of the reference day is used.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tues", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thurs", Weekday::Thu),
    ("thur", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
];

/// Parse `phrase` into a calendar date, using `today` for the year and for bare weekdays.
///
/// Returns `None` when nothing date-like can be recovered; callers keep the record with
/// an unknown date.
pub fn parse_date_phrase(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    let normalized = trimmed.to_lowercase().replace([',', '.'], " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    if let Some(date) = tokens.iter().find_map(|t| parse_numeric(t, today)) {
        return Some(date);
    }

    match parse_words(&tokens, today) {
        Words::Date(date) => Some(date),
        Words::Invalid => None,
        Words::NoMatch => parse_relative(trimmed, today),
    }
}

enum Words {
    Date(NaiveDate),
    /// Month and day were found but don't form a real date (e.g. "February 30").
    Invalid,
    NoMatch,
}

/// Month-name forms: "july 5", "5 july", "friday july 5th 2025", or a bare weekday.
fn parse_words(tokens: &[&str], today: NaiveDate) -> Words {
    let mut month = None;
    let mut day = None;
    let mut year = None;
    let mut weekday = None;

    for token in tokens {
        if month.is_none() {
            if let Some(m) = lookup(MONTHS, token) {
                month = Some(m);
                continue;
            }
        }
        if weekday.is_none() {
            if let Some(w) = lookup(WEEKDAYS, token) {
                weekday = Some(w);
                continue;
            }
        }
        if year.is_none() && token.len() == 4 {
            if let Ok(y) = token.parse::<i32>() {
                year = Some(y);
                continue;
            }
        }
        if day.is_none() {
            if let Some(d) = parse_day(token) {
                day = Some(d);
            }
        }
    }

    match (month, day, weekday) {
        (Some(month), Some(day), _) => {
            let year = year.unwrap_or_else(|| today.year());
            NaiveDate::from_ymd_opt(year, month, day)
                .map(Words::Date)
                .unwrap_or(Words::Invalid)
        }
        (None, None, Some(weekday)) => Words::Date(next_weekday(today, weekday)),
        _ => Words::NoMatch,
    }
}

/// "7/5" or "7/5/2024" (month first).
fn parse_numeric(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = token.split('/').collect();
    let (month, day, year) = match parts.as_slice() {
        [m, d] => (m.parse::<u32>().ok()?, d.parse::<u32>().ok()?, today.year()),
        [m, d, y] => (
            m.parse::<u32>().ok()?,
            d.parse::<u32>().ok()?,
            y.parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A day of month, optionally with an ordinal suffix ("5", "5th", "22nd").
fn parse_day(token: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token);

    if digits.is_empty() || digits.len() > 2 {
        return None;
    }

    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

fn lookup<T: Copy>(table: &[(&str, T)], token: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, value)| *value)
}

/// The first day on or after `from` that falls on `weekday`.
fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(ahead))
}

/// Relative phrases ("tomorrow", "next friday") through fuzzydate, anchored at `today`.
fn parse_relative(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let expanded = expand_abbreviations(phrase);
    fuzzydate::parse_relative_to(&expanded, today.and_time(NaiveTime::MIN))
        .ok()
        .map(|dt| dt.date())
}

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            MONTHS
                .iter()
                .map(|(name, _)| *name)
                .chain(WEEKDAYS.iter().map(|(name, _)| *name))
                .find(|name| name.starts_with(word) && word.len() >= 3)
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
