//! Date-window and tag filtering over a materialized collection of records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CityBeatError;
use crate::record::{EventRecord, normalize_tags};

/// Named date predicate. Every window except `All` excludes records with an unknown date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateWindow {
    #[default]
    All,
    Today,
    ThisWeekend,
    ThisMonth,
}

impl DateWindow {
    pub const ALL: [DateWindow; 4] = [
        DateWindow::All,
        DateWindow::Today,
        DateWindow::ThisWeekend,
        DateWindow::ThisMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateWindow::All => "all",
            DateWindow::Today => "today",
            DateWindow::ThisWeekend => "this-weekend",
            DateWindow::ThisMonth => "this-month",
        }
    }

    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let Some(date) = date else {
            return *self == DateWindow::All;
        };

        match self {
            DateWindow::All => true,
            DateWindow::Today => date == today,
            DateWindow::ThisWeekend => {
                let (saturday, sunday) = upcoming_weekend(today);
                date == saturday || date == sunday
            }
            DateWindow::ThisMonth => date.year() == today.year() && date.month() == today.month(),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateWindow {
    type Err = CityBeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateWindow::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CityBeatError::InvalidWindow(s.to_string()))
    }
}

/// The Saturday on or after `today`, and the Sunday after it. On a Sunday this is the
/// following weekend, so the window never reaches back before today.
pub fn upcoming_weekend(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let ahead = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
    let saturday = today + Duration::days(i64::from(ahead));
    (saturday, saturday + Duration::days(1))
}

/// How a wanted tag is compared against a record's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// The wanted tag occurs anywhere inside one of the record's tags ("art" matches
    /// "street art"). This is the long-standing behaviour.
    #[default]
    Substring,
    /// The wanted tag is one of the record's tags.
    Exact,
}

impl FromStr for TagMatch {
    type Err = CityBeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(TagMatch::Substring),
            "exact" => Ok(TagMatch::Exact),
            _ => Err(CityBeatError::InvalidTagMatch(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub window: DateWindow,
    pub tags: BTreeSet<String>,
    pub tag_match: TagMatch,
}

impl EventQuery {
    pub fn new(window: DateWindow) -> Self {
        EventQuery {
            window,
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_tag_match(mut self, tag_match: TagMatch) -> Self {
        self.tag_match = tag_match;
        self
    }
}

/// Applies queries relative to a fixed "today".
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine {
    today: NaiveDate,
}

impl FilterEngine {
    pub fn new(today: NaiveDate) -> Self {
        FilterEngine { today }
    }

    /// Records inside `window`, in their original order.
    pub fn within<'a>(
        &self,
        records: &'a [EventRecord],
        window: DateWindow,
    ) -> Vec<&'a EventRecord> {
        records
            .iter()
            .filter(|r| window.contains(r.date(), self.today))
            .collect()
    }

    /// Date window, then tag filter, then ascending date with unknown dates last.
    pub fn apply<'a>(
        &self,
        records: &'a [EventRecord],
        query: &EventQuery,
    ) -> Vec<&'a EventRecord> {
        let mut matched: Vec<&EventRecord> = self
            .within(records, query.window)
            .into_iter()
            .filter(|r| matches_tags(r, &query.tags, query.tag_match))
            .collect();

        sort_by_date(&mut matched);
        matched
    }
}

/// Inclusive-OR: a record passes when any wanted tag matches. No wanted tags passes all.
pub fn matches_tags(record: &EventRecord, wanted: &BTreeSet<String>, mode: TagMatch) -> bool {
    if wanted.is_empty() {
        return true;
    }

    wanted.iter().any(|w| match mode {
        TagMatch::Exact => record.tags().contains(w),
        TagMatch::Substring => record.tags().iter().any(|t| t.contains(w.as_str())),
    })
}

/// Stable: records sharing a date keep their relative order.
pub fn sort_by_date(records: &mut [&EventRecord]) {
    records.sort_by_key(|r| (r.date().is_none(), r.date()));
}

/// Distinct tags across `records`, sorted. Pass the date-filtered collection to offer
/// only tags that can still match.
pub fn available_tags<'a, I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    records
        .into_iter()
        .flat_map(|r| r.tags().iter().cloned())
        .collect()
}
