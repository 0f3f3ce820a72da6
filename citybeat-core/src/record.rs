//! The canonical event record.
//!
//! Every source adapter converts its native format into `EventRecord`s. The store, the
//! filter engine and the CLI work exclusively with this type.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CityBeatError, CityBeatResult};

/// Where a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    TicketingApi,
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::TicketingApi => "ticketing-api",
            Source::Manual => "manual",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized event listing.
///
/// Fields are private so the invariants hold for every value in circulation: the title is
/// trimmed and non-empty, and tags are trimmed, lowercase and deduplicated. Records are
/// built once with [`EventRecord::new`] plus the `with_*` methods and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct EventRecord {
    title: String,
    /// `None` means the date is unknown (missing or unparseable at the source).
    date: Option<NaiveDate>,
    time: String,
    location: String,
    tags: BTreeSet<String>,
    source: Source,
    link: String,
    description: String,
}

impl EventRecord {
    /// Start a record. Fails when the title is blank after trimming.
    pub fn new(title: &str, source: Source) -> CityBeatResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CityBeatError::InvalidRecord("title is empty".into()));
        }

        Ok(EventRecord {
            title: title.to_string(),
            date: None,
            time: String::new(),
            location: String::new(),
            tags: BTreeSet::new(),
            source,
            link: String::new(),
            description: String::new(),
        })
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stable key for "the same conceptual event": normalized title, date and source.
    pub fn identity(&self) -> String {
        let title = self
            .title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let date = self
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        format!("{}|{}|{}", title, date, self.source)
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Lowercase, trim and deduplicate tag labels, dropping empty ones.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// On-disk shape. Deserialization goes through this so stored data cannot bypass the
/// record invariants.
#[derive(Deserialize)]
struct StoredRecord {
    title: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    time: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    tags: Vec<String>,
    source: Source,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
}

impl TryFrom<StoredRecord> for EventRecord {
    type Error = CityBeatError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        Ok(EventRecord::new(&stored.title, stored.source)?
            .with_date(stored.date)
            .with_time(stored.time)
            .with_location(stored.location)
            .with_tags(stored.tags)
            .with_link(stored.link)
            .with_description(stored.description))
    }
}
