//! Adapter for hand-pasted listings, one event per line:
//!
//! ```text
//! Chinatown Night Market — Friday, July 5 @ Grant Ave
//! ```

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::classify::TagClassifier;
use crate::date_phrase::parse_date_phrase;
use crate::record::{EventRecord, Source};

/// `<title> <dash> <date phrase> @ <location>`. The title ends at the first em-dash or
/// hyphen that is followed by an `@` later on the line.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*[—-]\s*(.*?)\s*@\s*(.*)").expect("valid listing regex")
});

/// The three captured parts of a line that matched the grammar.
#[derive(Debug, PartialEq, Eq)]
pub struct ManualLine<'a> {
    pub title: &'a str,
    pub date_phrase: &'a str,
    pub location: &'a str,
}

/// Split a line into its parts, or `None` when it doesn't follow the grammar.
pub fn split_line(line: &str) -> Option<ManualLine<'_>> {
    let caps = LINE_RE.captures(line)?;

    Some(ManualLine {
        title: caps.get(1)?.as_str().trim(),
        date_phrase: caps.get(2)?.as_str(),
        location: caps.get(3)?.as_str().trim(),
    })
}

#[derive(Debug, Clone)]
pub struct ManualTextAdapter {
    text: String,
    today: NaiveDate,
    classifier: TagClassifier,
}

impl ManualTextAdapter {
    /// `today` anchors year inference for phrases like "July 15".
    pub fn new(text: impl Into<String>, today: NaiveDate) -> Self {
        ManualTextAdapter {
            text: text.into(),
            today,
            classifier: TagClassifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: TagClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Parse every line. Lines that don't match the grammar, or whose title is blank,
    /// produce nothing; an unparseable date phrase produces a record with an unknown date.
    pub fn records(&self) -> Vec<EventRecord> {
        self.text
            .trim()
            .lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<EventRecord> {
        let Some(parts) = split_line(line) else {
            debug!(line, "skipping line that doesn't match the listing grammar");
            return None;
        };

        let record = match EventRecord::new(parts.title, Source::Manual) {
            Ok(record) => record,
            Err(_) => {
                debug!(line, "skipping line with an empty title");
                return None;
            }
        };

        let date = parse_date_phrase(parts.date_phrase, self.today);
        if date.is_none() {
            debug!(phrase = parts.date_phrase, "could not parse date phrase");
        }

        Some(
            record
                .with_date(date)
                .with_location(parts.location)
                .with_tags(self.classifier.classify(parts.title)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(text: &str) -> Vec<EventRecord> {
        ManualTextAdapter::new(text, day(2024, 6, 1)).records()
    }

    #[test]
    fn parses_night_market_line() {
        let records = parse("Chinatown Night Market — Friday, July 5 @ Grant Ave");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.title(), "Chinatown Night Market");
        assert_eq!(record.date(), Some(day(2024, 7, 5)));
        assert_eq!(record.location(), "Grant Ave");
        assert_eq!(record.tags().iter().collect::<Vec<_>>(), vec!["culture"]);
        assert_eq!(record.source(), Source::Manual);
        assert_eq!(record.time(), "");
        assert_eq!(record.link(), "");
        assert_eq!(record.description(), "");
    }

    #[test]
    fn parses_coffee_festival_line() {
        let records = parse("SF Coffee Festival — August 10 @ Fort Mason");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date(), Some(day(2024, 8, 10)));
        assert_eq!(records[0].location(), "Fort Mason");
        assert!(records[0].tags().contains("culture"));
        assert_eq!(records[0].tags().len(), 1);
    }

    #[test]
    fn block_with_indentation_and_blank_lines() {
        let block = "
            Chinatown Night Market — Friday, July 5 @ Grant Ave
            Naruto Symphonic Experience — July 15 @ SAP Center

            SF Coffee Festival — August 10 @ Fort Mason
        ";
        let records = parse(block);
        let titles: Vec<_> = records.iter().map(|r| r.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Chinatown Night Market",
                "Naruto Symphonic Experience",
                "SF Coffee Festival"
            ]
        );
        assert!(records[1].tags().is_empty());
    }

    #[test]
    fn hyphen_works_as_dash() {
        let records = parse("Warriors Watch Party - July 20 @ Chase Center");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Warriors Watch Party");
        assert!(records[0].tags().contains("sports"));
    }

    #[test]
    fn whitespace_around_separators_is_optional() {
        let records = parse("Jazz Concert—July 4@Dolores Park");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Jazz Concert");
        assert_eq!(records[0].location(), "Dolores Park");
        assert_eq!(records[0].date(), Some(day(2024, 7, 4)));
    }

    #[test]
    fn lines_without_grammar_are_skipped() {
        assert!(parse("Board Game Night on July 5 at the library").is_empty());
        assert!(parse("Board Game Night — July 5").is_empty());
        assert!(parse("Board Game Night @ Library").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn unparseable_date_keeps_record_with_unknown_date() {
        let records = parse("Pop Up Gallery — whenever works @ Mission St");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Pop Up Gallery");
        assert_eq!(records[0].location(), "Mission St");
        assert_eq!(records[0].date(), None);
    }

    #[test]
    fn title_ends_at_first_dash() {
        let records = parse("K-Pop Dance Night — July 12 @ The Independent");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "K");
        assert_eq!(records[0].location(), "The Independent");
    }

    #[test]
    fn blank_title_is_dropped() {
        assert!(parse("— July 5 @ Grant Ave").is_empty());
    }

    #[test]
    fn tags_come_from_title_only() {
        let records = parse("Book Swap — July 5 @ Live Oak Festival Grounds");
        assert_eq!(records.len(), 1);
        assert!(records[0].tags().is_empty());
    }

    #[test]
    fn custom_classifier_replaces_default_rules() {
        const FOOD: &[crate::classify::Rule] = &[("food", &["taco", "dumpling"])];

        let text = "Taco Tuesday Concert — July 9 @ Valencia St";
        let records = ManualTextAdapter::new(text, day(2024, 6, 1))
            .with_classifier(TagClassifier::new(FOOD))
            .records();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].tags().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["food"]
        );
    }

    #[test]
    fn split_line_exposes_raw_parts() {
        let parts = split_line("  A Show  —  July 5  @  Some Place  ").unwrap();
        assert_eq!(parts.title, "A Show");
        assert_eq!(parts.date_phrase, "July 5");
        assert_eq!(parts.location, "Some Place");
    }
}
