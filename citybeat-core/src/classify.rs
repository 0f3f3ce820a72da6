//! Keyword-based topic tagging for free-text titles.

use std::collections::BTreeSet;

/// A topic label and the keywords that trigger it.
pub type Rule = (&'static str, &'static [&'static str]);

/// The reference rule table. Checked in order; every matching rule contributes its label.
pub const RULES: &[Rule] = &[
    ("music", &["music", "concert", "dj", "live"]),
    ("sports", &["giants", "warriors", "nba", "mlb"]),
    ("culture", &["night market", "holi", "festival"]),
];

/// Assigns topic tags to a title by case-insensitive substring matching.
///
/// Keywords match anywhere in the title, with no word boundaries ("mlb" matches "mlbx").
#[derive(Debug, Clone)]
pub struct TagClassifier {
    rules: &'static [Rule],
}

impl Default for TagClassifier {
    fn default() -> Self {
        TagClassifier { rules: RULES }
    }
}

impl TagClassifier {
    pub fn new(rules: &'static [Rule]) -> Self {
        TagClassifier { rules }
    }

    /// All labels whose rule fires for `title`. An empty set is a valid answer.
    pub fn classify(&self, title: &str) -> BTreeSet<String> {
        let lower = title.to_lowercase();

        self.rules
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(label, _)| label.to_string())
            .collect()
    }
}
