// Rule book: an immutable, ordered composition of rules.
//
// A `RuleBook` splits its rules into the partial-safe list (run on every
// prefix during the search) and the complete-only list (run once a contour
// is finished). Evaluation is a short-circuiting AND in list order, so the
// strict-style book puts its most rejecting rules first.
//
// Rule books are built in code (`strict_style`, `catalog`) or loaded from a
// JSON file of the form `{"rules": [{"rule": "range_limit", "max_span": 9},
// ...]}`. Once built, a book never changes; the generator takes ownership of
// one and shares it read-only across worker threads.

use crate::phrase::Phrase;
use crate::rules::{MAX_NOTE_OCCURRENCES, MAX_RANGE, NINTH, Rule, RuleKind, SEVENTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read rule book: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed rule book: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid rule book: {0}")]
    Invalid(String),
}

/// On-disk shape of a rule book.
#[derive(Debug, Serialize, Deserialize)]
struct RuleBookFile {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBook {
    partial: Vec<Rule>,
    complete: Vec<Rule>,
}

impl RuleBook {
    /// Compose a book from an ordered rule list. Relative order within each
    /// kind is kept.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        let (partial, complete): (Vec<Rule>, Vec<Rule>) = rules
            .into_iter()
            .partition(|r| r.kind() == RuleKind::PartialSafe);
        RuleBook { partial, complete }
    }

    /// The canonical strict-style configuration.
    pub fn strict_style() -> Self {
        RuleBook::new([
            Rule::LeapPreparation,
            Rule::NoRepeatingPattern,
            Rule::NoLeapReversal,
            Rule::RangeLimit {
                max_span: MAX_RANGE,
            },
            Rule::NoteRepetition {
                max_occurrences: MAX_NOTE_OCCURRENCES,
            },
            Rule::NoTripleAlternation,
            Rule::NoFiveSameSign,
            Rule::NoRepeatingExtrema,
            Rule::ExtremaOutline {
                forbidden_spans: vec![SEVENTH],
            },
            Rule::NoLeadingSixth,
            Rule::MinDirectionChanges { min: 2 },
            Rule::SingleClimax,
        ])
    }

    /// Extension rules that are not part of the strict style, with their
    /// usual parameters. Useful as a starting point for custom books.
    pub fn catalog() -> Vec<Rule> {
        vec![
            Rule::NoRepeatedMotif { length: 3 },
            Rule::LeadingToneResolution,
            Rule::LeapSpacing { min_steps: 1 },
            Rule::ExtremaOutline {
                forbidden_spans: vec![SEVENTH, NINTH],
            },
            Rule::NoteRepetition { max_occurrences: 3 },
        ]
    }

    pub fn partial_rules(&self) -> &[Rule] {
        &self.partial
    }

    pub fn complete_rules(&self) -> &[Rule] {
        &self.complete
    }

    /// All rules, partial-safe first.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.partial.iter().chain(self.complete.iter())
    }

    pub fn len(&self) -> usize {
        self.partial.len() + self.complete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every partial-safe rule accepts the phrase.
    pub fn passes_partial(&self, phrase: &Phrase) -> bool {
        self.partial.iter().all(|r| r.check(phrase))
    }

    /// Every complete-only rule accepts the (finished) phrase.
    pub fn passes_complete(&self, phrase: &Phrase) -> bool {
        debug_assert!(phrase.is_complete());
        self.complete.iter().all(|r| r.check(phrase))
    }

    /// The first rule the phrase breaks, if any. Complete-only rules are
    /// consulted only for complete phrases.
    pub fn first_violation(&self, phrase: &Phrase) -> Option<&Rule> {
        if let Some(rule) = self.partial.iter().find(|r| !r.check(phrase)) {
            return Some(rule);
        }
        if !phrase.is_complete() {
            return None;
        }
        self.complete.iter().find(|r| !r.check(phrase))
    }

    /// Parse a rule book from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: RuleBookFile = serde_json::from_str(json)?;
        if file.rules.is_empty() {
            return Err(ConfigError::Invalid("rule list is empty".into()));
        }
        Ok(RuleBook::new(file.rules))
    }

    /// Load a rule book from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let book = Self::from_json_str(&data)?;
        tracing::debug!(path = %path.display(), rules = book.len(), "loaded rule book");
        Ok(book)
    }

    /// Serialize to the same JSON shape `from_json_str` reads.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        let file = RuleBookFile {
            rules: self.rules().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::strict_style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUX: [i32; 10] = [2, -1, -1, 3, -1, 2, -1, -1, -1, -1];
    const SCHENKER: [i32; 10] = [1, 2, -1, 1, 1, 1, -1, -2, -1, -1];

    #[test]
    fn test_strict_style_split() {
        let book = RuleBook::strict_style();
        assert_eq!(book.partial_rules().len(), 10);
        assert_eq!(
            book.complete_rules(),
            &[Rule::MinDirectionChanges { min: 2 }, Rule::SingleClimax]
        );
        assert!(book.partial_rules().iter().all(|r| r.is_partial_safe()));
    }

    #[test]
    fn test_new_keeps_order_within_kind() {
        let book = RuleBook::new([
            Rule::SingleClimax,
            Rule::NoLeapReversal,
            Rule::MinDirectionChanges { min: 1 },
            Rule::NoLeadingSixth,
        ]);
        assert_eq!(
            book.partial_rules(),
            &[Rule::NoLeapReversal, Rule::NoLeadingSixth]
        );
        assert_eq!(
            book.complete_rules(),
            &[Rule::SingleClimax, Rule::MinDirectionChanges { min: 1 }]
        );
    }

    #[test]
    fn test_literature_fixtures_pass() {
        let book = RuleBook::strict_style();
        for fixture in [FUX, SCHENKER] {
            let phrase = Phrase::complete(&fixture);
            assert!(book.passes_partial(&phrase));
            assert!(book.passes_complete(&phrase));
            assert_eq!(book.first_violation(&phrase), None);
        }
    }

    #[test]
    fn test_first_violation_reports_rule() {
        let book = RuleBook::strict_style();
        let phrase = Phrase::prefix(&[1, -1, 1]);
        assert_eq!(
            book.first_violation(&phrase),
            Some(&Rule::NoRepeatingPattern)
        );
        // One direction change only.
        let phrase = Phrase::complete(&[1, 1, -1, -1]);
        assert_eq!(
            book.first_violation(&phrase),
            Some(&Rule::MinDirectionChanges { min: 2 })
        );
        // The same contour as a prefix breaks nothing yet.
        assert_eq!(book.first_violation(&Phrase::prefix(&[1, 1, -1, -1])), None);
    }

    #[test]
    fn test_first_violation_unresolved_final_leap() {
        let book = RuleBook::strict_style();
        assert_eq!(
            book.first_violation(&Phrase::complete(&[1, -1, -1, 3])),
            Some(&Rule::LeapPreparation)
        );
        assert_eq!(book.first_violation(&Phrase::prefix(&[1, -1, -1, 3])), None);
    }

    #[test]
    fn test_json_round_trip() {
        let book = RuleBook::strict_style();
        let json = book.to_json_string().unwrap();
        let restored = RuleBook::from_json_str(&json).unwrap();
        assert_eq!(restored, book);
    }

    #[test]
    fn test_from_json_str_custom() {
        let json = r#"{"rules": [
            {"rule": "range_limit", "max_span": 7},
            {"rule": "single_climax"},
            {"rule": "leap_spacing", "min_steps": 2}
        ]}"#;
        let book = RuleBook::from_json_str(json).unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(
            book.partial_rules(),
            &[
                Rule::RangeLimit { max_span: 7 },
                Rule::LeapSpacing { min_steps: 2 }
            ]
        );
    }

    #[test]
    fn test_from_json_str_errors() {
        assert!(matches!(
            RuleBook::from_json_str(r#"{"rules": []}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuleBook::from_json_str(r#"{"rules": [{"rule": "no_such_rule"}]}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RuleBook::from_json_str("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuleBook::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_catalog_is_partial_safe() {
        assert!(RuleBook::catalog().iter().all(|r| r.is_partial_safe()));
    }
}
