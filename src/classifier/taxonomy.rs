// file: src/classifier/taxonomy.rs
// description: Bloom's taxonomy level classification for exam questions
// reference: keyword table lookup over ordered cognitive levels

use crate::classifier::rules::{KeywordRule, KeywordTable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_CLASSIFIED: &str = "Not Classified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloomLevel {
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub const ALL: [BloomLevel; 6] = [
        BloomLevel::Remember,
        BloomLevel::Understand,
        BloomLevel::Apply,
        BloomLevel::Analyze,
        BloomLevel::Evaluate,
        BloomLevel::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloomLevel::Remember => "Remember",
            BloomLevel::Understand => "Understand",
            BloomLevel::Apply => "Apply",
            BloomLevel::Analyze => "Analyze",
            BloomLevel::Evaluate => "Evaluate",
            BloomLevel::Create => "Create",
        }
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    pub static ref BLOOM_KEYWORDS: KeywordTable<BloomLevel> = KeywordTable::new(vec![
        KeywordRule::new(
            BloomLevel::Remember,
            &["define", "list", "name", "identify", "recall"],
        ),
        KeywordRule::new(
            BloomLevel::Understand,
            &["explain", "describe", "summarize", "interpret", "classify"],
        ),
        KeywordRule::new(
            BloomLevel::Apply,
            &["solve", "use", "demonstrate", "compute", "execute"],
        ),
        KeywordRule::new(
            BloomLevel::Analyze,
            &["compare", "analyze", "differentiate", "examine", "investigate"],
        ),
        KeywordRule::new(
            BloomLevel::Evaluate,
            &["evaluate", "justify", "critique", "assess", "argue"],
        ),
        KeywordRule::new(
            BloomLevel::Create,
            &["design", "develop", "formulate", "construct", "propose"],
        ),
    ]);
}

#[derive(Debug, Clone, Copy)]
pub struct TaxonomyClassifier {
    table: &'static KeywordTable<BloomLevel>,
}

impl TaxonomyClassifier {
    pub fn new() -> Self {
        Self {
            table: &BLOOM_KEYWORDS,
        }
    }

    pub fn level(&self, question: &str) -> Option<BloomLevel> {
        self.table.first_match(question)
    }

    /// Label written into the report, `"Not Classified"` when nothing matches.
    pub fn classify(&self, question: &str) -> &'static str {
        self.level(question)
            .map(|level| level.as_str())
            .unwrap_or(NOT_CLASSIFIED)
    }
}

impl Default for TaxonomyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_declaration_order() {
        let labels: Vec<BloomLevel> = BLOOM_KEYWORDS.rules().iter().map(|r| r.label).collect();
        assert_eq!(labels, BloomLevel::ALL.to_vec());
    }

    #[test]
    fn test_single_level_questions() {
        let classifier = TaxonomyClassifier::new();
        assert_eq!(classifier.classify("List the main components of a CPU"), "Remember");
        assert_eq!(classifier.classify("Summarize the chapter"), "Understand");
        assert_eq!(classifier.classify("Solve for x"), "Apply");
        assert_eq!(classifier.classify("Examine the trade-offs"), "Analyze");
        assert_eq!(classifier.classify("Critique this essay"), "Evaluate");
        assert_eq!(classifier.classify("Design a new algorithm for sorting"), "Create");
    }

    #[test]
    fn test_earlier_level_wins() {
        let classifier = TaxonomyClassifier::new();
        assert_eq!(
            classifier.level("Define and explain the term"),
            Some(BloomLevel::Remember)
        );
    }

    #[test]
    fn test_not_classified() {
        let classifier = TaxonomyClassifier::new();
        assert_eq!(classifier.classify(""), NOT_CLASSIFIED);
        assert_eq!(classifier.classify("What is 2 + 2?"), NOT_CLASSIFIED);
    }

    #[test]
    fn test_substring_and_case() {
        let classifier = TaxonomyClassifier::new();
        assert_eq!(classifier.classify("IDENTIFYING the culprits"), "Remember");
        // "use" hides inside "because"
        assert_eq!(classifier.classify("Why, because of gravity?"), "Apply");
    }

    #[test]
    fn test_deterministic() {
        let classifier = TaxonomyClassifier::new();
        let q = "Compare and evaluate two sorting strategies";
        assert_eq!(classifier.classify(q), classifier.classify(q));
        assert_eq!(classifier.classify(q), "Analyze");
    }
}
