// file: src/classifier/outcome.rs
// description: course outcome (CO1..CO6) mapping for exam questions
// reference: keyword table lookup over ordered course outcomes

use crate::classifier::rules::{KeywordRule, KeywordTable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CO_NOT_FOUND: &str = "CO Not Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseOutcome {
    Co1,
    Co2,
    Co3,
    Co4,
    Co5,
    Co6,
}

impl CourseOutcome {
    pub const ALL: [CourseOutcome; 6] = [
        CourseOutcome::Co1,
        CourseOutcome::Co2,
        CourseOutcome::Co3,
        CourseOutcome::Co4,
        CourseOutcome::Co5,
        CourseOutcome::Co6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseOutcome::Co1 => "CO1",
            CourseOutcome::Co2 => "CO2",
            CourseOutcome::Co3 => "CO3",
            CourseOutcome::Co4 => "CO4",
            CourseOutcome::Co5 => "CO5",
            CourseOutcome::Co6 => "CO6",
        }
    }
}

impl fmt::Display for CourseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Maintained separately from the Bloom table; the two may disagree.
lazy_static! {
    pub static ref OUTCOME_KEYWORDS: KeywordTable<CourseOutcome> = KeywordTable::new(vec![
        KeywordRule::new(CourseOutcome::Co1, &["define", "list", "identify"]),
        KeywordRule::new(CourseOutcome::Co2, &["explain", "describe", "summarize"]),
        KeywordRule::new(CourseOutcome::Co3, &["solve", "use", "apply"]),
        KeywordRule::new(CourseOutcome::Co4, &["analyze", "compare", "differentiate"]),
        KeywordRule::new(CourseOutcome::Co5, &["evaluate", "justify", "assess"]),
        KeywordRule::new(CourseOutcome::Co6, &["design", "develop", "construct"]),
    ]);
}

#[derive(Debug, Clone, Copy)]
pub struct OutcomeMapper {
    table: &'static KeywordTable<CourseOutcome>,
}

impl OutcomeMapper {
    pub fn new() -> Self {
        Self {
            table: &OUTCOME_KEYWORDS,
        }
    }

    pub fn outcome(&self, question: &str) -> Option<CourseOutcome> {
        self.table.first_match(question)
    }

    /// Label written into the report, `"CO Not Found"` when nothing matches.
    pub fn map(&self, question: &str) -> &'static str {
        self.outcome(question)
            .map(|co| co.as_str())
            .unwrap_or(CO_NOT_FOUND)
    }
}

impl Default for OutcomeMapper {
    fn default() -> Self {
        Self::new()
    }
}
