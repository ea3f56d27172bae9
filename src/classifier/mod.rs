// file: src/classifier/mod.rs
// description: question classification module exports
// reference: internal module structure

pub mod outcome;
pub mod rules;
pub mod taxonomy;

pub use outcome::{CO_NOT_FOUND, CourseOutcome, OUTCOME_KEYWORDS, OutcomeMapper};
pub use rules::{KeywordRule, KeywordTable};
pub use taxonomy::{BLOOM_KEYWORDS, BloomLevel, NOT_CLASSIFIED, TaxonomyClassifier};
