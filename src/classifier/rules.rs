// file: src/classifier/rules.rs
// description: ordered keyword rule tables with first-match-wins lookup
// reference: configurable keyword-based classification

/// One label and the lowercase keywords that trigger it, in lookup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule<L> {
    pub label: L,
    pub keywords: Vec<&'static str>,
}

impl<L> KeywordRule<L> {
    pub fn new(label: L, keywords: &[&'static str]) -> Self {
        Self {
            label,
            keywords: keywords.to_vec(),
        }
    }
}

/// An ordered sequence of rules. Declaration order is the tie-break: the
/// first rule owning a keyword found in the text wins, then keyword order
/// within that rule.
#[derive(Debug, Clone)]
pub struct KeywordTable<L> {
    rules: Vec<KeywordRule<L>>,
}

impl<L: Copy> KeywordTable<L> {
    pub fn new(rules: Vec<KeywordRule<L>>) -> Self {
        Self { rules }
    }

    /// Returns the label of the first rule with a keyword contained in `text`.
    /// Matching is case-insensitive substring containment.
    pub fn first_match(&self, text: &str) -> Option<L> {
        self.matching_rule(text).map(|(label, _)| label)
    }

    /// Same lookup as [`first_match`](Self::first_match), also reporting the
    /// keyword that fired.
    pub fn matching_rule(&self, text: &str) -> Option<(L, &'static str)> {
        if text.is_empty() {
            return None;
        }

        let normalized = text.to_lowercase();

        for rule in &self.rules {
            for keyword in &rule.keywords {
                if normalized.contains(keyword) {
                    return Some((rule.label, *keyword));
                }
            }
        }

        None
    }

    pub fn rules(&self) -> &[KeywordRule<L>] {
        &self.rules
    }
}
