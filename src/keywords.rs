use crate::types::TermSet;

/// Minimum token length kept by the extractor; shorter tokens carry almost
/// no deduplication signal.
const MIN_TOKEN_LEN: usize = 3;

/// Extracts a weighted term set from free text.
///
/// The extraction is total and deterministic: any input, including the empty
/// string, yields a well-defined TermSet, and identical input always yields
/// an identical result. Weights are occurrence counts, so a term appearing
/// more often never scores lower than one appearing less.
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> TermSet {
        let mut terms = TermSet::new();

        for token in text.to_lowercase().split_whitespace() {
            let word = token.trim_matches(|c: char| !c.is_alphanumeric());

            if word.len() < MIN_TOKEN_LEN || is_stop_word(word) {
                continue;
            }

            *terms.entry(word.to_string()).or_insert(0) += 1;
        }

        terms
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of all term weights, used by the minimum-signal filter.
pub fn total_weight(terms: &TermSet) -> u32 {
    terms.values().sum()
}

/// Check if a word is a common stop word
fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "or" | "but" | "in" | "on" | "at" | "to" | "for" | "of" | "with" | "by" |
        "a" | "an" | "is" | "are" | "was" | "were" | "be" | "been" | "have" | "has" | "had" |
        "do" | "does" | "did" | "will" | "would" | "could" | "should" | "may" | "might" | "must" |
        "can" | "this" | "that" | "these" | "those" | "its" | "his" | "her" | "their" | "from" |
        "into" | "over" | "after" | "before" | "about" | "not" | "than" | "also" | "out" | "new"
    )
}
