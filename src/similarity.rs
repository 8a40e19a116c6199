use crate::types::TermSet;

/// Jaccard-index similarity over term-key sets.
///
/// Weights are ignored; only the presence of a term matters for this metric.
pub struct SimilarityEngine;

impl SimilarityEngine {
    /// Similarity score in [0, 1]. Symmetric in its arguments.
    ///
    /// Two empty sets score 0.0: the absence of terms on both sides is no
    /// evidence that the items are about the same thing.
    pub fn similarity(a: &TermSet, b: &TermSet) -> f64 {
        if a.is_empty() && b.is_empty() {
            return 0.0;
        }

        let intersection = a.keys().filter(|term| b.contains_key(*term)).count();
        let union = a.len() + b.len() - intersection;

        intersection as f64 / union as f64
    }
}
