//! Sentence-level classification and recommendation types

use serde::{Deserialize, Serialize};

/// Classifier verdict for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceLabel {
    /// True when the sentence is a citation site
    pub citing: bool,
    /// Classifier confidence for the reported label
    pub score: f32,
}

/// Final recommendations for one sentence: an ordered list of paper
/// titles, best match first. An empty list is a valid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecommendations {
    /// The sentence that should cite something
    pub sentence: String,
    /// Recommended paper titles, best first
    pub titles: Vec<String>,
}
