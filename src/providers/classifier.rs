//! Citing-sentence classifier trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SentenceLabel;

/// Binary classifier deciding whether each sentence is a citation site.
///
/// Output has the same length and order as the input; an empty input
/// yields an empty output.
#[async_trait]
pub trait SentenceClassifier: Send + Sync {
    /// Classify a batch of sentences
    async fn classify(&self, sentences: &[String]) -> Result<Vec<SentenceLabel>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
