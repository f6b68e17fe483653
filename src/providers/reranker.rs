//! Reranker trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CandidatePaper;

/// Second-stage relevance scorer.
///
/// Given a query and the retrieved candidate set, returns an ordered
/// subset of at most `top_n` candidates judged most relevant, best first.
/// Returning no candidates is a valid outcome, not an error.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank `candidates` against `query`
    async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidatePaper],
        top_n: usize,
    ) -> Result<Vec<CandidatePaper>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
