//! Document/vector store trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BulkOutcome, ChunkHit, EmbeddedChunk, PaperSource};

/// The document+vector store holding full-text papers and chunk
/// embeddings.
///
/// Papers live in one index, chunk embeddings in another; the store is
/// responsible for both CRUD and kNN search. Implementations own their
/// index names and connection details.
#[async_trait]
pub trait PaperStore: Send + Sync {
    /// Liveness check. Construction of the workflow fails fast when the
    /// store does not answer.
    async fn ping(&self) -> Result<()>;

    /// Insert full-text papers in one bulk request.
    ///
    /// Returns one outcome per input paper, in input order. A failed item
    /// is reported as such and never acquires a usable id.
    async fn bulk_insert_papers(&self, papers: &[PaperSource]) -> Result<Vec<BulkOutcome>>;

    /// Insert embedded chunks in one bulk request, one outcome per chunk
    /// in input order.
    async fn bulk_insert_chunks(&self, chunks: &[EmbeddedChunk]) -> Result<Vec<BulkOutcome>>;

    /// Fetch papers by id, preserving input order. Ids that do not
    /// resolve yield `None`.
    async fn multi_get_papers(&self, ids: &[String]) -> Result<Vec<Option<PaperSource>>>;

    /// Approximate nearest-neighbor search over chunk embeddings.
    ///
    /// Returns up to `k` hits drawn from a widened pool of
    /// `num_candidates`, best first.
    async fn knn_search(
        &self,
        query_embedding: &[f32],
        k: usize,
        num_candidates: usize,
    ) -> Result<Vec<ChunkHit>>;

    /// Whether a paper with exactly this title is already indexed
    /// (phrase-match equality). Advisory only.
    async fn title_indexed(&self, title: &str) -> Result<bool>;
}
