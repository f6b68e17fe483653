//! Paper index: the insert path and the retrieval join
//!
//! Papers are inserted as full-text documents, then chunked, embedded and
//! inserted into the vector index with the parent paper id as metadata.
//! That id is the join key: retrieval resolves chunk hits back to papers
//! with a batched multi-get and silently drops ids that no longer
//! resolve.

pub mod chunker;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{ChunkingConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, PaperStore};
use crate::types::{BulkOutcome, CandidatePaper, EmbeddedChunk, PaperSource};

pub use chunker::{Chunker, TextChunk};

/// Counters reported by one `index_papers` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    /// Papers that received an id and had their chunks indexed
    pub papers_indexed: usize,
    /// Papers whose bulk-insert item failed
    pub papers_failed: usize,
    /// Chunks inserted into the vector index
    pub chunks_indexed: usize,
    /// Chunks whose bulk-insert item failed
    pub chunks_failed: usize,
}

/// The paper index: document store + vector index behind one insert and
/// retrieval surface
pub struct PaperIndex {
    store: Arc<dyn PaperStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: Chunker,
    retrieval: RetrievalConfig,
}

impl PaperIndex {
    /// Create a paper index over the given store and embedder
    pub fn new(
        store: Arc<dyn PaperStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunking: &ChunkingConfig,
        retrieval: RetrievalConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            embedder,
            chunker: Chunker::new(chunking.chunk_size, chunking.chunk_overlap)?,
            retrieval,
        })
    }

    /// Index papers: insert full texts, then chunk, embed and insert
    /// every chunk keyed by its parent paper id.
    ///
    /// A paper whose bulk-insert item fails is excluded entirely; it
    /// never acquires chunks. Failures are per-item and never abort the
    /// surviving papers.
    pub async fn index_papers(
        &self,
        titles: &[String],
        abstracts: &[String],
    ) -> Result<IndexSummary> {
        if titles.len() != abstracts.len() {
            return Err(Error::InvalidInput(format!(
                "{} titles but {} abstracts",
                titles.len(),
                abstracts.len()
            )));
        }
        if titles.is_empty() {
            return Ok(IndexSummary::default());
        }

        let papers: Vec<PaperSource> = titles
            .iter()
            .zip(abstracts)
            .map(|(title, abstract_text)| PaperSource::new(title.clone(), abstract_text.clone()))
            .collect();

        let outcomes = self.store.bulk_insert_papers(&papers).await?;
        if outcomes.len() != papers.len() {
            return Err(Error::Store(format!(
                "bulk insert returned {} outcomes for {} papers",
                outcomes.len(),
                papers.len()
            )));
        }

        let mut summary = IndexSummary::default();
        let mut chunks = Vec::new();

        for (paper, outcome) in papers.iter().zip(&outcomes) {
            match outcome {
                BulkOutcome::Indexed { id } => {
                    summary.papers_indexed += 1;
                    for chunk in self.chunker.split(&paper.body()) {
                        chunks.push(EmbeddedChunk {
                            paper_id: id.clone(),
                            content: chunk.content,
                            start_offset: chunk.start_offset,
                            embedding: Vec::new(),
                        });
                    }
                }
                BulkOutcome::Failed { reason } => {
                    summary.papers_failed += 1;
                    tracing::warn!(title = %paper.title, %reason, "paper insert failed, skipping its chunks");
                }
            }
        }

        if chunks.is_empty() {
            return Ok(summary);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        for outcome in self.store.bulk_insert_chunks(&chunks).await? {
            match outcome {
                BulkOutcome::Indexed { .. } => summary.chunks_indexed += 1,
                BulkOutcome::Failed { reason } => {
                    summary.chunks_failed += 1;
                    tracing::warn!(%reason, "chunk insert failed");
                }
            }
        }

        tracing::info!(
            papers = summary.papers_indexed,
            chunks = summary.chunks_indexed,
            failed_papers = summary.papers_failed,
            failed_chunks = summary.chunks_failed,
            "indexing finished"
        );

        Ok(summary)
    }

    /// Whether a paper with exactly this title is already indexed.
    /// Advisory: `index_papers` performs no deduplication of its own.
    pub async fn is_already_indexed(&self, title: &str) -> Result<bool> {
        self.store.title_indexed(title).await
    }

    /// Similarity-search chunk embeddings and resolve hits to papers.
    ///
    /// Hits are collapsed to one candidate per parent paper id before
    /// reranking, keeping first-hit order. Ids that no longer resolve are
    /// dropped from the candidate set, never raised.
    pub async fn search_papers(&self, query_embedding: &[f32]) -> Result<Vec<CandidatePaper>> {
        let hits = self
            .store
            .knn_search(
                query_embedding,
                self.retrieval.top_k,
                self.retrieval.num_candidates,
            )
            .await?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for hit in &hits {
            if seen.insert(hit.paper_id.clone()) {
                ids.push(hit.paper_id.clone());
            }
        }

        let papers = self.store.multi_get_papers(&ids).await?;

        let mut candidates = Vec::with_capacity(ids.len());
        for (id, paper) in ids.into_iter().zip(papers) {
            match paper {
                Some(paper) => candidates.push(CandidatePaper::from_paper(id, &paper)),
                None => {
                    tracing::warn!(paper_id = %id, "chunk hit points at a missing paper, dropping");
                }
            }
        }

        Ok(candidates)
    }
}
