//! Hand-rolled fakes for the provider traits, shared by unit tests

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::extraction::{ExtractOptions, TextExtractor};
use crate::providers::{EmbeddingProvider, PaperStore, Reranker, SentenceClassifier};
use crate::types::{
    BulkOutcome, CandidatePaper, ChunkHit, EmbeddedChunk, PaperSource, SentenceLabel,
};

/// In-memory store. Ids are assigned in insert order; kNN returns chunks
/// in insertion order with decreasing fake scores.
#[derive(Default)]
pub struct FakeStore {
    pub papers: Mutex<HashMap<String, PaperSource>>,
    pub chunks: Mutex<Vec<EmbeddedChunk>>,
    next_id: AtomicUsize,
    fail_titles: Mutex<HashSet<String>>,
    pub fail_ping: AtomicBool,
}

impl FakeStore {
    /// Make bulk inserts of a paper with this title fail
    pub fn fail_title(&self, title: &str) {
        self.fail_titles.lock().unwrap().insert(title.to_string());
    }

    /// Seed a paper directly
    pub fn insert_paper(&self, id: &str, title: &str, abstract_text: &str) {
        self.papers
            .lock()
            .unwrap()
            .insert(id.to_string(), PaperSource::new(title, abstract_text));
    }

    /// Seed a chunk directly
    pub fn insert_chunk(&self, paper_id: &str, content: &str) {
        self.chunks.lock().unwrap().push(EmbeddedChunk {
            paper_id: paper_id.to_string(),
            content: content.to_string(),
            start_offset: 0,
            embedding: vec![0.0; 4],
        });
    }
}

#[async_trait]
impl PaperStore for FakeStore {
    async fn ping(&self) -> Result<()> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(Error::Store("store unreachable".to_string()));
        }
        Ok(())
    }

    async fn bulk_insert_papers(&self, papers: &[PaperSource]) -> Result<Vec<BulkOutcome>> {
        let fail_titles = self.fail_titles.lock().unwrap().clone();
        Ok(papers
            .iter()
            .map(|paper| {
                if fail_titles.contains(&paper.title) {
                    BulkOutcome::Failed {
                        reason: "rejected by store".to_string(),
                    }
                } else {
                    let id = format!("p{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                    self.papers.lock().unwrap().insert(id.clone(), paper.clone());
                    BulkOutcome::Indexed { id }
                }
            })
            .collect())
    }

    async fn bulk_insert_chunks(&self, chunks: &[EmbeddedChunk]) -> Result<Vec<BulkOutcome>> {
        let mut stored = self.chunks.lock().unwrap();
        Ok(chunks
            .iter()
            .map(|chunk| {
                stored.push(chunk.clone());
                BulkOutcome::Indexed {
                    id: format!("c{}", stored.len()),
                }
            })
            .collect())
    }

    async fn multi_get_papers(&self, ids: &[String]) -> Result<Vec<Option<PaperSource>>> {
        let papers = self.papers.lock().unwrap();
        Ok(ids.iter().map(|id| papers.get(id).cloned()).collect())
    }

    async fn knn_search(
        &self,
        _query_embedding: &[f32],
        k: usize,
        _num_candidates: usize,
    ) -> Result<Vec<ChunkHit>> {
        let chunks = self.chunks.lock().unwrap();
        Ok(chunks
            .iter()
            .enumerate()
            .take(k)
            .map(|(i, chunk)| ChunkHit {
                paper_id: chunk.paper_id.clone(),
                content: chunk.content.clone(),
                score: 1.0 - i as f32 * 0.001,
            })
            .collect())
    }

    async fn title_indexed(&self, title: &str) -> Result<bool> {
        let papers = self.papers.lock().unwrap();
        Ok(papers.values().any(|p| p.title == title))
    }
}

/// Deterministic embedder: a tiny vector derived from the text bytes
pub struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let sum: u32 = text.bytes().map(u32::from).sum();
        Ok(vec![
            text.len() as f32,
            (sum % 97) as f32,
            (sum % 13) as f32,
            1.0,
        ])
    }

    fn dimensions(&self) -> usize {
        4
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-embedder"
    }
}

/// Classifier that records every sentence it sees. The reported score is
/// the sentence length, which makes order checks easy.
pub struct RecordingClassifier {
    pub seen: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    citing: fn(&str) -> bool,
}

impl RecordingClassifier {
    pub fn new(citing: fn(&str) -> bool) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            citing,
        }
    }
}

#[async_trait]
impl SentenceClassifier for RecordingClassifier {
    async fn classify(&self, sentences: &[String]) -> Result<Vec<SentenceLabel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().extend(sentences.iter().cloned());
        Ok(sentences
            .iter()
            .map(|s| SentenceLabel {
                citing: (self.citing)(s),
                score: s.len() as f32,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "recording-classifier"
    }
}

/// Classifier that always fails, for error-propagation tests
pub struct FailingClassifier;

#[async_trait]
impl SentenceClassifier for FailingClassifier {
    async fn classify(&self, _sentences: &[String]) -> Result<Vec<SentenceLabel>> {
        Err(Error::Classifier("model offline".to_string()))
    }

    fn name(&self) -> &str {
        "failing-classifier"
    }
}

/// Reranker that echoes every candidate back, deliberately ignoring
/// `top_n`. Set `reverse` to prove callers respect reranker order.
#[derive(Default)]
pub struct EchoReranker {
    pub reverse: bool,
}

#[async_trait]
impl Reranker for EchoReranker {
    async fn rerank(
        &self,
        _query: &str,
        candidates: &[CandidatePaper],
        _top_n: usize,
    ) -> Result<Vec<CandidatePaper>> {
        let mut out = candidates.to_vec();
        if self.reverse {
            out.reverse();
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "echo-reranker"
    }
}

/// Extractor that returns a fixed text regardless of path or options
pub struct FakeExtractor(pub String);

impl TextExtractor for FakeExtractor {
    fn extract(&self, _path: &Path, _options: &ExtractOptions) -> Result<String> {
        Ok(self.0.clone())
    }
}
