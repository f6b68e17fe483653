//! The missing-citation retrieval workflow
//!
//! Orchestrates the collaborators into a per-sentence two-stage pipeline:
//! split the manuscript into sentences, drop the ones that already carry a
//! citation marker, classify the rest, and for every citing sentence run
//! Retrieve (similarity search over chunk embeddings, joined back to
//! papers) then Reorder (LLM reranking) to produce an ordered list of
//! recommended titles.

pub mod pipeline;

use std::path::Path;
use std::sync::Arc;

use crate::citation::contains_citation;
use crate::config::CitegapConfig;
use crate::error::{Error, Result};
use crate::extraction::{split_into_sentences, ExtractOptions, TextExtractor};
use crate::index::{IndexSummary, PaperIndex};
use crate::providers::{EmbeddingProvider, PaperStore, Reranker, SentenceClassifier};
use crate::types::{SentenceLabel, SentenceRecommendations};

pub use pipeline::{RetrievalState, Stage};

/// Task instruction prefixed to every retrieval query
pub const RETRIEVAL_TASK: &str =
    "Given a sentence where a paper is cited, find the abstract of the paper it cites.";

/// Build the instruction-prefixed query for an instruct-tuned retrieval
/// embedder
pub fn format_query_instruction(task: &str, query: &str) -> String {
    format!("Instruct: {}\nQuery: {}", task, query)
}

/// The workflow orchestrator. All collaborators are injected as trait
/// objects; no step reads ambient process state.
pub struct MissingCitationRetriever {
    extractor: Arc<dyn TextExtractor>,
    classifier: Arc<dyn SentenceClassifier>,
    embedder: Arc<dyn EmbeddingProvider>,
    reranker: Arc<dyn Reranker>,
    index: PaperIndex,
    classifier_batch_size: usize,
    top_n: usize,
}

impl std::fmt::Debug for MissingCitationRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissingCitationRetriever")
            .field("classifier_batch_size", &self.classifier_batch_size)
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

impl MissingCitationRetriever {
    /// Construct the workflow.
    ///
    /// Pings the store and fails fast when it is unreachable; a caller
    /// getting a `Config` error here must fix the environment before
    /// retrying, nothing is retried internally.
    pub async fn new(
        store: Arc<dyn PaperStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        classifier: Arc<dyn SentenceClassifier>,
        reranker: Arc<dyn Reranker>,
        extractor: Arc<dyn TextExtractor>,
        config: &CitegapConfig,
    ) -> Result<Self> {
        store
            .ping()
            .await
            .map_err(|e| Error::Config(format!("document store is not reachable: {}", e)))?;
        tracing::info!("document store reachable");

        let index = PaperIndex::new(
            store,
            Arc::clone(&embedder),
            &config.chunking,
            config.retrieval.clone(),
        )?;

        Ok(Self {
            extractor,
            classifier,
            embedder,
            reranker,
            index,
            classifier_batch_size: config.classifier.batch_size.max(1),
            top_n: config.reranker.top_n,
        })
    }

    /// The underlying paper index
    pub fn index(&self) -> &PaperIndex {
        &self.index
    }

    /// Index papers into the store; see [`PaperIndex::index_papers`]
    pub async fn index_papers(
        &self,
        titles: &[String],
        abstracts: &[String],
    ) -> Result<IndexSummary> {
        self.index.index_papers(titles, abstracts).await
    }

    /// Whether a paper with this exact title is already indexed
    pub async fn is_already_indexed(&self, title: &str) -> Result<bool> {
        self.index.is_already_indexed(title).await
    }

    /// Classify sentences as citing or not.
    ///
    /// Input is batched internally purely for throughput; batching never
    /// changes results or ordering. Empty input yields empty output
    /// without touching the model.
    pub async fn classify_sentences(&self, sentences: &[String]) -> Result<Vec<SentenceLabel>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let mut labels = Vec::with_capacity(sentences.len());
        for batch in sentences.chunks(self.classifier_batch_size) {
            let batch_labels = self.classifier.classify(batch).await?;
            if batch_labels.len() != batch.len() {
                return Err(Error::Classifier(format!(
                    "classifier returned {} labels for {} sentences",
                    batch_labels.len(),
                    batch.len()
                )));
            }
            labels.extend(batch_labels);
        }

        Ok(labels)
    }

    /// Analyze a manuscript and recommend papers for every sentence that
    /// looks like it is missing a citation.
    ///
    /// Sentences already carrying an explicit citation marker are
    /// discarded before classification; only sentences classified as
    /// citing run the retrieval pipeline. One entry is returned per kept
    /// sentence; a manuscript with no citing sentences yields an empty
    /// list, not an error.
    pub async fn check_paper(&self, path: &Path) -> Result<Vec<SentenceRecommendations>> {
        let options = ExtractOptions {
            remove_references: true,
            remove_abstract: true,
            remove_reference_markers: false,
        };
        let text = self.extractor.extract(path, &options)?;

        let sentences: Vec<String> = split_into_sentences(&text)
            .into_iter()
            .filter(|sentence| !contains_citation(sentence))
            .collect();
        tracing::info!(count = sentences.len(), "sentences without citation markers");

        let labels = self.classify_sentences(&sentences).await?;
        let citing: Vec<String> = sentences
            .into_iter()
            .zip(labels)
            .filter(|(_, label)| label.citing)
            .map(|(sentence, _)| sentence)
            .collect();
        tracing::info!(count = citing.len(), "sentences classified as citation sites");

        // Each sentence's pipeline is independent of every other's; they
        // run strictly sequentially here and results may not depend on
        // execution order.
        let mut results = Vec::with_capacity(citing.len());
        for sentence in citing {
            let state = self.run_pipeline(sentence).await?;
            results.push(SentenceRecommendations {
                sentence: state.sentence,
                titles: state.reordered,
            });
        }

        Ok(results)
    }

    /// Run the linear two-step pipeline for one sentence
    async fn run_pipeline(&self, sentence: String) -> Result<RetrievalState> {
        let query = format_query_instruction(RETRIEVAL_TASK, &sentence);
        let state = RetrievalState::new(sentence, query);

        let state = self.retrieve(state).await?;
        self.reorder(state).await
    }

    /// Retrieve step: embed the instruction-prefixed query and search the
    /// paper index (Start → Retrieved)
    pub(crate) async fn retrieve(&self, state: RetrievalState) -> Result<RetrievalState> {
        state.expect_stage(Stage::Start, "retrieve")?;

        let embedding = self.embedder.embed(&state.query).await?;
        let candidates = self.index.search_papers(&embedding).await?;
        tracing::debug!(
            candidates = candidates.len(),
            "retrieved candidate papers"
        );

        Ok(state.into_retrieved(candidates))
    }

    /// Reorder step: rerank the retrieved candidates and keep at most
    /// `top_n` titles (Retrieved → Reordered). An empty outcome is a
    /// valid result.
    pub(crate) async fn reorder(&self, state: RetrievalState) -> Result<RetrievalState> {
        state.expect_stage(Stage::Retrieved, "reorder")?;

        let reranked = self
            .reranker
            .rerank(&state.query, &state.retrieved, self.top_n)
            .await?;

        let mut titles: Vec<String> = reranked.into_iter().map(|c| c.title).collect();
        titles.truncate(self.top_n);

        Ok(state.into_reordered(titles))
    }
}
