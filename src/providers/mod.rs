//! Provider abstractions for the external collaborators
//!
//! Trait-based seams for the document/vector store, the embedding model,
//! the citing-sentence classifier and the LLM reranker, each with one
//! concrete implementation. The workflow takes `Arc<dyn Trait>`s, so test
//! doubles slot in without touching core logic.

pub mod classifier;
pub mod elastic;
pub mod embedding;
pub mod hf_classifier;
pub mod rank_llm;
pub mod reranker;
pub mod store;
pub mod tei;

pub use classifier::SentenceClassifier;
pub use elastic::ElasticStore;
pub use embedding::EmbeddingProvider;
pub use hf_classifier::HfClassifier;
pub use rank_llm::RankLlmReranker;
pub use reranker::Reranker;
pub use store::PaperStore;
pub use tei::TeiEmbedder;
