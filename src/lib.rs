//! citegap: missing-citation retrieval for scientific manuscripts
//!
//! This crate finds papers that a sentence in a manuscript should cite but
//! does not. A citing-sentence classifier selects candidate sentences, a
//! vector search over chunked paper abstracts retrieves candidate papers,
//! and an LLM reranker orders the final recommendations per sentence.

pub mod citation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extraction;
pub mod index;
pub mod providers;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CitegapConfig;
pub use error::{Error, Result};
pub use types::{
    paper::{BulkOutcome, CandidatePaper, ChunkHit, EmbeddedChunk, PaperSource},
    sentence::{SentenceLabel, SentenceRecommendations},
};
pub use workflow::MissingCitationRetriever;
