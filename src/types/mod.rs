//! Domain types for papers, chunks and sentence-level results

pub mod paper;
pub mod sentence;

pub use paper::{BulkOutcome, CandidatePaper, ChunkHit, EmbeddedChunk, PaperSource};
pub use sentence::{SentenceLabel, SentenceRecommendations};
