//! Error types for the citegap crate

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by citegap
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problems: missing credentials, unreachable store.
    /// Fatal at construction time; the caller must fix the environment.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document/vector store request failed
    #[error("store error: {0}")]
    Store(String),

    /// Embedding model call failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Citing-sentence classifier call failed
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Reranker call failed
    #[error("reranker error: {0}")]
    Reranker(String),

    /// Text extraction failed or was misused (e.g. abstract removal
    /// requested on text without an "Abstract" marker)
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Caller passed inconsistent arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}
