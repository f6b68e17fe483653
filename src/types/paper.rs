//! Paper, chunk and store-interaction types

use serde::{Deserialize, Serialize};

/// A paper as stored in the full-text index: title plus abstract.
/// Identity is the id assigned by the store on insert; papers are
/// immutable once indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSource {
    /// Paper title
    pub title: String,
    /// Paper abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl PaperSource {
    /// Create a paper from title and abstract
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }

    /// The logical document body that gets chunked and embedded
    pub fn body(&self) -> String {
        format!("{}\n\n{}", self.title, self.abstract_text)
    }
}

/// A chunk of a paper's body together with its embedding, ready for
/// insertion into the vector index. `paper_id` is the join key back to
/// the parent paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    /// Id of the parent paper in the full-text index
    pub paper_id: String,
    /// Chunk text
    pub content: String,
    /// Start offset of the chunk within the paper body, in characters
    pub start_offset: usize,
    /// Dense embedding of the chunk text
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

/// A chunk hit returned by the similarity search
#[derive(Debug, Clone)]
pub struct ChunkHit {
    /// Id of the parent paper
    pub paper_id: String,
    /// Chunk text that matched
    pub content: String,
    /// Similarity score reported by the store (higher is better)
    pub score: f32,
}

/// Per-item outcome of a bulk insert. A failed item never carries a
/// usable id.
#[derive(Debug, Clone)]
pub enum BulkOutcome {
    /// Item was indexed and assigned this id
    Indexed { id: String },
    /// Item failed; reason as reported by the store
    Failed { reason: String },
}

impl BulkOutcome {
    /// Assigned id, if the item was indexed
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Indexed { id } => Some(id),
            Self::Failed { .. } => None,
        }
    }
}

/// A candidate paper produced by the retrieve step and consumed by the
/// reranker. `content` is the title and abstract joined the same way the
/// indexed body was built.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePaper {
    /// Store-assigned paper id
    pub id: String,
    /// Paper title (the recommendation payload)
    pub title: String,
    /// Title + abstract, the text the reranker judges
    pub content: String,
}

impl CandidatePaper {
    /// Build a candidate from a resolved paper
    pub fn from_paper(id: String, paper: &PaperSource) -> Self {
        Self {
            id,
            title: paper.title.clone(),
            content: paper.body(),
        }
    }
}
