//! Configuration for the missing-citation retrieval system

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main citegap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitegapConfig {
    /// Document/vector store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Citing-sentence classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Reranker configuration
    #[serde(default)]
    pub reranker: RerankerConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl CitegapConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load from a TOML file if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

/// Document/vector store (Elasticsearch) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store
    pub url: String,
    /// Index holding full-text papers
    pub paper_index: String,
    /// Index holding chunk embeddings
    pub chunk_index: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            paper_index: "papers".to_string(),
            chunk_index: "paper_embeddings".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding inference server
    pub endpoint: String,
    /// Model name (instruct-tuned retrieval embedder)
    pub model: String,
    /// Embedding dimensions (1024 for multilingual-e5-large-instruct)
    pub dimensions: usize,
    /// Maximum texts per embed request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            model: "intfloat/multilingual-e5-large-instruct".to_string(),
            dimensions: 1024,
            batch_size: 32,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 100,
        }
    }
}

/// Citing-sentence classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the classifier inference server
    pub endpoint: String,
    /// Raw model label that maps to "this sentence is a citation site".
    /// The label mapping is explicit configuration, never inferred from
    /// the model's class order.
    pub citing_label: String,
    /// Sentences per classification batch
    pub batch_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            citing_label: "LABEL_1".to_string(),
            batch_size: 16,
        }
    }
}

/// LLM reranker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankerConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// Model used for listwise reranking
    pub model: String,
    /// Maximum number of candidates the reranker returns
    pub top_n: usize,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            top_n: 5,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Retrieval (similarity search) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunk hits to retrieve per query
    pub top_k: usize,
    /// Widened candidate pool for the approximate search
    pub num_candidates: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 50,
            num_candidates: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_retrieval_parameters() {
        let config = CitegapConfig::default();
        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.classifier.batch_size, 16);
        assert_eq!(config.reranker.top_n, 5);
        assert_eq!(config.retrieval.top_k, 50);
        assert_eq!(config.retrieval.num_candidates, 10_000);
    }

    #[test]
    fn parses_partial_toml() {
        let parsed: CitegapConfig = toml::from_str(
            r#"
            [store]
            url = "http://search.internal:9200"
            paper_index = "papers"
            chunk_index = "paper_embeddings"
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(parsed.store.url, "http://search.internal:9200");
        assert_eq!(parsed.retrieval.top_k, 50);
    }
}
