//! Embedding client for a text-embeddings-inference server
//!
//! Serves instruct-tuned retrieval embedders such as
//! `intfloat/multilingual-e5-large-instruct`. Embeddings are requested
//! normalized, so cosine similarity in the store behaves as expected.

use async_trait::async_trait;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Embedding provider backed by a text-embeddings-inference endpoint
pub struct TeiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl TeiEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    /// The model this embedder serves
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn embed_request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            inputs,
            normalize: true,
            truncate: true,
        };

        let response = self
            .client
            .post(format!("{}/embed", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("embed request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "embedding failed ({}): {}",
                status, body
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("failed to parse embed response: {}", e)))?;

        if embeddings.len() != inputs.len() {
            return Err(Error::Embedding(format!(
                "embed response length mismatch: {} inputs, {} embeddings",
                inputs.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

#[derive(serde::Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
    normalize: bool,
    truncate: bool,
}

#[async_trait]
impl EmbeddingProvider for TeiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = [text.to_string()];
        self.embed_request(&inputs)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding in response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            all.extend(self.embed_request(batch).await?);
        }
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("health check failed: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "tei"
    }
}
