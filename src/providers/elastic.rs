//! Elasticsearch-backed document/vector store
//!
//! Speaks the REST API directly: `_bulk` with interleaved NDJSON
//! action/body pairs, `_mget` for batched id lookup, `_search` with a
//! `knn` clause for similarity search and `match_phrase` for the title
//! existence check.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::providers::store::PaperStore;
use crate::types::{BulkOutcome, ChunkHit, EmbeddedChunk, PaperSource};

/// Elasticsearch client for the paper and chunk indices
pub struct ElasticStore {
    client: reqwest::Client,
    base_url: String,
    paper_index: String,
    chunk_index: String,
}

impl ElasticStore {
    /// Create a new store client
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Store(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            paper_index: config.paper_index.clone(),
            chunk_index: config.chunk_index.clone(),
        })
    }

    /// Create the paper and chunk indices when missing.
    ///
    /// The chunk index maps `embedding` as a `dense_vector` of the given
    /// dimensions. Index administration beyond creation (deletion,
    /// reindexing) is out of scope here.
    pub async fn ensure_indices(&self, dimensions: usize) -> Result<()> {
        let paper_mappings = json!({
            "mappings": {
                "properties": {
                    "title": { "type": "text" },
                    "abstract": { "type": "text" }
                }
            }
        });

        let chunk_mappings = json!({
            "mappings": {
                "properties": {
                    "paper_id": { "type": "keyword" },
                    "content": { "type": "text" },
                    "start_offset": { "type": "integer" },
                    "embedding": {
                        "type": "dense_vector",
                        "dims": dimensions,
                        "index": true,
                        "similarity": "cosine"
                    }
                }
            }
        });

        self.create_index(&self.paper_index, &paper_mappings).await?;
        self.create_index(&self.chunk_index, &chunk_mappings).await
    }

    async fn create_index(&self, index: &str, mappings: &Value) -> Result<()> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self
            .client
            .put(&url)
            .json(mappings)
            .send()
            .await
            .map_err(|e| Error::Store(format!("create index request failed: {}", e)))?;

        if response.status().is_success() {
            tracing::info!("created index {}", index);
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if body.contains("resource_already_exists_exception") {
            tracing::debug!("index {} already exists", index);
            return Ok(());
        }

        Err(Error::Store(format!(
            "failed to create index {} ({}): {}",
            index, status, body
        )))
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Store(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "store request failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Store(format!("failed to parse store response: {}", e)))
    }

    async fn bulk_insert(&self, index: &str, docs: &[Value]) -> Result<Vec<BulkOutcome>> {
        let body = bulk_body(index, docs);

        let response = self
            .client
            .post(format!("{}/_bulk", self.base_url))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Store(format!("bulk request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "bulk insert failed ({}): {}",
                status, body
            )));
        }

        let bulk: BulkResponse = response
            .json()
            .await
            .map_err(|e| Error::Store(format!("failed to parse bulk response: {}", e)))?;

        Ok(parse_bulk_items(bulk))
    }
}

/// Build the NDJSON body for a bulk insert: for every document an action
/// line targeting the index, then the document body line.
fn bulk_body(index: &str, docs: &[Value]) -> String {
    let mut body = String::new();
    for doc in docs {
        body.push_str(&json!({ "index": { "_index": index } }).to_string());
        body.push('\n');
        body.push_str(&doc.to_string());
        body.push('\n');
    }
    body
}

#[derive(serde::Deserialize)]
struct BulkResponse {
    items: Vec<BulkResponseItem>,
}

#[derive(serde::Deserialize)]
struct BulkResponseItem {
    index: BulkItemDetail,
}

#[derive(serde::Deserialize)]
struct BulkItemDetail {
    #[serde(rename = "_id")]
    id: Option<String>,
    status: u16,
    error: Option<Value>,
}

/// Convert bulk response items into per-item outcomes, in input order.
/// A failed item never yields a usable id.
fn parse_bulk_items(bulk: BulkResponse) -> Vec<BulkOutcome> {
    bulk.items
        .into_iter()
        .map(|item| {
            let detail = item.index;
            if let Some(error) = detail.error {
                return BulkOutcome::Failed {
                    reason: error.to_string(),
                };
            }
            if detail.status >= 300 {
                return BulkOutcome::Failed {
                    reason: format!("status {}", detail.status),
                };
            }
            match detail.id {
                Some(id) => BulkOutcome::Indexed { id },
                None => BulkOutcome::Failed {
                    reason: "no id assigned".to_string(),
                },
            }
        })
        .collect()
}

/// Build the kNN search request body
fn knn_request(query_embedding: &[f32], k: usize, num_candidates: usize) -> Value {
    json!({
        "knn": {
            "field": "embedding",
            "query_vector": query_embedding,
            "k": k,
            "num_candidates": num_candidates
        },
        "_source": ["paper_id", "content"],
        "size": k
    })
}

#[derive(serde::Deserialize)]
struct SearchResponse<T> {
    hits: SearchHits<T>,
}

#[derive(serde::Deserialize)]
struct SearchHits<T> {
    total: Option<TotalHits>,
    hits: Vec<SearchHit<T>>,
}

#[derive(serde::Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(serde::Deserialize)]
struct SearchHit<T> {
    #[serde(rename = "_score")]
    score: Option<f32>,
    #[serde(rename = "_source")]
    source: Option<T>,
}

#[derive(serde::Deserialize)]
struct ChunkSource {
    paper_id: String,
    content: String,
}

#[derive(serde::Deserialize)]
struct MgetResponse {
    docs: Vec<MgetDoc>,
}

#[derive(serde::Deserialize)]
struct MgetDoc {
    found: bool,
    #[serde(rename = "_source")]
    source: Option<PaperSource>,
}

#[async_trait]
impl PaperStore for ElasticStore {
    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| Error::Store(format!("store not reachable at {}: {}", self.base_url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "store at {} answered with {}",
                self.base_url,
                response.status()
            )));
        }

        Ok(())
    }

    async fn bulk_insert_papers(&self, papers: &[PaperSource]) -> Result<Vec<BulkOutcome>> {
        if papers.is_empty() {
            return Ok(Vec::new());
        }

        let docs: Vec<Value> = papers
            .iter()
            .map(|p| serde_json::to_value(p).map_err(|e| Error::Internal(e.to_string())))
            .collect::<Result<_>>()?;

        self.bulk_insert(&self.paper_index, &docs).await
    }

    async fn bulk_insert_chunks(&self, chunks: &[EmbeddedChunk]) -> Result<Vec<BulkOutcome>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let docs: Vec<Value> = chunks
            .iter()
            .map(|c| serde_json::to_value(c).map_err(|e| Error::Internal(e.to_string())))
            .collect::<Result<_>>()?;

        self.bulk_insert(&self.chunk_index, &docs).await
    }

    async fn multi_get_papers(&self, ids: &[String]) -> Result<Vec<Option<PaperSource>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/{}/_mget", self.base_url, self.paper_index);
        let response: MgetResponse = self.post_json(&url, &json!({ "ids": ids })).await?;

        Ok(response
            .docs
            .into_iter()
            .map(|doc| if doc.found { doc.source } else { None })
            .collect())
    }

    async fn knn_search(
        &self,
        query_embedding: &[f32],
        k: usize,
        num_candidates: usize,
    ) -> Result<Vec<ChunkHit>> {
        let url = format!("{}/{}/_search", self.base_url, self.chunk_index);
        let request = knn_request(query_embedding, k, num_candidates);
        let response: SearchResponse<ChunkSource> = self.post_json(&url, &request).await?;

        Ok(response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| {
                hit.source.map(|source| ChunkHit {
                    paper_id: source.paper_id,
                    content: source.content,
                    score: hit.score.unwrap_or(0.0),
                })
            })
            .collect())
    }

    async fn title_indexed(&self, title: &str) -> Result<bool> {
        let url = format!("{}/{}/_search", self.base_url, self.paper_index);
        let request = json!({
            "query": { "match_phrase": { "title": title } },
            "size": 0,
            "track_total_hits": true
        });
        let response: SearchResponse<Value> = self.post_json(&url, &request).await?;

        Ok(response.hits.total.map(|t| t.value).unwrap_or(0) > 0)
    }
}
