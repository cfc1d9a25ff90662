//! Elasticsearch vector store client
//!
//! Queries are embedded through an [`Embedder`] and answered with an
//! approximate kNN search over a `dense_vector` field.

use super::{KnowledgeSearch, SearchHit, VectorIndex};
use crate::config::SearchServiceConfig;
use crate::error::{LocalAgentError, Result};
use crate::llm::{check_status, transport_error, Embedder};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// A chunk ready to be written to the index
#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub id: String,
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: Value,
}

/// Elasticsearch-backed knowledge search
pub struct ElasticsearchStore {
    http_client: reqwest::Client,
    config: SearchServiceConfig,
    embedder: Arc<dyn Embedder>,
}

impl ElasticsearchStore {
    /// Create from configuration and the embedder used for query vectors
    pub fn new(config: SearchServiceConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            config,
            embedder,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.config.index
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.config.index)
    }

    /// Check that the node answers
    pub async fn ping(&self) -> Result<()> {
        let url = self.base_url().to_string();
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(response, "Elasticsearch").await?;
        Ok(())
    }

    /// Number of chunks stored in the index
    pub async fn count(&self) -> Result<u64> {
        let url = format!("{}/_count", self.index_url());
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Elasticsearch").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid _count response: {}", e)))?;
        body["count"]
            .as_u64()
            .ok_or_else(|| LocalAgentError::Parse("_count response has no count".to_string()))
    }

    /// Create the index with a dense_vector mapping unless it already exists
    pub async fn ensure_index(&self, dims: usize) -> Result<()> {
        let url = self.index_url();
        let exists = self
            .http_client
            .head(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        if exists.status().is_success() {
            return Ok(());
        }

        tracing::info!("Creating index '{}' ({} dims)", self.config.index, dims);
        let response = self
            .http_client
            .put(&url)
            .json(&build_index_mapping(&self.config, dims))
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(response, "Elasticsearch").await?;
        Ok(())
    }

    /// Write documents with one `_bulk` request; returns the number indexed
    pub async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let body = build_bulk_body(&self.config, documents)?;
        let url = format!("{}/_bulk", self.base_url());
        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Elasticsearch").await?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid _bulk response: {}", e)))?;
        if result["errors"].as_bool().unwrap_or(false) {
            let failed = result["items"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| !item["index"]["error"].is_null())
                        .count()
                })
                .unwrap_or(0);
            return Err(LocalAgentError::Transport(format!(
                "Bulk indexing rejected {} of {} documents",
                failed,
                documents.len()
            )));
        }

        Ok(documents.len())
    }
}

#[async_trait]
impl VectorIndex for ElasticsearchStore {
    async fn ensure_index(&self, dims: usize) -> Result<()> {
        ElasticsearchStore::ensure_index(self, dims).await
    }

    async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<usize> {
        ElasticsearchStore::bulk_index(self, documents).await
    }
}

#[async_trait]
impl KnowledgeSearch for ElasticsearchStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query_vector = self.embedder.embed(query).await?;
        let body = build_knn_query(&self.config, query_vector, k);

        let url = format!("{}/_search", self.index_url());
        tracing::debug!("kNN search on {} (k={})", url, k);

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Elasticsearch").await?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid _search response: {}", e)))?;
        parse_search_hits(&result, &self.config.text_field, &self.config.source_field)
    }

    fn backend_name(&self) -> &str {
        "elasticsearch"
    }
}

fn build_knn_query(config: &SearchServiceConfig, query_vector: Vec<f32>, k: usize) -> Value {
    json!({
        "knn": {
            "field": config.vector_field,
            "query_vector": query_vector,
            "k": k,
            "num_candidates": config.num_candidates.max(k),
        },
        "size": k,
        "_source": { "excludes": [config.vector_field] },
    })
}

fn build_index_mapping(config: &SearchServiceConfig, dims: usize) -> Value {
    json!({
        "mappings": {
            "properties": {
                config.text_field.clone(): { "type": "text" },
                config.vector_field.clone(): {
                    "type": "dense_vector",
                    "dims": dims,
                    "index": true,
                    "similarity": "cosine",
                },
                "metadata": { "type": "object" },
            }
        }
    })
}

fn build_bulk_body(config: &SearchServiceConfig, documents: &[IndexDocument]) -> Result<String> {
    let mut body = String::new();
    for doc in documents {
        let action = json!({ "index": { "_index": config.index, "_id": doc.id } });
        let source = json!({
            config.text_field.clone(): doc.text,
            config.vector_field.clone(): doc.vector,
            "metadata": doc.metadata,
        });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&source)?);
        body.push('\n');
    }
    Ok(body)
}

/// Extract text and source path from a `_search` response
fn parse_search_hits(result: &Value, text_field: &str, source_field: &str) -> Result<Vec<SearchHit>> {
    let hits = result["hits"]["hits"]
        .as_array()
        .ok_or_else(|| LocalAgentError::Parse("_search response has no hits array".to_string()))?;

    Ok(hits
        .iter()
        .filter_map(|hit| {
            let source = &hit["_source"];
            let text = lookup_path(source, text_field)?.as_str()?.to_string();
            let source_id = lookup_path(source, source_field)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            Some(SearchHit { text, source_id })
        })
        .collect())
}

/// Follow a dotted path like `metadata.source`
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}
