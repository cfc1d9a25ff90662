//! Search collaborator traits

use super::IndexDocument;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One document returned by the knowledge-search service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    /// Source path of the originating document, when the index stores one
    pub source_id: Option<String>,
}

impl SearchHit {
    pub fn new(text: impl Into<String>, source_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            source_id,
        }
    }
}

/// Knowledge-base similarity search
///
/// Read-only and idempotent. May return fewer than `k` hits.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &str;
}

/// One web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search
///
/// Network-dependent; results may differ between runs.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<WebResult>>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &str;
}

/// Writable vector index used by ingestion
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the index for vectors of `dims` dimensions if it is missing
    async fn ensure_index(&self, dims: usize) -> Result<()>;

    /// Write documents, returning how many were accepted
    async fn bulk_index(&self, documents: &[IndexDocument]) -> Result<usize>;
}
