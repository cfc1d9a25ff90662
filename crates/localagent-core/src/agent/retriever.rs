//! Knowledge-base retrieval adapter

use super::{Passage, PassageSet};
use crate::search::KnowledgeSearch;
use std::sync::Arc;

/// Issues one similarity search per question and normalizes the hits
pub struct Retriever {
    search: Arc<dyn KnowledgeSearch>,
    top_k: usize,
}

impl Retriever {
    pub fn new(search: Arc<dyn KnowledgeSearch>, top_k: usize) -> Self {
        Self { search, top_k }
    }

    /// Retrieve passages for the raw question.
    ///
    /// Never fails: collaborator errors become an empty set carrying the reason.
    pub async fn retrieve(&self, question: &str) -> PassageSet {
        match self.search.similarity_search(question, self.top_k).await {
            Ok(hits) => {
                tracing::info!(
                    "Retrieved {} passage(s) from {}",
                    hits.len(),
                    self.search.backend_name()
                );
                hits.into_iter()
                    .map(|hit| Passage::new(hit.text, hit.source_id))
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Knowledge base search failed: {}", e);
                PassageSet::failed(format!("Knowledge base search error: {}", e))
            }
        }
    }
}
