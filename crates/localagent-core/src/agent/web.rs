//! Web search adapter

use super::{Passage, PassageSet};
use crate::search::{WebResult, WebSearch};
use std::sync::Arc;

/// Issues one web search per question and normalizes the results
pub struct WebSearcher {
    search: Arc<dyn WebSearch>,
    max_results: usize,
}

impl WebSearcher {
    pub fn new(search: Arc<dyn WebSearch>, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }

    /// Search the web for the raw question.
    ///
    /// Never fails: an unavailable collaborator yields an empty set carrying
    /// the reason, which the answer step treats as "no information".
    pub async fn search(&self, question: &str) -> PassageSet {
        match self.search.search(question, self.max_results).await {
            Ok(results) => {
                if results.is_empty() {
                    tracing::info!("Web search for '{}' returned no results", question);
                } else {
                    tracing::debug!("First web result: {}", results[0].title);
                }
                results
                    .into_iter()
                    .take(self.max_results)
                    .map(web_passage)
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Web search failed: {}", e);
                PassageSet::failed(format!("Web search error for '{}': {}", question, e))
            }
        }
    }
}

fn web_passage(result: WebResult) -> Passage {
    let text = format!(
        "{}\nURL: {}\nSnippet: {}",
        result.title, result.url, result.snippet
    );
    let source = (!result.url.is_empty()).then_some(result.url);
    Passage::new(text, source)
}
