//! Question routing and context assembly
//!
//! One turn runs start to finish before the next begins:
//!
//! ```text
//! route ─┬─ knowledge_base ─> retrieve ─> grade ─┬─ keep ──────────┐
//!        │                                       └─ fallback ─┐    │
//!        ├─ web ─────────────────────────────────> web search ┴──> respond
//!        └─ direct ───────────────────────────────────────────────> respond
//! ```
//!
//! The knowledge-base to web fallback is a single hop, never repeated.

mod relevance;
mod responder;
mod retriever;
mod router;
mod state;
mod web;

pub use relevance::{heuristic_grade, parse_grade, GradeOutcome, RelevanceGate};
pub use responder::Responder;
pub use retriever::Retriever;
pub use router::{keyword_set_route, parse_classification, pattern_default_route, Router};
pub use state::*;
pub use web::WebSearcher;

use crate::config::Config;
use crate::error::Result;
use crate::llm::{Embedder, LLMClient, OllamaClient};
use crate::search::{DuckDuckGoSearch, ElasticsearchStore, KnowledgeSearch, WebSearch};
use std::sync::Arc;

/// Runs one conversation turn per question; holds no state between turns
pub struct Agent {
    router: Router,
    retriever: Retriever,
    gate: RelevanceGate,
    web: WebSearcher,
    responder: Responder,
}

impl Agent {
    /// Assemble from explicit collaborators
    pub fn new(
        config: &Config,
        client: Arc<dyn LLMClient>,
        knowledge: Arc<dyn KnowledgeSearch>,
        web: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            router: Router::new(config.routing.clone(), client.clone()),
            retriever: Retriever::new(knowledge, config.search.top_k),
            gate: RelevanceGate::new(config.relevance.clone(), client.clone()),
            web: WebSearcher::new(web, config.web.max_results),
            responder: Responder::new(client),
        }
    }

    /// Assemble with Ollama, Elasticsearch and DuckDuckGo
    pub fn from_config(config: &Config) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(config.llm.clone())?);
        let embedder: Arc<dyn Embedder> = ollama.clone();
        let knowledge = Arc::new(ElasticsearchStore::new(config.search.clone(), embedder)?);
        let web = Arc::new(DuckDuckGoSearch::new(config.web.clone())?);
        Ok(Self::new(config, ollama, knowledge, web))
    }

    /// Answer one question.
    ///
    /// Search failures degrade to an answer without context; only a failing
    /// generation call makes the turn fail.
    pub async fn run(&self, question: &str) -> Result<ConversationTurn> {
        tracing::info!("Question: {}", question);

        let initial_route = self.router.route(question).await;
        let mut generation_calls = usize::from(self.router.uses_generation());

        let (route, passages) = match initial_route {
            RouteDecision::KnowledgeBase => {
                let retrieved = self.retriever.retrieve(question).await;
                let outcome = self.gate.grade(retrieved, question).await;
                generation_calls += outcome.generation_calls;

                match outcome.fallback {
                    Some(fallback) => {
                        tracing::info!("Falling back from {} to {}", initial_route, fallback);
                        (fallback, self.web.search(question).await)
                    }
                    None => (RouteDecision::KnowledgeBase, outcome.passages),
                }
            }
            RouteDecision::Web => (RouteDecision::Web, self.web.search(question).await),
            RouteDecision::Direct => (RouteDecision::Direct, PassageSet::default()),
        };

        let answer = self.responder.respond(question, route, &passages).await?;
        generation_calls += 1;

        Ok(ConversationTurn {
            question: question.to_string(),
            route,
            initial_route,
            passages,
            answer,
            generation_calls,
        })
    }
}
