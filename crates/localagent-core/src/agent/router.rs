//! Question routing
//!
//! Three interchangeable policies pick the information source:
//! - keyword set: knowledge-base keywords win over current-events keywords
//! - pattern default: greetings go direct, current events go to the web,
//!   anything else is retrieved
//! - delegated classification: one single-word LLM call, parsed fail-open
//!
//! The first two are pure functions of the question and the configuration.

use super::RouteDecision;
use crate::config::{RoutingConfig, RoutingPolicy};
use crate::llm::{ChatMessage, LLMClient, ROUTER_PROMPT};
use std::sync::Arc;

/// Routes questions with the configured policy
pub struct Router {
    config: RoutingConfig,
    client: Arc<dyn LLMClient>,
}

impl Router {
    pub fn new(config: RoutingConfig, client: Arc<dyn LLMClient>) -> Self {
        Self { config, client }
    }

    /// Whether routing costs a generation call
    pub fn uses_generation(&self) -> bool {
        self.config.policy == RoutingPolicy::DelegatedClassification
    }

    /// Route with the configured policy
    pub async fn route(&self, question: &str) -> RouteDecision {
        self.route_with(question, self.config.policy).await
    }

    /// Route with an explicit policy, keeping the configured keyword lists
    pub async fn route_with(&self, question: &str, policy: RoutingPolicy) -> RouteDecision {
        let route = match policy {
            RoutingPolicy::KeywordSet => keyword_set_route(question, &self.config),
            RoutingPolicy::PatternDefault => pattern_default_route(question, &self.config),
            RoutingPolicy::DelegatedClassification => self.classify(question).await,
        };
        tracing::info!("Route ({}): {}", policy, route);
        route
    }

    async fn classify(&self, question: &str) -> RouteDecision {
        let messages = vec![
            ChatMessage::system(ROUTER_PROMPT),
            ChatMessage::user(question),
        ];

        match self.client.chat_completion(messages).await {
            Ok(reply) => {
                tracing::debug!("Router reply: {:?}", reply);
                parse_classification(&reply)
            }
            Err(e) => {
                tracing::warn!("Route classification failed: {}, answering directly", e);
                RouteDecision::Direct
            }
        }
    }
}

/// Knowledge-base keywords first, then current-events keywords, else direct.
/// Matching is case-insensitive substring search.
pub fn keyword_set_route(question: &str, config: &RoutingConfig) -> RouteDecision {
    let lower = question.to_lowercase();

    if contains_any(&lower, &config.knowledge_base_keywords) {
        RouteDecision::KnowledgeBase
    } else if contains_any(&lower, &config.current_events_keywords) {
        RouteDecision::Web
    } else {
        RouteDecision::Direct
    }
}

/// Greetings go direct, current-events phrases go to the web, everything
/// else defaults to the knowledge base.
pub fn pattern_default_route(question: &str, config: &RoutingConfig) -> RouteDecision {
    let normalized = question.trim().to_lowercase();

    if config
        .greeting_phrases
        .iter()
        .any(|phrase| starts_with_phrase(&normalized, phrase))
    {
        RouteDecision::Direct
    } else if contains_any(&normalized, &config.current_events_phrases) {
        RouteDecision::Web
    } else {
        RouteDecision::KnowledgeBase
    }
}

/// Interpret a delegated classification reply; anything unrecognised is direct
pub fn parse_classification(reply: &str) -> RouteDecision {
    let lower = reply.to_lowercase();
    if lower.contains("vector") {
        RouteDecision::KnowledgeBase
    } else if lower.contains("web") {
        RouteDecision::Web
    } else {
        RouteDecision::Direct
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|n| !n.is_empty())
        .any(|n| haystack.contains(&n.to_lowercase()))
}

/// Exact match, or a prefix match ending on a word boundary ("hi there"
/// matches "hi", "highlight" does not)
fn starts_with_phrase(normalized: &str, phrase: &str) -> bool {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    match normalized.strip_prefix(phrase.as_str()) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}
