//! Relevance gate for knowledge-base passages
//!
//! Decides whether retrieved passages are good enough to answer from, or
//! whether the turn takes its single fallback hop to the web.

use super::{PassageSet, RouteDecision};
use crate::config::{RelevanceConfig, RelevancePolicy};
use crate::llm::{build_grading_prompt, ChatMessage, LLMClient, GRADER_PROMPT};
use std::sync::Arc;

/// Result of grading
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    /// Passages kept for answering
    pub passages: PassageSet,
    /// `Some(Web)` when nothing usable remains
    pub fallback: Option<RouteDecision>,
    /// Generation calls spent grading
    pub generation_calls: usize,
}

/// Grades passages with the configured policy
pub struct RelevanceGate {
    config: RelevanceConfig,
    client: Arc<dyn LLMClient>,
}

impl RelevanceGate {
    pub fn new(config: RelevanceConfig, client: Arc<dyn LLMClient>) -> Self {
        Self { config, client }
    }

    pub async fn grade(&self, passages: PassageSet, question: &str) -> GradeOutcome {
        match self.config.policy {
            RelevancePolicy::Heuristic => heuristic_grade(passages, self.config.min_chars),
            RelevancePolicy::DelegatedGrading => self.delegated_grade(passages, question).await,
        }
    }

    async fn delegated_grade(&self, mut passages: PassageSet, question: &str) -> GradeOutcome {
        if passages.is_empty() {
            tracing::info!("No passages to grade, falling back to web search");
            return fallback(passages.failure, 0);
        }

        if passages.len() > self.config.max_graded {
            tracing::debug!(
                "Grading only the top {} of {} passages",
                self.config.max_graded,
                passages.len()
            );
            passages.passages.truncate(self.config.max_graded);
        }

        let mut calls = 0;
        let mut kept = Vec::new();
        for passage in passages.passages {
            let messages = vec![
                ChatMessage::system(GRADER_PROMPT),
                ChatMessage::user(build_grading_prompt(&passage.text, question)),
            ];
            calls += 1;

            let relevant = match self.client.chat_completion(messages).await {
                Ok(reply) => match parse_grade(&reply) {
                    Some(relevant) => relevant,
                    None => {
                        tracing::warn!("Unparseable grade {:?}, treating as irrelevant", reply);
                        false
                    }
                },
                Err(e) => {
                    tracing::warn!("Grading call failed: {}, treating as irrelevant", e);
                    false
                }
            };

            if relevant {
                kept.push(passage);
            }
        }

        if kept.is_empty() {
            tracing::info!("No passage judged relevant, falling back to web search");
            return fallback(None, calls);
        }

        tracing::info!("{} passage(s) judged relevant", kept.len());
        GradeOutcome {
            passages: PassageSet::new(kept),
            fallback: None,
            generation_calls: calls,
        }
    }
}

/// Keep everything when the combined trimmed text is longer than
/// `min_chars`, otherwise discard everything and fall back to the web
pub fn heuristic_grade(passages: PassageSet, min_chars: usize) -> GradeOutcome {
    if passages.is_empty() {
        tracing::info!("No passages, falling back to web search");
        return fallback(passages.failure, 0);
    }

    let total = passages.concatenated();
    let length = total.trim().chars().count();
    if length > min_chars {
        tracing::info!("Passages look relevant ({} chars)", length);
        GradeOutcome {
            passages,
            fallback: None,
            generation_calls: 0,
        }
    } else {
        tracing::info!("Passages too short ({} chars), falling back to web search", length);
        fallback(passages.failure, 0)
    }
}

/// Read a yes/no verdict from the first word of the reply
pub fn parse_grade(reply: &str) -> Option<bool> {
    let first_word = reply
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())?
        .to_lowercase();
    match first_word.as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

fn fallback(failure: Option<String>, generation_calls: usize) -> GradeOutcome {
    GradeOutcome {
        passages: PassageSet {
            passages: Vec::new(),
            failure,
        },
        fallback: Some(RouteDecision::Web),
        generation_calls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Passage;
    use crate::error::{LocalAgentError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies "yes" for passages containing the marker, "no" otherwise
    struct MarkerGrader {
        marker: &'static str,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LLMClient for MarkerGrader {
        async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            let document = messages[1]
                .content
                .split("User question:")
                .next()
                .unwrap_or_default();
            let reply = if document.contains(self.marker) {
                "Yes"
            } else {
                "no."
            };
            Ok(reply.to_string())
        }

        fn model_name(&self) -> &str {
            "grader"
        }
    }

    /// Fails every call, or replies with a fixed unparseable verdict
    struct BrokenGrader {
        reply: Option<&'static str>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LLMClient for BrokenGrader {
        async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(LocalAgentError::Transport("connection refused".into())),
            }
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    async fn grade_with_broken(reply: Option<&'static str>) -> (GradeOutcome, usize) {
        let client = Arc::new(BrokenGrader {
            reply,
            calls: Mutex::new(0),
        });
        let config = RelevanceConfig {
            policy: RelevancePolicy::DelegatedGrading,
            ..RelevanceConfig::default()
        };
        let gate = RelevanceGate::new(config, client.clone());
        let passages = set(&[
            "Each shard is a Lucene index.".to_string(),
            "Replicas copy primary shards.".to_string(),
            "Segments are merged in the background.".to_string(),
        ]);
        let outcome = gate.grade(passages, "what is a shard").await;
        let calls = *client.calls.lock().unwrap();
        (outcome, calls)
    }

    fn gate(policy: RelevancePolicy, marker: &'static str) -> (RelevanceGate, Arc<MarkerGrader>) {
        let client = Arc::new(MarkerGrader {
            marker,
            calls: Mutex::new(0),
        });
        let config = RelevanceConfig {
            policy,
            ..RelevanceConfig::default()
        };
        (RelevanceGate::new(config, client.clone()), client)
    }

    fn set(texts: &[String]) -> PassageSet {
        texts.iter().map(|t| Passage::new(t.clone(), None)).collect()
    }

    #[test]
    fn test_heuristic_short_text_falls_back() {
        let outcome = heuristic_grade(set(&["  tiny snippet  ".to_string()]), 50);
        assert!(outcome.passages.is_empty());
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
    }

    #[test]
    fn test_heuristic_threshold_is_inclusive() {
        let exactly_fifty = "x".repeat(50);
        let outcome = heuristic_grade(set(&[exactly_fifty]), 50);
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));

        let fifty_one = "x".repeat(51);
        let outcome = heuristic_grade(set(&[fifty_one]), 50);
        assert!(outcome.fallback.is_none());
    }

    #[test]
    fn test_heuristic_long_passage_kept() {
        let outcome = heuristic_grade(set(&["a".repeat(200)]), 50);
        assert_eq!(outcome.passages.len(), 1);
        assert!(outcome.fallback.is_none());
        assert_eq!(outcome.generation_calls, 0);
    }

    #[test]
    fn test_heuristic_sums_across_passages() {
        let outcome = heuristic_grade(set(&["a".repeat(30), "b".repeat(30)]), 50);
        assert_eq!(outcome.passages.len(), 2);
        assert!(outcome.fallback.is_none());
    }

    #[test]
    fn test_heuristic_empty_keeps_failure_reason() {
        let outcome = heuristic_grade(PassageSet::failed("index missing"), 50);
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
        assert_eq!(outcome.passages.failure.as_deref(), Some("index missing"));
    }

    #[test]
    fn test_parse_grade() {
        assert_eq!(parse_grade("yes"), Some(true));
        assert_eq!(parse_grade("  Yes, it is relevant."), Some(true));
        assert_eq!(parse_grade("NO"), Some(false));
        assert_eq!(parse_grade("Nope"), None);
        assert_eq!(parse_grade("maybe"), None);
        assert_eq!(parse_grade(""), None);
    }

    #[tokio::test]
    async fn test_delegated_keeps_only_relevant() {
        let (gate, client) = gate(RelevancePolicy::DelegatedGrading, "shard");
        let passages = set(&[
            "Each shard is a Lucene index.".to_string(),
            "Bananas are yellow.".to_string(),
        ]);

        let outcome = gate.grade(passages, "what is a shard").await;
        assert_eq!(outcome.passages.len(), 1);
        assert!(outcome.fallback.is_none());
        assert_eq!(outcome.generation_calls, 2);
        assert_eq!(*client.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delegated_caps_fan_out() {
        let (gate, client) = gate(RelevancePolicy::DelegatedGrading, "never-present");
        let passages = set(&(0..10).map(|i| format!("passage {}", i)).collect::<Vec<_>>());

        let outcome = gate.grade(passages, "q").await;
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
        assert!(outcome.passages.is_empty());
        assert_eq!(outcome.generation_calls, 4);
        assert_eq!(*client.calls.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_delegated_failed_calls_count_as_irrelevant() {
        let (outcome, calls) = grade_with_broken(None).await;
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
        assert!(outcome.passages.is_empty());
        assert_eq!(outcome.generation_calls, 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_delegated_unparseable_reply_counts_as_irrelevant() {
        let (outcome, calls) = grade_with_broken(Some("maybe")).await;
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
        assert!(outcome.passages.is_empty());
        assert_eq!(outcome.generation_calls, 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_delegated_empty_set_makes_no_calls() {
        let (gate, client) = gate(RelevancePolicy::DelegatedGrading, "x");
        let outcome = gate.grade(PassageSet::default(), "q").await;
        assert_eq!(outcome.fallback, Some(RouteDecision::Web));
        assert_eq!(*client.calls.lock().unwrap(), 0);
    }
}
