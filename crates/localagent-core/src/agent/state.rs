//! Per-turn data model

use crate::llm::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Source identifier used when the collaborator gives none
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Separator placed between passages in the assembled context
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// The information source chosen for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    KnowledgeBase,
    Web,
    Direct,
}

impl RouteDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => "knowledge_base",
            Self::Web => "web",
            Self::Direct => "direct",
        }
    }

    /// The answer template paired with this route
    pub fn template(&self) -> PromptTemplate {
        match self {
            Self::KnowledgeBase => PromptTemplate::KnowledgeBase,
            Self::Web => PromptTemplate::Web,
            Self::Direct => PromptTemplate::Direct,
        }
    }
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of retrieved text plus its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    /// URL or document path; [`UNKNOWN_SOURCE`] when not provided
    pub source: String,
}

impl Passage {
    pub fn new(text: impl Into<String>, source: Option<String>) -> Self {
        Self {
            text: text.into(),
            source: source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        }
    }
}

/// Passages in retrieval-rank order
///
/// An empty set produced by a failing collaborator carries the reason in
/// `failure`; an empty set from a reachable collaborator has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageSet {
    pub passages: Vec<Passage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl PassageSet {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self {
            passages,
            failure: None,
        }
    }

    /// Empty set standing in for a collaborator failure
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            passages: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Passage> {
        self.passages.iter()
    }

    /// All passage texts concatenated without separator
    pub fn concatenated(&self) -> String {
        self.passages.iter().map(|p| p.text.as_str()).collect()
    }

    /// Passage texts joined by a blank line; empty set gives an empty string
    pub fn joined(&self) -> String {
        self.passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR)
    }

    /// Distinct non-sentinel sources in rank order
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for passage in &self.passages {
            let source = passage.source.as_str();
            if source != UNKNOWN_SOURCE && !seen.contains(&source) {
                seen.push(source);
            }
        }
        seen
    }
}

impl FromIterator<Passage> for PassageSet {
    fn from_iter<I: IntoIterator<Item = Passage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The single request sent to the generation collaborator for a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub template: PromptTemplate,
    /// `None` for the direct route, which never receives a context field
    pub context: Option<String>,
    pub question: String,
}

impl GenerationRequest {
    /// Build the request for a route; passages are ignored on the direct route
    pub fn for_route(route: RouteDecision, passages: &PassageSet, question: &str) -> Self {
        let template = route.template();
        let context = template.takes_context().then(|| passages.joined());
        Self {
            template,
            context,
            question: question.to_string(),
        }
    }

    /// Fields substituted into the system prompt
    pub fn fields(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        if let Some(ref context) = self.context {
            fields.insert("context".to_string(), context.clone());
        }
        fields
    }
}

/// Everything produced while answering one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub route: RouteDecision,
    /// Route proposed by the router before any fallback hop
    pub initial_route: RouteDecision,
    pub passages: PassageSet,
    pub answer: String,
    /// Calls made to the generation collaborator, including delegated policies
    pub generation_calls: usize,
}

impl ConversationTurn {
    /// Whether the knowledge-base to web fallback hop was taken
    pub fn fell_back(&self) -> bool {
        self.initial_route != self.route
    }
}
