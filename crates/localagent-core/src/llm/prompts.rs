//! Fixed prompt templates
//!
//! System prompts use `{field}` placeholders filled by [`render_template`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Answer strictly from retrieved knowledge-base passages
pub const KNOWLEDGE_BASE_PROMPT: &str = "You are a helpful assistant. Answer the user's question based ONLY on the provided context.\n\
Do NOT say you cannot access information. The context below IS your information source.\n\
If the context doesn't fully answer the question, say what you can from it.\n\
Be concise and accurate.\n\n\
Context:\n{context}";

/// Answer strictly from web search results, citing URLs
pub const WEB_PROMPT: &str = "You are a helpful assistant. Answer the user's question using ONLY the web search results below.\n\
These are real, live search results. Use them to answer.\n\
Do NOT say 'I cannot access real-time information'. The results below ARE real-time information.\n\
Cite sources (URLs) where possible. Be concise and accurate.\n\n\
Web search results:\n{context}";

/// Friendly assistant, no context
pub const DIRECT_PROMPT: &str =
    "You are a friendly, helpful assistant. Respond naturally to the user. Keep your answers concise.";

/// Single-word routing instruction used by delegated classification
pub const ROUTER_PROMPT: &str = "You are an expert at routing a user question to the right information source.\n\
Use 'vectorstore' for questions about the local knowledge base: Elasticsearch, search, vectors, \
embeddings, AI agents, RAG, LangChain, LangGraph, MCP or ingested documents.\n\
Use 'websearch' for current events, news, prices, weather or anything that changes over time.\n\
Use 'direct' for greetings, chitchat and general questions that need no lookup.\n\
Answer with exactly one word: vectorstore, websearch or direct. No explanation.";

/// Yes/no relevance instruction used by delegated grading
pub const GRADER_PROMPT: &str = "You are a grader assessing whether a retrieved document is relevant to a user question.\n\
If the document contains keywords or meaning related to the question, it is relevant.\n\
Answer with exactly one word: yes or no. No explanation.";

/// Which of the three answer templates a turn uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptTemplate {
    KnowledgeBase,
    Web,
    Direct,
}

impl PromptTemplate {
    /// Raw system prompt with placeholders
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => KNOWLEDGE_BASE_PROMPT,
            Self::Web => WEB_PROMPT,
            Self::Direct => DIRECT_PROMPT,
        }
    }

    /// Whether the template carries a `{context}` field
    pub fn takes_context(&self) -> bool {
        !matches!(self, Self::Direct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBase => "knowledge_base",
            Self::Web => "web",
            Self::Direct => "direct",
        }
    }
}

/// Substitute every `{key}` in `template` with its value.
/// Placeholders without a field are left as-is.
pub fn render_template(template: &str, fields: &HashMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (key, value) in fields {
        rendered = rendered.replace(&format!("{{{}}}", key), value);
    }
    rendered
}

/// User prompt sent with [`GRADER_PROMPT`] for a single passage
pub fn build_grading_prompt(passage: &str, question: &str) -> String {
    format!(
        "Retrieved document:\n\n{}\n\nUser question: {}",
        passage, question
    )
}
