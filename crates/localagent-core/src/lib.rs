//! LocalAgent Core Library
//!
//! Question routing and context assembly for a local retrieval-augmented
//! assistant.
//!
//! # Features
//! - Routing between a knowledge base, web search and direct answers
//! - Keyword, greeting-pattern and LLM-delegated routing policies
//! - Relevance gate with a single knowledge-base to web fallback
//! - Elasticsearch kNN retrieval and DuckDuckGo web search
//! - Generation and embeddings through an Ollama server
//! - Document ingestion into the vector index

pub mod agent;
pub mod config;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod search;

pub use agent::{
    Agent, ConversationTurn, GenerationRequest, Passage, PassageSet, RelevanceGate, Responder,
    Retriever, RouteDecision, Router, WebSearcher,
};
pub use config::{
    Config, IngestConfig, LLMServiceConfig, RelevanceConfig, RelevancePolicy, RoutingConfig,
    RoutingPolicy, SearchServiceConfig, WebSearchConfig,
};
pub use error::{Error, LocalAgentError, Result};
pub use ingest::IngestReport;
pub use llm::{ChatMessage, Embedder, LLMClient, OllamaClient, PromptTemplate};
pub use search::{
    DuckDuckGoSearch, ElasticsearchStore, KnowledgeSearch, SearchHit, VectorIndex, WebResult,
    WebSearch,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "localagent";
