//! Configuration management
//!
//! One explicit `Config` value is built at startup (YAML file, then
//! environment overrides baked into the `Default` impls) and handed to every
//! component at construction.

use crate::error::{LocalAgentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Local model server (generation and embeddings)
    #[serde(default)]
    pub llm: LLMServiceConfig,

    /// Knowledge-base search service
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Web search service
    #[serde(default)]
    pub web: WebSearchConfig,

    /// Question routing
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Relevance gate applied to knowledge-base passages
    #[serde(default)]
    pub relevance: RelevanceConfig,

    /// Document ingestion
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// LLM service configuration (Ollama-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL of the model server
    #[serde(default = "default_ollama_url")]
    pub url: String,

    /// Model used for chat generation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Model used for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Maximum number of tokens to generate
    #[serde(default)]
    pub num_predict: Option<u32>,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            num_predict: env_parse("LOCALAGENT_LLM_NUM_PREDICT"),
            timeout_secs: env_parse("LOCALAGENT_LLM_TIMEOUT"),
        }
    }
}

impl LLMServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_ollama_url() -> String {
    std::env::var("LOCALAGENT_OLLAMA_URL")
        .unwrap_or_else(|_| "http://localhost:11434".to_string())
}

fn default_chat_model() -> String {
    std::env::var("LOCALAGENT_LLM_MODEL").unwrap_or_else(|_| "llama3.2".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("LOCALAGENT_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "nomic-embed-text".to_string())
}

/// Elasticsearch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Base URL of the Elasticsearch node
    #[serde(default = "default_es_url")]
    pub url: String,

    /// Index holding the knowledge-base chunks
    #[serde(default = "default_index")]
    pub index: String,

    /// Passages requested per knowledge-base query
    #[serde(default = "default_kb_top_k")]
    pub top_k: usize,

    /// kNN candidate pool per shard
    #[serde(default = "default_num_candidates")]
    pub num_candidates: usize,

    /// Document field holding chunk text
    #[serde(default = "default_text_field")]
    pub text_field: String,

    /// Document field holding the dense vector
    #[serde(default = "default_vector_field")]
    pub vector_field: String,

    /// Dotted path of the source identifier inside `_source`
    #[serde(default = "default_source_field")]
    pub source_field: String,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            index: default_index(),
            top_k: default_kb_top_k(),
            num_candidates: default_num_candidates(),
            text_field: default_text_field(),
            vector_field: default_vector_field(),
            source_field: default_source_field(),
            timeout_secs: env_parse("LOCALAGENT_ELASTICSEARCH_TIMEOUT"),
        }
    }
}

impl SearchServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_es_url() -> String {
    std::env::var("LOCALAGENT_ELASTICSEARCH_URL")
        .unwrap_or_else(|_| "http://localhost:9200".to_string())
}

fn default_index() -> String {
    std::env::var("LOCALAGENT_ES_INDEX").unwrap_or_else(|_| "knowledge-base".to_string())
}

fn default_kb_top_k() -> usize {
    4
}

fn default_num_candidates() -> usize {
    50
}

fn default_text_field() -> String {
    "text".to_string()
}

fn default_vector_field() -> String {
    "vector".to_string()
}

fn default_source_field() -> String {
    "metadata.source".to_string()
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Endpoint of the HTML search front-end
    #[serde(default = "default_web_url")]
    pub url: String,

    /// Results requested per web query
    #[serde(default = "default_web_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// When false the web collaborator is treated as unavailable
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            url: default_web_url(),
            max_results: default_web_max_results(),
            timeout_secs: env_parse("LOCALAGENT_WEB_TIMEOUT"),
            enabled: std::env::var("LOCALAGENT_WEB_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

impl WebSearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_web_url() -> String {
    std::env::var("LOCALAGENT_WEB_URL")
        .unwrap_or_else(|_| "https://html.duckduckgo.com/html/".to_string())
}

fn default_web_max_results() -> usize {
    3
}

fn default_true() -> bool {
    true
}

/// Which routing strategy decides the information source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPolicy {
    /// Knowledge-base keywords, then current-events keywords, else direct
    #[default]
    KeywordSet,
    /// Greetings go direct, current events go to the web, everything else retrieves
    PatternDefault,
    /// One single-word LLM classification call
    DelegatedClassification,
}

impl FromStr for RoutingPolicy {
    type Err = LocalAgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "keyword_set" | "keyword" | "keywords" => Ok(Self::KeywordSet),
            "pattern_default" | "pattern" => Ok(Self::PatternDefault),
            "delegated_classification" | "delegated" | "llm" => {
                Ok(Self::DelegatedClassification)
            }
            other => Err(LocalAgentError::Config(format!(
                "Unknown routing policy: {}",
                other
            ))),
        }
    }
}

impl RoutingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeywordSet => "keyword_set",
            Self::PatternDefault => "pattern_default",
            Self::DelegatedClassification => "delegated_classification",
        }
    }
}

impl fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing configuration: the policy plus its keyword and phrase lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_routing_policy")]
    pub policy: RoutingPolicy,

    /// Substrings that send a question to the knowledge base (keyword-set policy)
    #[serde(default = "default_kb_keywords")]
    pub knowledge_base_keywords: Vec<String>,

    /// Substrings that send a question to the web (keyword-set policy)
    #[serde(default = "default_current_events_keywords")]
    pub current_events_keywords: Vec<String>,

    /// Leading phrases that mark chitchat (pattern-default policy)
    #[serde(default = "default_greeting_phrases")]
    pub greeting_phrases: Vec<String>,

    /// Substrings that mark current events (pattern-default policy)
    #[serde(default = "default_current_events_phrases")]
    pub current_events_phrases: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            policy: default_routing_policy(),
            knowledge_base_keywords: default_kb_keywords(),
            current_events_keywords: default_current_events_keywords(),
            greeting_phrases: default_greeting_phrases(),
            current_events_phrases: default_current_events_phrases(),
        }
    }
}

fn default_routing_policy() -> RoutingPolicy {
    std::env::var("LOCALAGENT_ROUTING_POLICY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_kb_keywords() -> Vec<String> {
    to_strings(&[
        "elasticsearch",
        "elastic",
        "search",
        "index",
        "query",
        "vector",
        "agent",
        "rag",
        "langchain",
        "langgraph",
        "mcp",
        "embedding",
        "document",
        "knowledge",
        "ingest",
        "kibana",
        "mapping",
        "esql",
        "retrieval",
        "chunk",
        "ollama",
    ])
}

fn default_current_events_keywords() -> Vec<String> {
    to_strings(&[
        "latest",
        "news",
        "current",
        "today",
        "weather",
        "price",
        "stock",
        "score",
        "who won",
        "what happened",
        "recent",
        "2024",
        "2025",
        "2026",
        "yesterday",
        "this week",
    ])
}

fn default_greeting_phrases() -> Vec<String> {
    to_strings(&[
        "hi",
        "hello",
        "hey",
        "good morning",
        "good afternoon",
        "good evening",
        "how are you",
        "what's up",
        "thanks",
        "thank you",
        "bye",
        "goodbye",
        "who are you",
        "what can you do",
    ])
}

fn default_current_events_phrases() -> Vec<String> {
    to_strings(&[
        "latest",
        "news",
        "today",
        "weather",
        "current",
        "stock price",
        "price of",
        "who won",
        "what happened",
        "recent",
        "this week",
        "yesterday",
    ])
}

/// Which relevance gate judges retrieved passages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelevancePolicy {
    /// Total trimmed text length must exceed a threshold
    #[default]
    Heuristic,
    /// One yes/no LLM call per passage
    DelegatedGrading,
}

impl FromStr for RelevancePolicy {
    type Err = LocalAgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "heuristic" | "length" => Ok(Self::Heuristic),
            "delegated_grading" | "delegated" | "llm" => Ok(Self::DelegatedGrading),
            other => Err(LocalAgentError::Config(format!(
                "Unknown relevance policy: {}",
                other
            ))),
        }
    }
}

impl RelevancePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::DelegatedGrading => "delegated_grading",
        }
    }
}

impl fmt::Display for RelevancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relevance gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceConfig {
    #[serde(default = "default_relevance_policy")]
    pub policy: RelevancePolicy,

    /// Passages whose combined trimmed text is this short or shorter are noise
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Upper bound on passages sent to delegated grading
    #[serde(default = "default_max_graded")]
    pub max_graded: usize,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            policy: default_relevance_policy(),
            min_chars: default_min_chars(),
            max_graded: default_max_graded(),
        }
    }
}

fn default_relevance_policy() -> RelevancePolicy {
    std::env::var("LOCALAGENT_RELEVANCE_POLICY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn default_min_chars() -> usize {
    50
}

fn default_max_graded() -> usize {
    4
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory scanned for documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name patterns to load
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks embedded and indexed per request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            patterns: default_patterns(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var("LOCALAGENT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn default_patterns() -> Vec<String> {
    to_strings(&["*.txt", "*.md", "*.csv", "*.rst", "*.pdf"])
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_batch_size() -> usize {
    50
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load config from a YAML file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config as YAML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject values that would make a component misbehave
    pub fn validate(&self) -> Result<()> {
        if self.search.top_k == 0 {
            return Err(LocalAgentError::Config("search.top_k must be at least 1".into()));
        }
        if self.web.max_results == 0 {
            return Err(LocalAgentError::Config("web.max_results must be at least 1".into()));
        }
        if self.relevance.max_graded == 0 {
            return Err(LocalAgentError::Config(
                "relevance.max_graded must be at least 1".into(),
            ));
        }
        if self.ingest.chunk_size == 0 || self.ingest.chunk_overlap >= self.ingest.chunk_size {
            return Err(LocalAgentError::Config(
                "ingest.chunk_overlap must be smaller than a non-zero ingest.chunk_size".into(),
            ));
        }
        if self.ingest.batch_size == 0 {
            return Err(LocalAgentError::Config("ingest.batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_constants() {
        let config = Config::default();
        assert_eq!(config.search.top_k, 4);
        assert_eq!(config.web.max_results, 3);
        assert_eq!(config.relevance.min_chars, 50);
        assert_eq!(config.relevance.max_graded, 4);
        assert_eq!(config.ingest.chunk_size, 500);
        assert_eq!(config.ingest.chunk_overlap, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "keyword_set".parse::<RoutingPolicy>().unwrap(),
            RoutingPolicy::KeywordSet
        );
        assert_eq!(
            "pattern-default".parse::<RoutingPolicy>().unwrap(),
            RoutingPolicy::PatternDefault
        );
        assert_eq!(
            "Delegated".parse::<RoutingPolicy>().unwrap(),
            RoutingPolicy::DelegatedClassification
        );
        assert!("coin_flip".parse::<RoutingPolicy>().is_err());

        assert_eq!(
            "delegated_grading".parse::<RelevancePolicy>().unwrap(),
            RelevancePolicy::DelegatedGrading
        );
        assert!("vibes".parse::<RelevancePolicy>().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
routing:
  policy: pattern_default
  greeting_phrases: ["yo"]
relevance:
  min_chars: 120
llm:
  model: qwen2.5
search:
  index: docs
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.routing.policy, RoutingPolicy::PatternDefault);
        assert_eq!(config.routing.greeting_phrases, vec!["yo".to_string()]);
        assert!(!config.routing.knowledge_base_keywords.is_empty());
        assert_eq!(config.relevance.min_chars, 120);
        assert_eq!(config.relevance.max_graded, 4);
        assert_eq!(config.search.top_k, 4);

        assert_eq!(config.llm.model, "qwen2.5");
        assert_eq!(config.llm.url, LLMServiceConfig::default().url);
        assert_eq!(config.search.index, "docs");
        assert_eq!(config.search.url, SearchServiceConfig::default().url);
        assert_eq!(config.search.vector_field, "vector");
    }

    #[test]
    fn test_partial_service_sections_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "llm:\n  model: qwen2.5\nsearch:\n  index: docs\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "qwen2.5");
        assert!(!config.llm.url.is_empty());
        assert_eq!(config.search.index, "docs");
        assert!(!config.search.url.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let mut config = Config::default();
        config.search.index = "docs".to_string();
        config.routing.policy = RoutingPolicy::DelegatedClassification;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.index, "docs");
        assert_eq!(loaded.routing.policy, RoutingPolicy::DelegatedClassification);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.search.top_k, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "ingest:\n  chunk_size: 10\n  chunk_overlap: 10\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(LocalAgentError::Config(_))
        ));
    }

    #[test]
    fn test_no_timeout_unless_configured() {
        let mut llm = LLMServiceConfig::default();
        llm.timeout_secs = None;
        assert!(llm.timeout().is_none());
        llm.timeout_secs = Some(90);
        assert_eq!(llm.timeout(), Some(Duration::from_secs(90)));
    }
}
