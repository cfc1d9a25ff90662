//! HTTP client for a local Ollama model server

use super::{ChatMessage, Embedder, LLMClient};
use crate::config::LLMServiceConfig;
use crate::error::{LocalAgentError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Ollama `/api/chat` and `/api/embed` client
pub struct OllamaClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl OllamaClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("localagent/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &LLMServiceConfig {
        &self.config
    }

    /// Names of the models the server has pulled
    pub async fn list_models(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct TagsResponse {
            #[serde(default)]
            models: Vec<ModelTag>,
        }

        #[derive(Deserialize)]
        struct ModelTag {
            name: String,
        }

        let url = format!("{}/api/tags", self.base_url());
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Model server").await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid /api/tags response: {}", e)))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            stream: bool,
            options: ChatOptions,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            message: ChatMessage,
        }

        let start = Instant::now();
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.config.temperature,
                num_predict: self.config.num_predict,
            },
        };

        let url = format!("{}/api/chat", self.base_url());
        tracing::debug!("POST {} (model {})", url, self.config.model);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Model server").await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid /api/chat response: {}", e)))?;

        tracing::debug!(
            "Chat completion: {} chars in {} ms",
            chat_response.message.content.len(),
            start.elapsed().as_millis()
        );

        Ok(chat_response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| LocalAgentError::Parse("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let url = format!("{}/api/embed", self.base_url());
        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, "Embedding service").await?;

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| LocalAgentError::Parse(format!("Invalid /api/embed response: {}", e)))?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(LocalAgentError::Parse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embed_response.embeddings.len()
            )));
        }

        Ok(embed_response.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }
}

/// Describe a failed send as a transport error
pub(crate) fn transport_error(url: &str, e: reqwest::Error) -> LocalAgentError {
    if e.is_timeout() {
        LocalAgentError::Transport(format!("Request to {} timed out", url))
    } else if e.is_connect() {
        LocalAgentError::Transport(format!("Cannot reach {}: {}", url, e))
    } else {
        LocalAgentError::Transport(format!("Request to {} failed: {}", url, e))
    }
}

/// Turn a non-success HTTP status into a transport error carrying the body
pub(crate) async fn check_status(
    response: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LocalAgentError::Transport(format!(
        "{} error (HTTP {}): {}",
        service, status, body
    )))
}
