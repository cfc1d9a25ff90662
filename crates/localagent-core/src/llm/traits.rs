//! LLM trait definitions

use super::prompts::render_template;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text generation collaborator
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a chat completion for an ordered message list
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Render `{field}` placeholders of the system prompt, then issue one
    /// completion with the user prompt as the human turn
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        fields: &HashMap<String, String>,
    ) -> Result<String> {
        let system = render_template(system_prompt, fields);
        self.chat_completion(vec![ChatMessage::system(system), ChatMessage::user(user_prompt)])
            .await
    }

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
