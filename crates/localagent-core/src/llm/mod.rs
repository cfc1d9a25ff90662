//! LLM integration
//!
//! Provides:
//! - The generation and embedding collaborator traits
//! - An Ollama HTTP client implementing both
//! - The fixed prompt templates

mod client;
mod prompts;
mod traits;

pub(crate) use client::{check_status, transport_error};
pub use client::OllamaClient;
pub use prompts::{
    build_grading_prompt, render_template, PromptTemplate, DIRECT_PROMPT, GRADER_PROMPT,
    KNOWLEDGE_BASE_PROMPT, ROUTER_PROMPT, WEB_PROMPT,
};
pub use traits::*;
