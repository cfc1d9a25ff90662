//! Context assembly and the final generation call

use super::{GenerationRequest, PassageSet, RouteDecision};
use crate::error::{LocalAgentError, Result};
use crate::llm::LLMClient;
use std::sync::Arc;

/// Builds the generation request for a route and dispatches it once
pub struct Responder {
    client: Arc<dyn LLMClient>,
}

impl Responder {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Answer the question from the passages selected for `route`.
    ///
    /// The generated text is returned unmodified. A failing generation
    /// collaborator is the one error surfaced to the caller.
    pub async fn respond(
        &self,
        question: &str,
        route: RouteDecision,
        passages: &PassageSet,
    ) -> Result<String> {
        let request = GenerationRequest::for_route(route, passages, question);
        self.dispatch(&request).await
    }

    /// Issue exactly one generation call for a prepared request
    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            "Generating with {} template ({} context chars)",
            request.template.as_str(),
            request.context.as_ref().map_or(0, |c| c.len())
        );

        let answer = self
            .client
            .generate(
                request.template.system_prompt(),
                &request.question,
                &request.fields(),
            )
            .await
            .map_err(|e| LocalAgentError::Generation(e.to_string()))?;

        tracing::info!("Generated response ({} chars)", answer.len());
        Ok(answer)
    }
}
