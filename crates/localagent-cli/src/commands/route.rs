//! Route command

use crate::app::{OutputFormat, RouteArgs};
use crate::output;
use anyhow::Result;
use localagent_core::{Config, LLMClient, OllamaClient, Router};
use std::sync::Arc;

pub async fn run(args: RouteArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let question = args.question_text();
    let policy = args.routing.unwrap_or(config.routing.policy);

    // Only the delegated policy talks to the model server
    let client: Arc<dyn LLMClient> = Arc::new(OllamaClient::new(config.llm.clone())?);
    let router = Router::new(config.routing.clone(), client);
    let route = router.route_with(&question, policy).await;

    output::print_route(&question, route, policy, format)?;
    Ok(())
}
