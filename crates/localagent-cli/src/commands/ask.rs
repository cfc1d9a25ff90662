//! Ask command

use super::with_policies;
use crate::app::{AskArgs, OutputFormat};
use crate::output::{self, TurnOptions};
use anyhow::Result;
use localagent_core::{Agent, Config, LocalAgentError};

pub async fn run(args: AskArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let question = args.question_text();
    if question.trim().is_empty() {
        return Err(LocalAgentError::InvalidInput("question is empty".to_string()).into());
    }

    let config = with_policies(config, &args.policy);
    let agent = Agent::from_config(&config)?;
    let turn = agent.run(&question).await?;

    let options = TurnOptions {
        show_context: args.show_context,
    };
    output::print_turn(&turn, format, &options)?;
    Ok(())
}
