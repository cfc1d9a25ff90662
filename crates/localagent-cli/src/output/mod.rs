//! Output formatters

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::app::OutputFormat;
use localagent_core::{ConversationTurn, RouteDecision, RoutingPolicy};
use std::io;

/// Format options for answered turns
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnOptions {
    /// Include the passages that were sent as context
    pub show_context: bool,
}

/// Print one answered turn to stdout
pub fn print_turn(
    turn: &ConversationTurn,
    format: OutputFormat,
    options: &TurnOptions,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print!("{}", json::format_turn(turn, options)),
        OutputFormat::Md => print!("{}", markdown::format_turn(turn, options)),
        OutputFormat::Cli => terminal::print_turn(turn, options)?,
    }
    Ok(())
}

/// Print a routing decision to stdout
pub fn print_route(
    question: &str,
    route: RouteDecision,
    policy: RoutingPolicy,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print!("{}", json::format_route(question, route, policy)),
        OutputFormat::Md => print!("{}", markdown::format_route(question, route, policy)),
        OutputFormat::Cli => terminal::print_route(route, policy)?,
    }
    Ok(())
}
