//! JSON output formatter

use super::TurnOptions;
use localagent_core::{ConversationTurn, RouteDecision, RoutingPolicy};

pub fn format_turn(turn: &ConversationTurn, options: &TurnOptions) -> String {
    let mut output = serde_json::json!({
        "question": turn.question,
        "route": turn.route,
        "initial_route": turn.initial_route,
        "fell_back": turn.fell_back(),
        "answer": turn.answer,
        "sources": turn.passages.sources(),
        "generation_calls": turn.generation_calls,
    });
    if options.show_context {
        output["passages"] = serde_json::to_value(&turn.passages).unwrap_or_default();
    }

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_route(question: &str, route: RouteDecision, policy: RoutingPolicy) -> String {
    let output = serde_json::json!({
        "question": question,
        "route": route,
        "policy": policy,
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
