//! Markdown output formatter

use super::TurnOptions;
use localagent_core::{ConversationTurn, RouteDecision, RoutingPolicy};

pub fn format_turn(turn: &ConversationTurn, options: &TurnOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("## {}\n\n", turn.question));
    output.push_str(turn.answer.trim_end());
    output.push_str("\n\n");

    output.push_str(&format!("**Route:** `{}`", turn.route));
    if turn.fell_back() {
        output.push_str(&format!(" (fell back from `{}`)", turn.initial_route));
    }
    output.push('\n');

    let sources = turn.passages.sources();
    if !sources.is_empty() {
        output.push_str("\n### Sources\n\n");
        for source in sources {
            output.push_str(&format!("- {}\n", source));
        }
    }

    if options.show_context && !turn.passages.is_empty() {
        output.push_str("\n### Context\n\n");
        for passage in turn.passages.iter() {
            output.push_str(&format!("```\n{}\n```\n\n", passage.text));
        }
    }

    output
}

pub fn format_route(question: &str, route: RouteDecision, policy: RoutingPolicy) -> String {
    format!("- **Question:** {}\n- **Route:** `{}`\n- **Policy:** `{}`\n", question, route, policy)
}
