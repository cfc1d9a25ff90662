//! Terminal output formatter

use super::TurnOptions;
use localagent_core::{ConversationTurn, RouteDecision, RoutingPolicy};
use std::io::{self, IsTerminal, Write};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

fn color_choice() -> ColorChoice {
    if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub fn route_color(route: RouteDecision) -> Color {
    match route {
        RouteDecision::KnowledgeBase => Color::Green,
        RouteDecision::Web => Color::Cyan,
        RouteDecision::Direct => Color::Blue,
    }
}

fn write_route_label<W: WriteColor>(out: &mut W, route: RouteDecision) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(route_color(route))).set_bold(true))?;
    write!(out, "[{}]", route)?;
    out.reset()
}

pub fn write_turn<W: WriteColor>(
    out: &mut W,
    turn: &ConversationTurn,
    options: &TurnOptions,
) -> io::Result<()> {
    writeln!(out, "{}", turn.answer.trim_end())?;
    writeln!(out)?;

    write_route_label(out, turn.route)?;
    if turn.fell_back() {
        write!(out, " (fell back from {})", turn.initial_route)?;
    }
    writeln!(out)?;

    let sources = turn.passages.sources();
    if !sources.is_empty() {
        writeln!(out, "Sources:")?;
        for source in sources {
            writeln!(out, "  - {}", source)?;
        }
    }

    if options.show_context {
        if let Some(ref failure) = turn.passages.failure {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            writeln!(out, "note: {}", failure)?;
            out.reset()?;
        }
        for (i, passage) in turn.passages.iter().enumerate() {
            writeln!(out, "--- passage {} ({})", i + 1, passage.source)?;
            for line in passage.text.lines().take(5) {
                writeln!(out, "  {}", line)?;
            }
            if passage.text.lines().count() > 5 {
                writeln!(out, "  ...")?;
            }
        }
    }

    Ok(())
}

pub fn print_turn(turn: &ConversationTurn, options: &TurnOptions) -> io::Result<()> {
    let writer = BufferWriter::stdout(color_choice());
    let mut buffer = writer.buffer();
    write_turn(&mut buffer, turn, options)?;
    writer.print(&buffer)
}

pub fn print_route(route: RouteDecision, policy: RoutingPolicy) -> io::Result<()> {
    let writer = BufferWriter::stdout(color_choice());
    let mut buffer = writer.buffer();
    write_route_label(&mut buffer, route)?;
    writeln!(buffer, " via {}", policy)?;
    writer.print(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use localagent_core::{Passage, PassageSet};
    use termcolor::Buffer;

    fn turn(route: RouteDecision, initial_route: RouteDecision) -> ConversationTurn {
        ConversationTurn {
            question: "q".to_string(),
            route,
            initial_route,
            passages: PassageSet::new(vec![
                Passage::new("line one\nline two", Some("https://a.example".to_string())),
                Passage::new("other", None),
            ]),
            answer: "The answer.\n".to_string(),
            generation_calls: 1,
        }
    }

    fn render(turn: &ConversationTurn, options: &TurnOptions) -> String {
        let mut buffer = Buffer::no_color();
        write_turn(&mut buffer, turn, options).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_turn_shows_route_and_sources() {
        let text = render(
            &turn(RouteDecision::Web, RouteDecision::Web),
            &TurnOptions::default(),
        );
        assert!(text.starts_with("The answer.\n\n[web]\n"));
        assert!(text.contains("Sources:\n  - https://a.example\n"));
        assert!(!text.contains("unknown"));
        assert!(!text.contains("passage 1"));
    }

    #[test]
    fn test_turn_marks_fallback() {
        let text = render(
            &turn(RouteDecision::Web, RouteDecision::KnowledgeBase),
            &TurnOptions::default(),
        );
        assert!(text.contains("[web] (fell back from knowledge_base)"));
    }

    #[test]
    fn test_show_context_lists_passages() {
        let text = render(
            &turn(RouteDecision::KnowledgeBase, RouteDecision::KnowledgeBase),
            &TurnOptions { show_context: true },
        );
        assert!(text.contains("--- passage 1 (https://a.example)"));
        assert!(text.contains("  line two"));
        assert!(text.contains("--- passage 2 (unknown)"));
    }
}
