//! Interactive chat command
//!
//! Each line is answered as an independent turn; the agent keeps no state
//! between turns. The transcript below is for display only.

use super::with_policies;
use crate::app::{ChatArgs, OutputFormat};
use crate::output::{self, TurnOptions};
use anyhow::Result;
use localagent_core::{Agent, Config, ConversationTurn};
use std::io::{self, BufRead, Write};

const HELP: &str = "Commands: /history, /clear, /help, /quit";

/// A line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    History,
    Clear,
    Help,
    Quit,
    Blank,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    match line {
        "/quit" | "/exit" | "/q" => Input::Quit,
        "/history" => Input::History,
        "/clear" => Input::Clear,
        "/help" | "/?" => Input::Help,
        cmd if cmd.starts_with('/') => Input::Unknown(cmd),
        question => Input::Question(question),
    }
}

pub async fn run(args: ChatArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let config = with_policies(config, &args.policy);
    let agent = Agent::from_config(&config)?;
    let options = TurnOptions::default();
    let mut transcript: Vec<ConversationTurn> = Vec::new();

    eprintln!(
        "Chatting with {} (routing: {}, relevance: {}). {}",
        config.llm.model, config.routing.policy, config.relevance.policy, HELP
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_input(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Unknown(cmd) => println!("Unknown command {}. {}", cmd, HELP),
            Input::Clear => {
                transcript.clear();
                println!("History cleared");
            }
            Input::History => {
                if transcript.is_empty() {
                    println!("No history");
                }
                for (i, turn) in transcript.iter().enumerate() {
                    println!("{:>3}. [{}] {}", i + 1, turn.route, turn.question);
                }
            }
            Input::Question(question) => match agent.run(question).await {
                Ok(turn) => {
                    output::print_turn(&turn, format, &options)?;
                    transcript.push(turn);
                }
                Err(e) => {
                    tracing::warn!("Turn failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            },
        }
    }

    Ok(())
}
