//! LocalAgent CLI
//!
//! Ask questions answered from a local knowledge base, the web, or the
//! model directly.

use anyhow::Result;
use clap::Parser;
use localagent_core::error::exit_codes;
use localagent_core::{Config, LocalAgentError};
use std::path::Path;

mod app;
mod commands;
mod output;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let format = cli.format;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, &load_config(&config_path)?, format).await,
        Commands::Chat(args) => commands::chat::run(args, &load_config(&config_path)?, format).await,
        Commands::Route(args) => {
            commands::route::run(args, &load_config(&config_path)?, format).await
        }
        Commands::Status => commands::status::run(&load_config(&config_path)?, format).await,
        Commands::Ingest(args) => {
            commands::ingest::run(args, &load_config(&config_path)?, format).await
        }
        // Not loaded first: `config init` must work when the existing file is broken
        Commands::Config(args) => commands::config::run(args, &config_path, format).await,
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_from(path)?;
    tracing::info!("Using config {}", path.display());
    Ok(config)
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<LocalAgentError>()
        .map(LocalAgentError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
