//! Config command

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use anyhow::Result;
use localagent_core::{Config, LocalAgentError};
use std::path::Path;

pub async fn run(args: ConfigArgs, path: &Path, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let config = Config::load_from(path)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                _ => {
                    println!("# {}", path.display());
                    print!("{}", serde_yaml::to_string(&config)?);
                }
            }
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(LocalAgentError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }
            Config::default().save_to(path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}
