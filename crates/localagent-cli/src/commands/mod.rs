//! CLI command handlers

pub mod ask;
pub mod chat;
pub mod config;
pub mod ingest;
pub mod route;
pub mod status;

use crate::app::PolicyArgs;
use localagent_core::Config;

/// Copy of `config` with command-line policy overrides applied
pub fn with_policies(config: &Config, policy: &PolicyArgs) -> Config {
    let mut config = config.clone();
    if let Some(routing) = policy.routing {
        config.routing.policy = routing;
    }
    if let Some(relevance) = policy.relevance {
        config.relevance.policy = relevance;
    }
    config
}
