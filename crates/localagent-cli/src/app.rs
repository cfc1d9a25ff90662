//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use localagent_core::{RelevancePolicy, RoutingPolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "localagent")]
#[command(
    author,
    version,
    about = "Local assistant that answers from your documents, the web, or the model itself"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "LOCALAGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single question
    Ask(AskArgs),

    /// Interactive chat session
    Chat(ChatArgs),

    /// Show which source a question would be routed to
    Route(RouteArgs),

    /// Check the model server, knowledge base and web search
    Status,

    /// Load documents into the knowledge base
    Ingest(IngestArgs),

    /// Show or create the config file
    Config(ConfigArgs),
}

/// Policy overrides shared by the question commands
#[derive(Args, Clone, Default)]
pub struct PolicyArgs {
    /// Routing policy (keyword_set, pattern_default, delegated_classification)
    #[arg(long)]
    pub routing: Option<RoutingPolicy>,

    /// Relevance policy (heuristic, delegated_grading)
    #[arg(long)]
    pub relevance: Option<RelevancePolicy>,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print the passages used as context
    #[arg(long)]
    pub show_context: bool,
}

#[derive(Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct RouteArgs {
    /// Question text
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Routing policy (keyword_set, pattern_default, delegated_classification)
    #[arg(long)]
    pub routing: Option<RoutingPolicy>,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Data directory (defaults to ingest.data_dir)
    pub dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
    Md,
}

impl AskArgs {
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}

impl RouteArgs {
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}
