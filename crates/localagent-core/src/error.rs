//! Error types for localagent

use thiserror::Error;

/// Result type alias using LocalAgentError
pub type Result<T> = std::result::Result<T, LocalAgentError>;

/// Error type alias for convenience
pub type Error = LocalAgentError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const SERVICE_UNAVAILABLE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for localagent
#[derive(Debug, Error)]
pub enum LocalAgentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Collaborator unreachable, timed out, or answered with a non-success status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Collaborator payload or delegated LLM reply could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// The generation collaborator failed; the turn has no answer
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LocalAgentError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Transport(_) | Self::Http(_) | Self::Generation(_) => {
                exit_codes::SERVICE_UNAVAILABLE
            }
            Self::InvalidInput(_) | Self::Config(_) | Self::Yaml(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether the error came from talking to an external service
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}
