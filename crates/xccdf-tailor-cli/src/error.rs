//! Error types for the xccdf-tailor CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read error
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Benchmark or exclusion list could not be loaded
    #[error(transparent)]
    Plan(#[from] xccdf_tailor::Error),

    /// Refusing to overwrite an existing file
    #[error("{path} already exists. Use --force to overwrite.")]
    AlreadyExists { path: PathBuf },

    /// The tailoring tool could not be started
    #[error("Failed to run {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tailoring tool exited unsuccessfully
    #[error("{program} exited with {}", describe_exit(.code))]
    ToolFailed { program: String, code: Option<i32> },

    /// Logging setup failed
    #[error(transparent)]
    Observability(#[from] xccdf_tailor::observability::ObservabilityError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code to report for this error
    ///
    /// A failing tailoring tool's own exit code is passed through; every
    /// other error exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ToolFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
