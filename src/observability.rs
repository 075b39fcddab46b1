//! Logging initialization
//!
//! Configures a `tracing-subscriber` registry with an `EnvFilter` and a
//! `fmt` layer writing to stderr. Standard output is left to the caller for
//! plan output and JSON reports.

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-readable format
    Pretty,
    /// JSON lines for log aggregation
    Json,
    /// Compact single-line format
    #[default]
    Compact,
}

impl LogFormat {
    /// Parse a format name; unknown names yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Log output format
    pub log_format: LogFormat,
    /// Log level filter (e.g., "warn", "xccdf_tailor=debug")
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LOG_FORMAT`: "pretty", "json", or "compact" (default: "compact")
    /// - `RUST_LOG`: Log filter directive (default: "warn")
    pub fn from_env() -> Self {
        let log_format = env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

        Self {
            log_format,
            log_filter,
        }
    }

    /// Raise the filter to `debug` for this crate and the CLI
    pub fn verbose(mut self) -> Self {
        self.log_filter = "xccdf_tailor=debug,xccdf_tailor_cli=debug".to_string();
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| ObservabilityError::Config(format!("Invalid log filter: {}", e)))?;

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Pretty => subscriber
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => subscriber
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ObservabilityError::Provider(format!("Failed to init tracing: {}", e)))
}

/// Logging initialization errors
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// Invalid configuration
    #[error("Observability config error: {0}")]
    Config(String),
    /// Subscriber installation failed
    #[error("Provider error: {0}")]
    Provider(String),
}
