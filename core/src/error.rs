//! Error types for the portsweep-core library.

use thiserror::Error;

/// Result type alias for portsweep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while enumerating ports or loading configuration.
///
/// Per-connection races during a scan and expected termination failures are
/// not errors; they are folded into skipped rows and boolean outcomes.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}
