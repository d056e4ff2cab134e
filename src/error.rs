//! Error types for the winpack binary boundary.

use thiserror::Error;

/// Result type alias for top-level operations
pub type Result<T> = std::result::Result<T, WinpackError>;

/// Main error type wrapping every failure the binary can surface
#[derive(Error, Debug)]
pub enum WinpackError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors while reading the project configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Packaging errors
    #[error("Packaging error: {0}")]
    Packager(#[from] crate::packager::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
