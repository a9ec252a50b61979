//! Error types for reelforge-probe.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while probing media.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The probing tool exited with a non-zero status.
    #[error("{tool} failed on {}: {message}", path.display())]
    ProbeFailure {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a probe failure error.
    pub fn probe_failure(
        tool: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::ProbeFailure {
            tool: tool.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}
