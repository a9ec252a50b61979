//! Error types for reelforge-reel.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conversion errors. Recoverable problems are reported as
/// [`crate::ReelWarning`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The media prober failed on a file referenced by the shot list.
    #[error("probing {} failed (line {line}): {source}", path.display())]
    ProbeFailure {
        /// Media path as resolved for probing.
        path: PathBuf,
        /// 1-based line of the shot list that referenced it.
        line: usize,
        #[source]
        source: reelforge_probe::Error,
    },

    /// An output file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The timeline handed to the writer breaks a model invariant.
    #[error("timeline '{name}' is invalid: {source}")]
    InvalidTimeline {
        name: String,
        #[source]
        source: reelforge_timeline::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a probe failure error.
    pub fn probe_failure(path: impl Into<PathBuf>, line: usize, source: reelforge_probe::Error) -> Self {
        Self::ProbeFailure {
            path: path.into(),
            line,
            source,
        }
    }

    /// Create an output write failure error.
    pub fn output_write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid timeline error.
    pub fn invalid_timeline(name: impl Into<String>, source: reelforge_timeline::Error) -> Self {
        Self::InvalidTimeline {
            name: name.into(),
            source,
        }
    }
}
