//! The one error type handed back to front ends.
//!
//! Every failure in a download (metadata fetch, stream selection, byte
//! transfer, disk write) is reported to the user the same way: a single
//! "operation failed" message carrying the underlying error text. The stage is
//! kept for logs only.

use std::fmt;

/// Where in the pipeline a download failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Another download already holds the in-flight slot.
    Busy,
    /// Source URL rejected or metadata fetch failed.
    Resolve,
    /// No stream matches the requested resolution/container.
    Select,
    /// Opening the stream, reading bytes or writing them to disk.
    Transfer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Busy => "busy",
            Stage::Resolve => "resolve",
            Stage::Select => "select",
            Stage::Transfer => "transfer",
        };
        f.write_str(s)
    }
}

/// Generic download failure. Display is the user-facing message.
#[derive(Debug, thiserror::Error)]
#[error("operation failed: {message}")]
pub struct DownloadError {
    stage: Stage,
    message: String,
}

impl DownloadError {
    /// Wraps an internal error, flattening its context chain into the message.
    pub fn new(stage: Stage, err: anyhow::Error) -> Self {
        Self {
            stage,
            message: format!("{:#}", err),
        }
    }

    pub fn busy() -> Self {
        Self {
            stage: Stage::Busy,
            message: "a download is already in progress".to_string(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Underlying error text without the "operation failed" prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Attaches a [`Stage`] to an `anyhow` result.
pub trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, DownloadError>;
}

impl<T> StageExt<T> for anyhow::Result<T> {
    fn stage(self, stage: Stage) -> Result<T, DownloadError> {
        self.map_err(|e| DownloadError::new(stage, e))
    }
}
