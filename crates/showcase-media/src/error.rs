//! Error types for the intake pipeline.

use std::time::Duration;

use showcase_core::StorageError;
use thiserror::Error;

/// Everything that can end the handling of one upload early.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The payload could not be fetched from the chat platform.
    #[error("download failed: {0}")]
    Transport(String),

    /// The raw or prepared file could not be written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// No resize tool could be resolved.
    #[error("{tool} not found")]
    ToolNotFound { tool: String },

    /// The tool ran but did not produce output.
    #[error("{0}")]
    Processing(String),
}

impl IntakeError {
    pub(crate) fn timed_out(tool: &str, after: Duration) -> Self {
        IntakeError::Processing(format!("{} timed out after {:?}", tool, after))
    }
}

/// Result type alias for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;
