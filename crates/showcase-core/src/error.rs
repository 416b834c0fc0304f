//! Error types for configuration and file storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling [`crate::ShowcaseConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors that can occur while writing to the raw or prepared store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create a store directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Background write task died before finishing.
    #[error("write task aborted: {0}")]
    TaskAborted(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
