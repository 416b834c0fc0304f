//! Error types for the Telegram front end.

use thiserror::Error;

/// Errors that can stop the bot from starting or running.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration could not be assembled.
    #[error("{0}")]
    Config(#[from] showcase_core::ConfigError),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Store directories could not be created.
    #[error("Storage error: {0}")]
    Storage(#[from] showcase_core::StorageError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
