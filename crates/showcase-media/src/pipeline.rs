//! The intake-and-resize pipeline.
//!
//! One upload moves through `received → stored → {resized | skipped | failed}`
//! and ends in exactly one [`Outcome`], which the chat layer turns into a
//! single reply. Nothing is shared between runs except the immutable
//! pipeline itself, so uploads from different chats can run concurrently.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use showcase_core::{MediaStore, ShowcaseConfig};
use tracing::{debug, info, warn};

use crate::error::{IntakeError, Result};
use crate::intake::IncomingMedia;
use crate::resize::Resizer;

/// Source of upload payloads.
///
/// Implemented by the chat layer; failures should be reported as
/// [`IntakeError::Transport`].
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the full payload behind `file_id`.
    async fn fetch(&self, file_id: &str) -> Result<Vec<u8>>;
}

/// Terminal state of one upload.
#[derive(Debug)]
pub enum Outcome {
    /// Raw file stored and resized copy written.
    Resized { raw: PathBuf, prepared: PathBuf },
    /// Raw file stored; no tool available so no resize was attempted.
    Skipped { raw: PathBuf, tool: String },
    /// Handling stopped at `error`. `raw` is set if the upload was stored.
    Failed {
        raw: Option<PathBuf>,
        error: IntakeError,
    },
}

impl Outcome {
    /// The prepared file, if one was produced.
    pub fn prepared(&self) -> Option<&Path> {
        match self {
            Outcome::Resized { prepared, .. } => Some(prepared),
            _ => None,
        }
    }

    /// The stored raw file, if the upload got that far.
    pub fn raw(&self) -> Option<&Path> {
        match self {
            Outcome::Resized { raw, .. } | Outcome::Skipped { raw, .. } => Some(raw),
            Outcome::Failed { raw, .. } => raw.as_deref(),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Resized { .. } => "resized",
            Outcome::Skipped { .. } => "skipped",
            Outcome::Failed { .. } => "failed",
        }
    }

    /// Text sent back to the user.
    pub fn reply_text(&self) -> String {
        match self {
            Outcome::Resized { raw, prepared } => format!(
                "Prepared: {}\nSaved to: {}\nOriginal kept as {}.",
                file_name(prepared),
                prepared.display(),
                file_name(raw)
            ),
            Outcome::Skipped { raw, tool } => format!(
                "Saved {}.\n{} not found; automatic preparation skipped. \
                Install {} and add it to PATH or set FFMPEG_BIN.",
                file_name(raw),
                tool,
                tool
            ),
            Outcome::Failed { raw, error } => match error {
                IntakeError::Transport(_) => format!("Could not download the file: {}", error),
                IntakeError::Storage(e) => format!("Could not save the file: {}", e),
                IntakeError::ToolNotFound { tool } => {
                    format!("{} not found; automatic preparation skipped.", tool)
                }
                IntakeError::Processing(msg) => match raw {
                    Some(raw) => format!(
                        "Saved {}, but preparation failed: {}",
                        file_name(raw),
                        msg
                    ),
                    None => format!("Preparation failed: {}", msg),
                },
            },
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Stores uploads and resizes them for the showcase.
#[derive(Debug, Clone)]
pub struct IntakePipeline {
    store: MediaStore,
    resizer: Resizer,
}

impl IntakePipeline {
    pub fn new(store: MediaStore, resizer: Resizer) -> Self {
        Self { store, resizer }
    }

    /// Pipeline wired from the startup configuration.
    pub fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(
            MediaStore::new(&config.raw_dir, &config.prepared_dir),
            Resizer::from_config(config),
        )
    }

    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    pub fn resizer(&self) -> &Resizer {
        &self.resizer
    }

    /// Handle one upload end to end. Never panics on I/O or tool failures;
    /// every error ends up in the returned [`Outcome`].
    pub async fn handle(&self, media: &IncomingMedia, fetcher: &dyn MediaFetcher) -> Outcome {
        info!(
            chat_id = media.chat_id,
            message_id = media.message_id,
            kind = %media.kind,
            file_name = ?media.file_name,
            mime = ?media.mime_type,
            size = ?media.file_size,
            "Upload received"
        );

        let outcome = self.run(media, fetcher).await;

        match &outcome {
            Outcome::Failed { error, .. } => warn!(
                chat_id = media.chat_id,
                message_id = media.message_id,
                error = %error,
                "Upload handling failed"
            ),
            other => info!(
                chat_id = media.chat_id,
                message_id = media.message_id,
                outcome = other.label(),
                raw = ?other.raw(),
                prepared = ?other.prepared(),
                "Upload handled"
            ),
        }
        outcome
    }

    async fn run(&self, media: &IncomingMedia, fetcher: &dyn MediaFetcher) -> Outcome {
        let data = match fetcher.fetch(&media.file_id).await {
            Ok(data) => data,
            Err(error) => return Outcome::Failed { raw: None, error },
        };
        debug!(file_id = %media.file_id, bytes = data.len(), "Payload downloaded");

        let raw = match self.store.store_raw_async(media.stored_name(), data).await {
            Ok(path) => path,
            Err(e) => {
                return Outcome::Failed {
                    raw: None,
                    error: e.into(),
                }
            }
        };

        let tool = match self.resizer.locator().require() {
            Ok(tool) => tool,
            Err(IntakeError::ToolNotFound { tool }) => {
                warn!(tool = %tool, raw = %raw.display(), "Resize tool not found; skipping preparation");
                return Outcome::Skipped { raw, tool };
            }
            Err(error) => {
                return Outcome::Failed {
                    raw: Some(raw),
                    error,
                }
            }
        };

        let prepared = self.store.prepared_path_for(&raw);
        match self.resizer.resize(&tool, &raw, &prepared).await {
            Ok(()) => Outcome::Resized { raw, prepared },
            Err(error) => Outcome::Failed {
                raw: Some(raw),
                error,
            },
        }
    }
}
