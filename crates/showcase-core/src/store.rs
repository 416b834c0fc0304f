//! Raw and prepared file stores.
//!
//! Uploads land in the raw directory unchanged; resized copies go to the
//! prepared directory under the same stem. Every write goes through a temp
//! file in the target directory followed by a rename, so a reader never sees
//! a half-written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::naming::prepared_file_name;

/// Writes data to a file atomically.
///
/// This function writes to a temporary file first, then renames it to the
/// target path, creating the parent directory when missing.
///
/// # Errors
/// Returns an error if the directory cannot be created or the write or
/// rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    ensure_dir(dir)?;

    let mut temp_file = tempfile::Builder::new()
        .prefix(".incoming-")
        .tempfile_in(dir)
        .map_err(|source| StorageError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .write_all(data)
        .and_then(|_| temp_file.flush())
        .map_err(|source| StorageError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file
        .persist(path)
        .map_err(|e| StorageError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| StorageError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// The pair of directories uploads flow through.
#[derive(Debug, Clone)]
pub struct MediaStore {
    raw_dir: PathBuf,
    prepared_dir: PathBuf,
}

impl MediaStore {
    pub fn new(raw_dir: impl Into<PathBuf>, prepared_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            prepared_dir: prepared_dir.into(),
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn prepared_dir(&self) -> &Path {
        &self.prepared_dir
    }

    /// Create both directories if absent.
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_dir(&self.raw_dir)?;
        ensure_dir(&self.prepared_dir)
    }

    /// Path a raw upload named `file_name` is stored at.
    pub fn raw_path(&self, file_name: &str) -> PathBuf {
        self.raw_dir.join(file_name)
    }

    /// Path of the prepared counterpart of a raw file.
    pub fn prepared_path_for(&self, raw_path: &Path) -> PathBuf {
        let raw_name = raw_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.prepared_dir.join(prepared_file_name(&raw_name))
    }

    /// Persist an upload unchanged into the raw directory.
    pub fn store_raw(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.raw_path(file_name);
        debug!(path = %path.display(), bytes = data.len(), "Writing raw upload");
        atomic_write(&path, data)?;
        info!(path = %path.display(), bytes = data.len(), "Saved raw upload");
        Ok(path)
    }

    /// [`store_raw`](Self::store_raw) on the blocking thread pool.
    pub async fn store_raw_async(&self, file_name: String, data: Vec<u8>) -> Result<PathBuf> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.store_raw(&file_name, &data))
            .await
            .map_err(|e| StorageError::TaskAborted(e.to_string()))?
    }
}
