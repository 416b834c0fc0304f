//! Locating the external resize tool.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{IntakeError, Result};

/// Executable name searched on `PATH` when no override is configured.
pub const FFMPEG: &str = "ffmpeg";

/// Resolves an executable from an explicit override or `PATH`.
///
/// An override is authoritative: when it does not point at an executable the
/// tool counts as missing, even if another copy exists on `PATH`.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    name: String,
    override_path: Option<PathBuf>,
}

impl ToolLocator {
    pub fn new(name: impl Into<String>, override_path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            override_path,
        }
    }

    /// Locator for ffmpeg with an optional `FFMPEG_BIN`-style override.
    pub fn ffmpeg(override_path: Option<PathBuf>) -> Self {
        Self::new(FFMPEG, override_path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn override_path(&self) -> Option<&PathBuf> {
        self.override_path.as_ref()
    }

    /// Find the executable, if any.
    pub fn locate(&self) -> Option<PathBuf> {
        match &self.override_path {
            // which() checks a path containing separators directly and
            // requires the executable bit; bare names go through PATH.
            Some(path) => match which::which(path) {
                Ok(found) => {
                    debug!(tool = %self.name, path = %found.display(), "Using configured tool");
                    Some(found)
                }
                Err(e) => {
                    warn!(
                        tool = %self.name,
                        path = %path.display(),
                        error = %e,
                        "Configured tool is not an executable"
                    );
                    None
                }
            },
            None => which::which(&self.name).ok().map(|found| {
                debug!(tool = %self.name, path = %found.display(), "Tool found in PATH");
                found
            }),
        }
    }

    /// Like [`locate`](Self::locate) but as a `ToolNotFound` error.
    pub fn require(&self) -> Result<PathBuf> {
        self.locate().ok_or_else(|| IntakeError::ToolNotFound {
            tool: self.name.clone(),
        })
    }

    /// Check if the tool can be resolved right now.
    pub fn is_available(&self) -> bool {
        self.locate().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_override_is_not_found() {
        let locator = ToolLocator::ffmpeg(Some(PathBuf::from("/definitely/not/here/ffmpeg")));
        assert!(locator.locate().is_none());
        assert!(matches!(
            locator.require(),
            Err(IntakeError::ToolNotFound { ref tool }) if tool == "ffmpeg"
        ));
    }

    #[test]
    fn test_not_found_message() {
        let err = ToolLocator::ffmpeg(Some(PathBuf::from("/nope/ffmpeg")))
            .require()
            .unwrap_err();
        assert_eq!(err.to_string(), "ffmpeg not found");
    }

    #[test]
    fn test_unknown_name_not_on_path() {
        let locator = ToolLocator::new("showcase-no-such-tool-4f1c", None);
        assert!(!locator.is_available());
    }

    #[test]
    fn test_default_lookup_does_not_panic() {
        // Either ffmpeg is installed or not - both are valid
        let locator = ToolLocator::ffmpeg(None);
        let result = locator.require();
        assert!(result.is_ok() || matches!(result, Err(IntakeError::ToolNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_override_is_used() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-ffmpeg");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let locator = ToolLocator::ffmpeg(Some(path.clone()));
        assert_eq!(locator.locate(), Some(path));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_override_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ffmpeg.txt");
        std::fs::write(&path, "not a program").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let locator = ToolLocator::ffmpeg(Some(path));
        assert!(locator.locate().is_none());
    }
}
