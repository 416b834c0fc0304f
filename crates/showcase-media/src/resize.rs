//! Width-bounded resize through ffmpeg.
//!
//! The tool writes into a hidden `.partial-*.mp4` file next to the final
//! output. Only a successful run renames it into place; any failure or
//! timeout drops the temp path, which deletes it.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use showcase_core::{ShowcaseConfig, StorageError};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{IntakeError, Result};
use crate::tool::ToolLocator;

/// Widest clip the showcase slot accepts.
pub const SHOWCASE_MAX_WIDTH: u32 = 750;

/// Lines of tool stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 6;

/// Encoding parameters for the prepared clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub max_width: u32,
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            max_width: SHOWCASE_MAX_WIDTH,
        }
    }
}

impl ResizeSpec {
    /// Scale filter: cap the width, never upscale, round both sides down to
    /// even numbers (libx264 with yuv420p rejects odd dimensions).
    pub fn scale_filter(&self) -> String {
        format!("scale='trunc(min({},iw)/2)*2':-2", self.max_width)
    }

    /// Full argument list for one run.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-nostdin",
            "-y",
            "-i",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(input.as_os_str().to_os_string());
        args.push("-vf".into());
        args.push(self.scale_filter().into());
        for flag in [
            "-c:v",
            "libx264",
            "-preset",
            "slow",
            "-crf",
            "18",
            "-pix_fmt",
            "yuv420p",
            "-an",
            "-movflags",
            "+faststart",
        ] {
            args.push(flag.into());
        }
        args.push(output.as_os_str().to_os_string());
        args
    }
}

/// Runs the resize tool with a timeout.
#[derive(Debug, Clone)]
pub struct Resizer {
    locator: ToolLocator,
    spec: ResizeSpec,
    timeout: Duration,
}

impl Resizer {
    pub fn new(locator: ToolLocator, spec: ResizeSpec, timeout: Duration) -> Self {
        Self {
            locator,
            spec,
            timeout,
        }
    }

    /// Resizer for the configured ffmpeg with the showcase width.
    pub fn from_config(config: &ShowcaseConfig) -> Self {
        Self::new(
            ToolLocator::ffmpeg(config.ffmpeg_bin.clone()),
            ResizeSpec::default(),
            config.ffmpeg_timeout,
        )
    }

    pub fn locator(&self) -> &ToolLocator {
        &self.locator
    }

    pub fn spec(&self) -> &ResizeSpec {
        &self.spec
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resize `input` into `output` using the already-resolved `tool`.
    ///
    /// # Errors
    /// - [`IntakeError::Processing`] if the tool cannot start, exits
    ///   non-zero, produces nothing, or exceeds the timeout
    /// - [`IntakeError::Storage`] if the output cannot be put in place
    pub async fn resize(&self, tool: &Path, input: &Path, output: &Path) -> Result<()> {
        let name = self.locator.name();
        let out_dir = output.parent().unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| StorageError::DirectoryError {
                path: out_dir.to_path_buf(),
                source,
            })?;

        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .suffix(".mp4")
            .tempfile_in(out_dir)
            .map_err(|source| StorageError::WriteError {
                path: output.to_path_buf(),
                source,
            })?
            .into_temp_path();

        let args = self.spec.args(input, &partial);
        debug!(tool = %tool.display(), args = ?args, "Running resize tool");

        let child = Command::new(tool)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                IntakeError::Processing(format!("failed to start {}: {}", tool.display(), e))
            })?;

        let result = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result
                .map_err(|e| IntakeError::Processing(format!("failed waiting for {}: {}", name, e)))?,
            Err(_) => {
                warn!(tool = %name, input = %input.display(), timeout = ?self.timeout, "Resize timed out");
                return Err(IntakeError::timed_out(name, self.timeout));
            }
        };

        if !result.status.success() {
            let tail = stderr_tail(&result.stderr);
            warn!(
                tool = %name,
                input = %input.display(),
                status = %result.status,
                stderr = %tail,
                "Resize tool failed"
            );
            return Err(IntakeError::Processing(if tail.is_empty() {
                format!("{} exited with {}", name, result.status)
            } else {
                format!("{} exited with {}:\n{}", name, result.status, tail)
            }));
        }

        let written = tokio::fs::metadata(&partial)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(IntakeError::Processing(format!("{} produced no output", name)));
        }

        partial.persist(output).map_err(|e| StorageError::WriteError {
            path: output.to_path_buf(),
            source: e.error,
        })?;

        info!(input = %input.display(), output = %output.display(), bytes = written, "Resized clip");
        Ok(())
    }
}

/// Last few non-empty stderr lines.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
