//! Intake and resize for showcase clips.
//!
//! The chat layer turns a message into an [`IncomingMedia`], provides a
//! [`MediaFetcher`] for the payload, and calls [`IntakePipeline::handle`].
//! The pipeline stores the raw upload, looks for ffmpeg and, when found,
//! writes a copy no wider than [`SHOWCASE_MAX_WIDTH`] pixels.
//!
//! # Example
//!
//! ```no_run
//! use showcase_core::ShowcaseConfig;
//! use showcase_media::IntakePipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShowcaseConfig::from_env()?;
//! let pipeline = IntakePipeline::from_config(&config);
//! println!("ffmpeg available: {}", pipeline.resizer().locator().is_available());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod intake;
pub mod pipeline;
pub mod resize;
pub mod tool;

pub use error::{IntakeError, Result};
pub use intake::{is_supported_document, IncomingMedia, MediaKind};
pub use pipeline::{IntakePipeline, MediaFetcher, Outcome};
pub use resize::{ResizeSpec, Resizer, SHOWCASE_MAX_WIDTH};
pub use tool::{ToolLocator, FFMPEG};
