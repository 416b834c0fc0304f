//! Shared building blocks for the showcase bot.
//!
//! - [`config`]: environment-driven [`ShowcaseConfig`]
//! - [`naming`]: collision-free names for stored uploads
//! - [`store`]: raw/prepared directories with atomic writes

pub mod config;
pub mod error;
pub mod naming;
pub mod store;

pub use config::ShowcaseConfig;
pub use error::{ConfigError, Result, StorageError};
pub use naming::FileIdentity;
pub use store::MediaStore;
