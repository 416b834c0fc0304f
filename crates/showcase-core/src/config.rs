//! Runtime configuration for the showcase bot.
//!
//! Everything is read from the process environment once at startup and
//! collected into a [`ShowcaseConfig`], which is then handed to the bot.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.showcase-bot/
//! ├── gifs/           # Raw uploads, byte-for-byte
//! ├── prepared_gifs/  # Resized output (max 750px wide)
//! ├── logs/           # Log file unless LOG_TO_FILE is off
//! └── config/
//!     └── .env.local  # Secrets (bot token)
//! ```
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather (required)
//! - `FFMPEG_BIN`: Explicit path to the ffmpeg executable
//! - `FFMPEG_TIMEOUT_SECS`: Upper bound for one ffmpeg run (default: 120)
//! - `SHOWCASE_STATE_DIR`: Override the base directory
//! - `SHOWCASE_RAW_DIR` / `SHOWCASE_PREPARED_DIR`: Override the stores
//! - `LOG_LEVEL`, `LOG_TO_FILE`, `LOG_FILE`: Logging setup
//! - `BOT_DEBUG`: Log media fields of every inbound message

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable overriding the ffmpeg location.
pub const FFMPEG_BIN_ENV: &str = "FFMPEG_BIN";

/// Environment variable for the ffmpeg timeout in seconds.
pub const FFMPEG_TIMEOUT_ENV: &str = "FFMPEG_TIMEOUT_SECS";

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "SHOWCASE_STATE_DIR";

/// Environment variable for custom raw upload directory.
pub const RAW_DIR_ENV: &str = "SHOWCASE_RAW_DIR";

/// Environment variable for custom prepared output directory.
pub const PREPARED_DIR_ENV: &str = "SHOWCASE_PREPARED_DIR";

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_TO_FILE_ENV: &str = "LOG_TO_FILE";
pub const LOG_FILE_ENV: &str = "LOG_FILE";
pub const DEBUG_ENV: &str = "BOT_DEBUG";

/// Default ffmpeg timeout.
pub const DEFAULT_FFMPEG_TIMEOUT_SECS: u64 = 120;

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".showcase-bot";

// Subdirectory names
const RAW_SUBDIR: &str = "gifs";
const PREPARED_SUBDIR: &str = "prepared_gifs";
const LOGS_SUBDIR: &str = "logs";
const CONFIG_SUBDIR: &str = "config";

const LOG_FILE_NAME: &str = "showcase-bot.log";

/// Get the base state directory.
///
/// Resolved from:
/// 1. `SHOWCASE_STATE_DIR` environment variable if set
/// 2. `~/.showcase-bot` if home directory is available
/// 3. `.showcase-bot` in current directory as fallback
pub fn state_dir() -> PathBuf {
    state_dir_with(&env_lookup)
}

/// Get the `.env.local` file holding secrets.
pub fn env_file() -> PathBuf {
    state_dir().join(CONFIG_SUBDIR).join(".env.local")
}

/// Load dotenv files into the process environment.
///
/// Variables already present in the environment are never overwritten, so
/// the first file to define a key wins: the state directory's
/// `config/.env.local`, then `./.env.local`, then `./.env`.
pub fn load_env_files() {
    let env_path = env_file();
    if env_path.exists() {
        match dotenvy::from_path(&env_path) {
            Ok(()) => debug!(path = %env_path.display(), "Loaded env file"),
            Err(e) => debug!(path = %env_path.display(), error = %e, "Could not load env file"),
        }
    }
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn state_dir_with(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    non_empty(lookup, STATE_DIR_ENV)
        .map(|p| expand_path(&p))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

fn non_empty(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Expand a leading `~` and environment references in a configured path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

/// Interpret the usual truthy spellings of a flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration handed to the bot at startup.
#[derive(Clone)]
pub struct ShowcaseConfig {
    /// Telegram bot token.
    pub bot_token: String,
    /// Explicit ffmpeg location; `None` means search `PATH`.
    pub ffmpeg_bin: Option<PathBuf>,
    /// Upper bound for a single ffmpeg run.
    pub ffmpeg_timeout: Duration,
    /// Base directory for default paths.
    pub state_dir: PathBuf,
    /// Where raw uploads are stored.
    pub raw_dir: PathBuf,
    /// Where resized output is stored.
    pub prepared_dir: PathBuf,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log file, when file logging is enabled.
    pub log_file: Option<PathBuf>,
    /// Log media fields of every inbound message.
    pub debug: bool,
}

impl ShowcaseConfig {
    /// Build the configuration from the process environment.
    ///
    /// Call [`load_env_files`] first to pick up dotenv files.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;

        let bot_token = non_empty(lookup, TOKEN_ENV).ok_or(ConfigError::NoToken)?;

        let ffmpeg_bin = non_empty(lookup, FFMPEG_BIN_ENV).map(|p| expand_path(&p));

        let ffmpeg_timeout = match non_empty(lookup, FFMPEG_TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: FFMPEG_TIMEOUT_ENV,
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_FFMPEG_TIMEOUT_SECS),
        };

        let state_dir = state_dir_with(lookup);
        let raw_dir = non_empty(lookup, RAW_DIR_ENV)
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| state_dir.join(RAW_SUBDIR));
        let prepared_dir = non_empty(lookup, PREPARED_DIR_ENV)
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| state_dir.join(PREPARED_SUBDIR));

        let log_level = non_empty(lookup, LOG_LEVEL_ENV)
            .map(|l| l.to_ascii_lowercase())
            .unwrap_or_else(|| "info".to_string());

        let log_to_file = non_empty(lookup, LOG_TO_FILE_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(true);
        let log_file = log_to_file.then(|| {
            non_empty(lookup, LOG_FILE_ENV)
                .map(|p| expand_path(&p))
                .unwrap_or_else(|| state_dir.join(LOGS_SUBDIR).join(LOG_FILE_NAME))
        });

        let debug = non_empty(lookup, DEBUG_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
            || log_level == "debug";

        Ok(Self {
            bot_token,
            ffmpeg_bin,
            ffmpeg_timeout,
            state_dir,
            raw_dir,
            prepared_dir,
            log_level,
            log_file,
            debug,
        })
    }

    /// Create the raw, prepared and (if used) log directories.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.raw_dir)?;
        std::fs::create_dir_all(&self.prepared_dir)?;
        if let Some(parent) = self.log_file.as_deref().and_then(Path::parent) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShowcaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowcaseConfig")
            .field("bot_token", &"<redacted>")
            .field("ffmpeg_bin", &self.ffmpeg_bin)
            .field("ffmpeg_timeout", &self.ffmpeg_timeout)
            .field("state_dir", &self.state_dir)
            .field("raw_dir", &self.raw_dir)
            .field("prepared_dir", &self.prepared_dir)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("debug", &self.debug)
            .finish()
    }
}
