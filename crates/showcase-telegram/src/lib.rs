//! Telegram front end for the showcase bot.
//!
//! Users send a GIF or short video; the bot stores the original and replies
//! once the ffmpeg-resized copy (at most 750px wide) is ready, or explains
//! why it is not.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `FFMPEG_BIN`: Path to ffmpeg (default: looked up in `PATH`)
//! - `SHOWCASE_STATE_DIR`: Base directory (default: `~/.showcase-bot`)
//!
//! # Example
//!
//! ```no_run
//! use showcase_core::ShowcaseConfig;
//! use showcase_telegram::ShowcaseBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ShowcaseConfig::from_env()?;
//!     let bot = ShowcaseBot::new(&config);
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Welcome message
//! - `/help` - Show available commands

pub mod bot;
pub mod error;
pub mod fetcher;
pub mod handlers;

pub use bot::ShowcaseBot;
pub use error::{BotError, Result};
pub use fetcher::TelegramFetcher;
