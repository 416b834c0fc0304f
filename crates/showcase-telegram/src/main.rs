//! Showcase bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx cargo run -p showcase-telegram
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use showcase_core::{config, ShowcaseConfig};
use showcase_telegram::ShowcaseBot;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Showcase Bot - prepare GIFs for a storefront showcase
#[derive(Parser, Debug)]
#[command(name = "showcase-bot")]
#[command(about = "Telegram bot that stores GIFs and resizes them to 750px wide")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Env files never override variables already set
    config::load_env_files();

    let mut config = ShowcaseConfig::from_env()?;
    if args.verbose > 0 {
        config.debug = true;
    }

    init_logging(&config, args.verbose)?;

    if let Err(e) = config.ensure_dirs() {
        tracing::warn!(error = %e, "Failed to create all directories");
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    let bot = ShowcaseBot::new(&config);

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] Showcase Bot");
            println!("   Bot: @{}", username);
            println!("   Raw uploads: {}", config.raw_dir.display());
            println!("   Prepared:    {}", config.prepared_dir.display());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\n[phone] Open Telegram and send a GIF to begin");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}

/// Console logging, plus a plain-text file layer unless `LOG_TO_FILE` is off.
///
/// `RUST_LOG` wins; otherwise `-v` picks the level, otherwise `LOG_LEVEL`.
fn init_logging(config: &ShowcaseConfig, verbose: u8) -> std::io::Result<()> {
    let default_filter = match verbose {
        0 => {
            let level = &config.log_level;
            format!(
                "showcase_telegram={level},showcase_media={level},showcase_core={level},teloxide=warn"
            )
        }
        1 => "showcase_telegram=debug,showcase_media=debug,showcase_core=debug,teloxide=info"
            .to_string(),
        2 => "showcase_telegram=trace,showcase_media=trace,showcase_core=trace,teloxide=debug"
            .to_string(),
        _ => "trace".to_string(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}
