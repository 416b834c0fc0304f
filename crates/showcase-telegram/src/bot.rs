//! Main Telegram bot implementation.

use std::sync::Arc;

use showcase_core::ShowcaseConfig;
use showcase_media::IntakePipeline;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::error::{BotError, Result};
use crate::handlers::{
    handle_command, handle_media, handle_other, handle_unknown_command, has_media, Command,
};

/// The showcase bot: polling loop plus the intake pipeline it feeds.
pub struct ShowcaseBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared, immutable pipeline used by every media handler.
    pipeline: Arc<IntakePipeline>,
    /// Log media fields of every inbound message.
    debug: bool,
}

impl ShowcaseBot {
    /// Create the bot from the startup configuration.
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self::with_pipeline(
            Bot::new(&config.bot_token),
            IntakePipeline::from_config(config),
            config.debug,
        )
    }

    /// Create the bot with a custom pipeline (for testing).
    pub fn with_pipeline(bot: Bot, pipeline: IntakePipeline, debug: bool) -> Self {
        Self {
            bot,
            pipeline: Arc::new(pipeline),
            debug,
        }
    }

    pub fn pipeline(&self) -> &IntakePipeline {
        &self.pipeline
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Start the bot in polling mode. Returns after Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        self.pipeline.store().ensure_dirs()?;

        let locator = self.pipeline.resizer().locator();
        match locator.locate() {
            Some(path) => info!(tool = locator.name(), path = %path.display(), "Resize tool available"),
            None => warn!(
                tool = locator.name(),
                "Resize tool not found; uploads will be stored without preparation"
            ),
        }

        let bot = self.bot.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let debug_media = self.debug;
        let debug_other = self.debug;

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(|bot: Bot, msg: Message, cmd: Command| {
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Handle unrecognized commands (start with / but didn't parse)
                        msg.text().map(|t| t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(|bot: Bot, msg: Message| async move {
                        handle_unknown_command(bot, msg).await
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| has_media(&msg))
                    .endpoint(move |bot: Bot, msg: Message| {
                        let pipeline = Arc::clone(&pipeline);
                        async move { handle_media(bot, msg, pipeline, debug_media).await }
                    }),
            )
            .branch(
                Update::filter_message().endpoint(move |bot: Bot, msg: Message| async move {
                    handle_other(bot, msg, debug_other).await
                }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}
