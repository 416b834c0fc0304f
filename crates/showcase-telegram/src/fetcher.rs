//! Payload download through the Bot API.

use async_trait::async_trait;
use showcase_media::{IntakeError, MediaFetcher};
use teloxide::net::Download;
use teloxide::prelude::*;
use tracing::debug;

/// Downloads uploads with `getFile` followed by a file download.
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaFetcher for TelegramFetcher {
    async fn fetch(&self, file_id: &str) -> showcase_media::Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(file_id.to_string())
            .await
            .map_err(|e| IntakeError::Transport(e.to_string()))?;
        debug!(file_id = %file_id, path = %file.path, "Downloading file");

        let mut data = Vec::new();
        self.bot
            .download_file(&file.path, &mut data)
            .await
            .map_err(|e| IntakeError::Transport(e.to_string()))?;

        if data.is_empty() {
            return Err(IntakeError::Transport("empty payload".to_string()));
        }
        Ok(data)
    }
}
