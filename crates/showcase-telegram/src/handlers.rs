//! Message handlers for the Telegram bot.

use std::sync::Arc;

use showcase_media::{is_supported_document, IncomingMedia, IntakePipeline, MediaKind};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::fetcher::TelegramFetcher;

/// Reply for messages that carry no clip.
pub const SEND_CLIP_HINT: &str = "Send a GIF animation or a video file.";

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,
}

/// What a message offers to the intake pipeline.
#[derive(Debug)]
pub enum Extracted {
    /// An animation, video or GIF/video document.
    Clip(IncomingMedia),
    /// A document in a format the showcase cannot use.
    Unsupported {
        file_name: Option<String>,
        mime_type: Option<String>,
    },
    /// No media at all.
    Nothing,
}

/// Pull the clip out of a message. Animation wins over video, video over
/// document, matching how Telegram attaches GIFs.
pub fn extract_media(msg: &Message) -> Extracted {
    if let Some(anim) = msg.animation() {
        return Extracted::Clip(IncomingMedia {
            file_id: anim.file.id.to_string(),
            kind: MediaKind::Animation,
            file_name: anim.file_name.clone(),
            mime_type: anim.mime_type.as_ref().map(|m| m.to_string()),
            file_size: Some(anim.file.size.into()),
            ..envelope(msg)
        });
    }

    if let Some(video) = msg.video() {
        return Extracted::Clip(IncomingMedia {
            file_id: video.file.id.to_string(),
            kind: MediaKind::Video,
            file_name: video.file_name.clone(),
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
            file_size: Some(video.file.size.into()),
            ..envelope(msg)
        });
    }

    if let Some(doc) = msg.document() {
        let mime_type = doc.mime_type.as_ref().map(|m| m.to_string());
        if !is_supported_document(doc.file_name.as_deref(), mime_type.as_deref()) {
            return Extracted::Unsupported {
                file_name: doc.file_name.clone(),
                mime_type,
            };
        }
        return Extracted::Clip(IncomingMedia {
            file_id: doc.file.id.to_string(),
            kind: MediaKind::Document,
            file_name: doc.file_name.clone(),
            mime_type,
            file_size: Some(doc.file.size.into()),
            ..envelope(msg)
        });
    }

    Extracted::Nothing
}

/// Message-level fields shared by every clip kind.
fn envelope(msg: &Message) -> IncomingMedia {
    IncomingMedia {
        file_id: String::new(),
        kind: MediaKind::Document,
        file_name: None,
        mime_type: None,
        file_size: None,
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        sender_id: msg.from.as_ref().map(|u| u.id.0),
        received_at: msg.date,
    }
}

/// Whether a message should be routed to [`handle_media`].
pub fn has_media(msg: &Message) -> bool {
    msg.animation().is_some() || msg.video().is_some() || msg.document().is_some()
}

/// One-line summary of the media fields present, for debug logging.
pub fn describe_media(msg: &Message) -> String {
    let mut parts = Vec::new();
    if let Some(anim) = msg.animation() {
        parts.push(format!("animation (file_name={:?})", anim.file_name));
    }
    if let Some(doc) = msg.document() {
        parts.push(format!(
            "document (file_name={:?} mime={:?})",
            doc.file_name,
            doc.mime_type.as_ref().map(|m| m.to_string())
        ));
    }
    if msg.video().is_some() {
        parts.push("video".to_string());
    }
    if msg.photo().is_some() {
        parts.push("photo".to_string());
    }
    if msg.sticker().is_some() {
        parts.push("sticker".to_string());
    }
    if parts.is_empty() {
        "<no media fields>".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Whether non-clip messages get a hint. Groups are left alone so ordinary
/// chatter, photos and stickers never trigger a reply.
pub fn hints_enabled(msg: &Message) -> bool {
    msg.chat.is_private()
}

/// Reply text for a rejected document.
pub fn unsupported_text(file_name: Option<&str>, mime_type: Option<&str>) -> String {
    format!(
        "Unsupported format: {} ({}). Send a GIF or a video.",
        file_name.unwrap_or("file"),
        mime_type.unwrap_or("unknown type")
    )
}

async fn reply(bot: &Bot, msg: &Message, text: String) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Handle a parsed command.
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg).await,
        Command::Help => handle_help(bot, msg).await,
    }
}

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message) -> ResponseResult<()> {
    let welcome = "Hi! Send me a GIF or a short video.\n\n\
        I'll save the original and prepare a copy no wider than 750px \
        for your showcase.\n\n\
        Type /help for all commands.";

    bot.send_message(msg.chat.id, welcome).await?;

    info!(chat_id = %msg.chat.id, user = ?msg.from.as_ref().map(|u| &u.username), "User started bot");
    Ok(())
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    let help_text = Command::descriptions().to_string();
    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}

/// Handle a command that did not parse. Groups may hold commands for other
/// bots, so only private chats get a reply.
pub async fn handle_unknown_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    if !hints_enabled(&msg) {
        return Ok(());
    }
    if let Some(text) = msg.text() {
        info!(cmd = %text, "Unrecognized command - sending response");
        let name = text.split_whitespace().next().unwrap_or(text);
        bot.send_message(
            msg.chat.id,
            format!("Unknown command: {}\n\nUse /help to see available commands.", name),
        )
        .await?;
    }
    Ok(())
}

/// Handle a message carrying an animation, video or document.
pub async fn handle_media(
    bot: Bot,
    msg: Message,
    pipeline: Arc<IntakePipeline>,
    debug_mode: bool,
) -> ResponseResult<()> {
    if debug_mode {
        debug!(chat_id = %msg.chat.id, message_id = msg.id.0, fields = %describe_media(&msg), "Media message");
    }

    match extract_media(&msg) {
        Extracted::Clip(media) => {
            if let Err(e) = bot
                .send_chat_action(msg.chat.id, ChatAction::UploadVideo)
                .await
            {
                warn!(chat_id = %msg.chat.id, error = %e, "Failed to send chat action");
            }

            let fetcher = TelegramFetcher::new(bot.clone());
            let outcome = pipeline.handle(&media, &fetcher).await;
            reply(&bot, &msg, outcome.reply_text()).await
        }
        Extracted::Unsupported {
            file_name,
            mime_type,
        } => {
            info!(chat_id = %msg.chat.id, file_name = ?file_name, mime = ?mime_type, "Unsupported document");
            if !hints_enabled(&msg) {
                return Ok(());
            }
            reply(
                &bot,
                &msg,
                unsupported_text(file_name.as_deref(), mime_type.as_deref()),
            )
            .await
        }
        Extracted::Nothing if hints_enabled(&msg) => {
            reply(&bot, &msg, SEND_CLIP_HINT.to_string()).await
        }
        Extracted::Nothing => Ok(()),
    }
}

/// Handle any other message (plain text, photos, stickers, ...).
///
/// Only private chats get the hint.
pub async fn handle_other(bot: Bot, msg: Message, debug_mode: bool) -> ResponseResult<()> {
    if debug_mode {
        debug!(
            chat_id = %msg.chat.id,
            message_id = msg.id.0,
            from = ?msg.from.as_ref().map(|u| u.id.0),
            fields = %describe_media(&msg),
            "Raw message"
        );
    }
    if !hints_enabled(&msg) {
        return Ok(());
    }
    reply(&bot, &msg, SEND_CLIP_HINT.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(extra: serde_json::Value) -> Message {
        let mut value = json!({
            "message_id": 42,
            "date": 1717243200,
            "chat": {"id": 555, "type": "private", "first_name": "Ann"},
            "from": {"id": 777, "is_bot": false, "first_name": "Ann"}
        });
        if let (Some(obj), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_animation() {
        let msg = message(json!({
            "animation": {
                "file_id": "CgACAgIAAxkBAAIB",
                "file_unique_id": "AgADBQAD",
                "width": 1200,
                "height": 800,
                "duration": 3,
                "file_name": "dance.mp4",
                "mime_type": "video/mp4",
                "file_size": 40960
            }
        }));

        match extract_media(&msg) {
            Extracted::Clip(media) => {
                assert_eq!(media.kind, MediaKind::Animation);
                assert_eq!(media.file_id, "CgACAgIAAxkBAAIB");
                assert_eq!(media.file_name.as_deref(), Some("dance.mp4"));
                assert_eq!(media.mime_type.as_deref(), Some("video/mp4"));
                assert_eq!(media.file_size, Some(40960));
                assert_eq!(media.chat_id, 555);
                assert_eq!(media.message_id, 42);
                assert_eq!(media.sender_id, Some(777));
                assert_eq!(media.stored_name(), "555_42_20240601_120000_dance.mp4");
            }
            other => panic!("expected clip, got {:?}", other),
        }
        assert!(has_media(&msg));
    }

    #[test]
    fn test_extract_gif_document() {
        let msg = message(json!({
            "document": {
                "file_id": "BQACAgIAAxkBAAIC",
                "file_unique_id": "AgADBgAD",
                "file_name": "party.gif",
                "mime_type": "image/gif",
                "file_size": 2048
            }
        }));

        match extract_media(&msg) {
            Extracted::Clip(media) => {
                assert_eq!(media.kind, MediaKind::Document);
                assert_eq!(media.stored_name(), "555_42_20240601_120000_party.gif");
            }
            other => panic!("expected clip, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_rejects_pdf() {
        let msg = message(json!({
            "document": {
                "file_id": "BQACAgIAAxkBAAID",
                "file_unique_id": "AgADBwAD",
                "file_name": "notes.pdf",
                "mime_type": "application/pdf",
                "file_size": 100
            }
        }));

        match extract_media(&msg) {
            Extracted::Unsupported {
                file_name,
                mime_type,
            } => {
                assert_eq!(file_name.as_deref(), Some("notes.pdf"));
                assert_eq!(mime_type.as_deref(), Some("application/pdf"));
                assert_eq!(
                    unsupported_text(file_name.as_deref(), mime_type.as_deref()),
                    "Unsupported format: notes.pdf (application/pdf). Send a GIF or a video."
                );
            }
            other => panic!("expected unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_plain_text() {
        let msg = message(json!({"text": "hello"}));
        assert!(matches!(extract_media(&msg), Extracted::Nothing));
        assert!(!has_media(&msg));
        assert_eq!(describe_media(&msg), "<no media fields>");
    }

    #[test]
    fn test_hints_only_in_private_chats() {
        let private = message(json!({"text": "hello"}));
        assert!(hints_enabled(&private));

        let group = message(json!({
            "chat": {"id": -100555, "type": "supergroup", "title": "Shop"},
            "text": "hello"
        }));
        assert!(!hints_enabled(&group));

        let small_group = message(json!({
            "chat": {"id": -4242, "type": "group", "title": "Team"},
            "text": "lunch?"
        }));
        assert!(!hints_enabled(&small_group));
    }

    #[test]
    fn test_unsupported_text_defaults() {
        assert_eq!(
            unsupported_text(None, None),
            "Unsupported format: file (unknown type). Send a GIF or a video."
        );
    }

    #[test]
    fn test_command_descriptions() {
        let help = Command::descriptions().to_string();
        assert!(help.contains("/start"));
        assert!(help.contains("/help"));
    }

    #[test]
    fn test_command_parse() {
        assert!(matches!(
            Command::parse("/start", "showcase_bot"),
            Ok(Command::Start)
        ));
        assert!(matches!(
            Command::parse("/help@showcase_bot", "showcase_bot"),
            Ok(Command::Help)
        ));
        assert!(Command::parse("/resize", "showcase_bot").is_err());
    }
}
