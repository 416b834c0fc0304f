//! Routing of raw Bot API messages into intake requests.

use serde_json::json;
use showcase_media::MediaKind;
use showcase_telegram::handlers::{extract_media, has_media, Extracted};
use teloxide::types::Message;

fn message(extra: serde_json::Value) -> Message {
    let mut value = json!({
        "message_id": 7,
        "date": 1717243200,
        "chat": {"id": -100123, "type": "supergroup", "title": "Shop"},
        "from": {"id": 31337, "is_bot": false, "first_name": "Sam"}
    });
    for (k, v) in extra.as_object().unwrap() {
        value[k] = v.clone();
    }
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_gif_message_routes_as_animation() {
    // Telegram attaches a GIF as both `animation` and `document`.
    let msg = message(json!({
        "animation": {
            "file_id": "anim-id",
            "file_unique_id": "anim-uid",
            "width": 320,
            "height": 240,
            "duration": 2,
            "file_name": "spin.gif.mp4",
            "mime_type": "video/mp4",
            "file_size": 1024
        },
        "document": {
            "file_id": "anim-id",
            "file_unique_id": "anim-uid",
            "file_name": "spin.gif.mp4",
            "mime_type": "video/mp4",
            "file_size": 1024
        }
    }));

    assert!(has_media(&msg));
    match extract_media(&msg) {
        Extracted::Clip(media) => {
            assert_eq!(media.kind, MediaKind::Animation);
            assert_eq!(media.file_id, "anim-id");
            assert_eq!(media.chat_id, -100123);
            assert_eq!(media.sender_id, Some(31337));
        }
        other => panic!("expected clip, got {:?}", other),
    }
}

#[test]
fn test_video_without_name_gets_fallback_stem() {
    let msg = message(json!({
        "video": {
            "file_id": "video-id",
            "file_unique_id": "video-uid",
            "width": 1920,
            "height": 1080,
            "duration": 4,
            "mime_type": "video/mp4",
            "file_size": 4096
        }
    }));

    match extract_media(&msg) {
        Extracted::Clip(media) => {
            assert_eq!(media.kind, MediaKind::Video);
            assert_eq!(media.file_name, None);
            assert_eq!(
                media.stored_name(),
                "-100123_7_20240601_120000_video.mp4"
            );
        }
        other => panic!("expected clip, got {:?}", other),
    }
}

#[test]
fn test_webm_document_is_accepted() {
    let msg = message(json!({
        "document": {
            "file_id": "doc-id",
            "file_unique_id": "doc-uid",
            "file_name": "loop.webm",
            "file_size": 512
        }
    }));

    match extract_media(&msg) {
        Extracted::Clip(media) => {
            assert_eq!(media.kind, MediaKind::Document);
            assert!(media.stored_name().ends_with("_loop.webm"));
        }
        other => panic!("expected clip, got {:?}", other),
    }
}

#[test]
fn test_photo_is_not_media_for_intake() {
    let msg = message(json!({
        "photo": [{
            "file_id": "photo-id",
            "file_unique_id": "photo-uid",
            "width": 90,
            "height": 90,
            "file_size": 100
        }]
    }));

    assert!(!has_media(&msg));
    assert!(matches!(extract_media(&msg), Extracted::Nothing));
}
