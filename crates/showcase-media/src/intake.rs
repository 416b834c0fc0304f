//! Inbound media as the pipeline sees it, independent of the chat library.

use chrono::{DateTime, Utc};
use showcase_core::FileIdentity;

/// File name suffixes accepted from plain document uploads.
const DOCUMENT_EXTENSIONS: &[&str] = &[".gif", ".mp4", ".webm"];

/// How the clip arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Telegram's GIF representation (an mp4 without sound).
    Animation,
    Video,
    /// A file sent as-is; only GIF/video documents are accepted.
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Animation => "animation",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }

    /// Stem used for uploads that carry no file name.
    fn fallback_stem(&self) -> &'static str {
        match self {
            MediaKind::Animation => "animation",
            MediaKind::Video => "video",
            MediaKind::Document => "file",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound clip reference plus the message it came with.
#[derive(Debug, Clone)]
pub struct IncomingMedia {
    /// Platform file identifier used to download the payload.
    pub file_id: String,
    pub kind: MediaKind,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    /// Size announced by the platform, if known.
    pub file_size: Option<u64>,
    pub chat_id: i64,
    pub message_id: i32,
    pub sender_id: Option<u64>,
    pub received_at: DateTime<Utc>,
}

impl IncomingMedia {
    /// Store identity of this upload.
    pub fn identity(&self) -> FileIdentity<'_> {
        FileIdentity {
            chat_id: self.chat_id,
            message_id: self.message_id,
            received_at: self.received_at,
            original_name: self.file_name.as_deref(),
            mime_type: self.mime_type.as_deref(),
            fallback_stem: self.kind.fallback_stem(),
        }
    }

    /// Name of the raw file this upload is stored as.
    pub fn stored_name(&self) -> String {
        self.identity().file_name()
    }
}

/// Whether a document upload looks like a GIF or a video.
pub fn is_supported_document(file_name: Option<&str>, mime_type: Option<&str>) -> bool {
    let name_ok = file_name
        .map(|n| n.to_ascii_lowercase())
        .is_some_and(|n| DOCUMENT_EXTENSIONS.iter().any(|ext| n.ends_with(ext)));

    let mime_ok = mime_type
        .map(|m| m.to_ascii_lowercase())
        .is_some_and(|m| m.contains("gif") || m.starts_with("video/"));

    name_ok || mime_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn media(kind: MediaKind, name: Option<&str>) -> IncomingMedia {
        IncomingMedia {
            file_id: "AgADBAAD".to_string(),
            kind,
            file_name: name.map(String::from),
            mime_type: Some("video/mp4".to_string()),
            file_size: Some(1024),
            chat_id: 99,
            message_id: 5,
            sender_id: Some(7),
            received_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_supported_documents() {
        assert!(is_supported_document(Some("cat.GIF"), None));
        assert!(is_supported_document(Some("cat.webm"), Some("application/octet-stream")));
        assert!(is_supported_document(None, Some("image/gif")));
        assert!(is_supported_document(Some("clip.bin"), Some("video/quicktime")));
    }

    #[test]
    fn test_unsupported_documents() {
        assert!(!is_supported_document(Some("notes.pdf"), Some("application/pdf")));
        assert!(!is_supported_document(Some("photo.jpg"), Some("image/jpeg")));
        assert!(!is_supported_document(None, None));
    }

    #[test]
    fn test_stored_name_uses_kind_when_unnamed() {
        let m = media(MediaKind::Animation, None);
        assert_eq!(m.stored_name(), "99_5_20250102_030405_animation.mp4");

        let m = media(MediaKind::Document, None);
        assert_eq!(m.stored_name(), "99_5_20250102_030405_file.mp4");
    }

    #[test]
    fn test_stored_name_keeps_original_stem() {
        let m = media(MediaKind::Video, Some("my clip.mp4"));
        assert_eq!(m.stored_name(), "99_5_20250102_030405_my_clip.mp4");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MediaKind::Animation.to_string(), "animation");
        assert_eq!(MediaKind::Document.as_str(), "document");
    }
}
