//! Deterministic file names for stored uploads.
//!
//! A raw upload is named `{chat_id}_{message_id}_{YYYYmmdd_HHMMSS}_{stem}.{ext}`.
//! The chat/message pair is unique per Telegram update, so two uploads never
//! map to the same name. The prepared copy keeps the stem and always ends in
//! `.mp4`.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Longest stem kept from the original file name.
const MAX_STEM_LEN: usize = 64;

/// Extension used when neither the name nor the MIME type gives one.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Extension of every prepared file.
pub const PREPARED_EXTENSION: &str = "mp4";

static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars() -> &'static Regex {
    UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap())
}

/// Identity of one upload, as seen by the store.
#[derive(Debug, Clone)]
pub struct FileIdentity<'a> {
    pub chat_id: i64,
    pub message_id: i32,
    pub received_at: DateTime<Utc>,
    /// File name as sent by the user, if any.
    pub original_name: Option<&'a str>,
    pub mime_type: Option<&'a str>,
    /// Stem used when the upload carries no usable name (e.g. "animation").
    pub fallback_stem: &'a str,
}

impl FileIdentity<'_> {
    /// The raw file name for this upload.
    pub fn file_name(&self) -> String {
        let stem = self
            .original_name
            .map(|name| {
                Path::new(name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .map(|s| sanitize_stem(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| sanitize_stem(self.fallback_stem));

        format!(
            "{}_{}_{}_{}.{}",
            self.chat_id,
            self.message_id,
            self.received_at.format("%Y%m%d_%H%M%S"),
            stem,
            extension_for(self.original_name, self.mime_type)
        )
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` and cap the length.
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned = unsafe_chars().replace_all(stem.trim(), "_");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');
    cleaned.chars().take(MAX_STEM_LEN).collect()
}

/// Pick an extension from the original name, then the MIME type.
pub fn extension_for(original_name: Option<&str>, mime_type: Option<&str>) -> String {
    let from_name = original_name
        .and_then(|name| Path::new(name).extension())
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }

    let from_mime = mime_type.and_then(|mime| {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/gif" => Some("gif"),
            "video/mp4" => Some("mp4"),
            "video/webm" => Some("webm"),
            "video/quicktime" => Some("mov"),
            "video/x-matroska" => Some("mkv"),
            _ => None,
        }
    });

    from_mime.unwrap_or(DEFAULT_EXTENSION).to_string()
}

/// Name of the prepared counterpart of a raw file.
pub fn prepared_file_name(raw_name: &str) -> String {
    let stem = Path::new(raw_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw_name.to_string());
    format!("{}.{}", stem, PREPARED_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn identity<'a>(name: Option<&'a str>, mime: Option<&'a str>) -> FileIdentity<'a> {
        FileIdentity {
            chat_id: 4242,
            message_id: 17,
            received_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            original_name: name,
            mime_type: mime,
            fallback_stem: "animation",
        }
    }

    #[test]
    fn test_file_name_from_original() {
        let name = identity(Some("Dancing Cat.mp4"), Some("video/mp4")).file_name();
        assert_eq!(name, "4242_17_20240309_140507_Dancing_Cat.mp4");
    }

    #[test]
    fn test_file_name_falls_back_to_kind() {
        let name = identity(None, None).file_name();
        assert_eq!(name, "4242_17_20240309_140507_animation.mp4");
    }

    #[test]
    fn test_file_name_extension_from_mime() {
        let name = identity(Some("clip"), Some("image/gif")).file_name();
        assert_eq!(name, "4242_17_20240309_140507_clip.gif");
    }

    #[test]
    fn test_negative_chat_ids_are_kept() {
        let mut id = identity(Some("a.webm"), None);
        id.chat_id = -1001234;
        assert_eq!(id.file_name(), "-1001234_17_20240309_140507_a.webm");
    }

    #[test]
    fn test_distinct_messages_get_distinct_names() {
        let first = identity(Some("same.mp4"), None);
        let mut second = first.clone();
        second.message_id += 1;
        assert_ne!(first.file_name(), second.file_name());
    }

    #[test]
    fn test_sanitize_strips_path_tricks() {
        assert_eq!(sanitize_stem("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_stem("привет мир"), "");
        assert_eq!(sanitize_stem("ok-name_1.2"), "ok-name_1.2");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_stem(&long).len(), MAX_STEM_LEN);
    }

    #[test]
    fn test_unicode_name_uses_fallback_stem() {
        let name = identity(Some("привет.mp4"), None).file_name();
        assert_eq!(name, "4242_17_20240309_140507_animation.mp4");
    }

    #[test]
    fn test_extension_ignores_odd_suffixes() {
        assert_eq!(extension_for(Some("weird.m p4"), None), DEFAULT_EXTENSION);
        assert_eq!(extension_for(Some("UPPER.GIF"), None), "gif");
        assert_eq!(extension_for(None, Some("video/webm")), "webm");
        assert_eq!(extension_for(None, Some("application/zip")), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_prepared_file_name_keeps_stem() {
        assert_eq!(
            prepared_file_name("4242_17_20240309_140507_clip.gif"),
            "4242_17_20240309_140507_clip.mp4"
        );
        assert_eq!(prepared_file_name("a.mp4"), "a.mp4");
    }
}
