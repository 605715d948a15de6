//! MIME helpers for uploaded card images and generated audio files.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "webp"         => "image/webp",
        "gif"          => "image/gif",

        "mp3"          => "audio/mpeg",
        "ogg"          => "audio/ogg",
        "wav"          => "audio/wav",

        "json"         => "application/json",

        _              => "application/octet-stream",
    }
}

/// File extension used when persisting bytes of the given type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match content_type_essence(mime).as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png"                => "png",
        "image/webp"               => "webp",
        "image/gif"                => "gif",
        "audio/mpeg"               => "mp3",
        "audio/ogg"                => "ogg",
        "audio/wav"                => "wav",
        _                          => "bin",
    }
}

/// Lowercased `type/subtype` with any `; param=...` suffix dropped.
pub fn content_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Whether a file is safe to serve inline (not just download).
pub fn is_inline_safe(mime: &str) -> bool {
    matches!(
        mime,
        "image/jpeg" | "image/png" | "image/webp"
        | "audio/mpeg" | "audio/ogg" | "audio/wav"
    )
}
