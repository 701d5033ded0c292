//! Media URL classification and upload naming

use regex::Regex;
use std::sync::LazyLock;

use crate::content::ContentType;

const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "webm", "ogg", "mov", "avi", "mkv", "flv", "m4v"];

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-zA-Z0-9]+)(\?|$)").expect("valid extension regex"));

/// True when the URL mentions a video extension anywhere.
///
/// This is a substring check, not an extension parse: `clip.mp4.png` and
/// `img.png?src=a.mov` both classify as video.
pub fn is_video_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let lower = url.to_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .any(|ext| lower.contains(&format!(".{}", ext)))
}

/// Extension of the first `.ext` segment that ends the path or precedes a query string.
pub fn file_extension(url: &str) -> String {
    EXTENSION
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default()
}

/// Bucket path for a new upload: `{type}s/{timestamp_ms}-{token}.{ext}`
///
/// `ext` is whatever follows the last dot, so a name without one keeps the
/// whole name as its extension (`reel` becomes `...-{token}.reel`).
pub fn upload_path(
    content_type: ContentType,
    original_name: &str,
    timestamp_ms: i64,
    token: &str,
) -> String {
    let base = format!("{}/{}-{}", content_type.plural(), timestamp_ms, token);
    match original_name.rsplit('.').next() {
        Some(ext) if !ext.is_empty() && !ext.contains(['/', '\\']) => format!("{}.{}", base, ext),
        _ => base,
    }
}

/// Whether an upload with this MIME type is allowed for the content type
pub fn accepts_mime(content_type: ContentType, mime: &str) -> bool {
    let mime = mime.to_ascii_lowercase();
    match content_type {
        ContentType::Video => mime.starts_with("video/") || mime.starts_with("image/"),
        ContentType::Certificate | ContentType::Website => mime.starts_with("image/"),
    }
}
