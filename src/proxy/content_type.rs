//! Content type resolution for proxied blobs.

use std::path::Path;

/// Used when neither the blob nor its name says what it is.
pub const DEFAULT_CONTENT_TYPE: &str = "image/svg+xml";

/// Pick the response content type.
///
/// Prefers what the storage service reported, then the file extension.
pub fn resolve_content_type(name: &str, reported: Option<&str>) -> String {
    if let Some(reported) = reported.map(str::trim).filter(|s| !s.is_empty()) {
        return reported.to_string();
    }

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

fn from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}
