//! MIME type detection by file extension.

/// Fallback for unknown content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Guess a MIME type from a file name's extension.
pub fn mime_from_path(path: &str) -> Option<String> {
    let (_, ext) = path.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Pick the effective MIME type of an upload: the declared type unless it
/// is missing or generic, then the extension, then octet-stream.
pub fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    declared
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != OCTET_STREAM)
        .map(|m| m.to_ascii_lowercase())
        .or_else(|| mime_from_path(file_name))
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
