//! MIME type detection for uploaded and captured images.
//!
//! Browsers sometimes send camera blobs without a usable Content-Type, so the
//! server falls back to magic-number sniffing and then to the file extension.

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
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "heic"         => "image/heic",
        "tiff" | "tif" => "image/tiff",
        "txt"          => "text/plain",
        "json"         => "application/json",
        "pdf"          => "application/pdf",
        _              => "application/octet-stream",
    }
}

/// Identify common image formats from their leading bytes.
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Pick the MIME type to judge an upload by.
///
/// A specific declared type wins. A missing or generic
/// (`application/octet-stream`) one is replaced by the sniffed type, then by
/// the filename extension.
pub fn resolve_upload_mime(declared: Option<&str>, file_name: Option<&str>, bytes: &[u8]) -> String {
    let declared = declared
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("application/octet-stream"));
    if let Some(mime) = declared {
        return mime.to_string();
    }
    if let Some(mime) = sniff_image_type(bytes) {
        return mime.to_string();
    }
    file_name
        .map(|name| detect_mime_type(Path::new(name)))
        .unwrap_or("application/octet-stream")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("file.xyz")), "application/octet-stream");
    }

    #[test]
    fn sniffs_magic_numbers() {
        assert_eq!(sniff_image_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), Some("image/jpeg"));
        assert_eq!(
            sniff_image_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            Some("image/png")
        );
        assert_eq!(sniff_image_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_type(b"hello"), None);
    }

    #[test]
    fn declared_type_wins_over_sniffing() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(resolve_upload_mime(Some("text/plain"), None, &png), "text/plain");
    }

    #[test]
    fn generic_type_falls_back_to_sniffing_then_extension() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xDB];
        assert_eq!(
            resolve_upload_mime(Some("application/octet-stream"), Some("blob"), &jpeg),
            "image/jpeg"
        );
        assert_eq!(resolve_upload_mime(None, Some("snap.webp"), b"????"), "image/webp");
        assert_eq!(resolve_upload_mime(None, None, b"????"), "application/octet-stream");
    }

    #[test]
    fn image_prefix_check_is_case_insensitive() {
        assert!(is_image("Image/PNG"));
        assert!(!is_image("video/mp4"));
    }
}
