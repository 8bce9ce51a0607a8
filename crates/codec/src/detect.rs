//! Media-type sniffing from magic bytes.
//!
//! Admission into the conversion queue is gated on the candidate's media
//! type, so the CLI derives one from file content rather than trusting the
//! extension. Extension lookup exists as a fallback for formats whose
//! signatures are not sniffed here.

use std::path::Path;

/// Sniff the media type of an image from its leading bytes.
///
/// Returns `None` when the signature is not a known raster image; at least
/// 12 bytes are needed to recognize every supported container.
///
/// # Example
/// ```
/// use imgpress_codec::sniff_media_type;
///
/// let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
/// assert_eq!(sniff_media_type(&png), Some("image/png"));
/// assert_eq!(sniff_media_type(b"not an image"), None);
/// ```
pub fn sniff_media_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }

    // TIFF: II or MM (little/big endian)
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) {
        return Some("image/tiff");
    }

    // ISO-BMFF brands: AVIF and HEIC share the ftyp box layout
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        let brand = &data[8..12];
        if brand == b"avif" || brand == b"avis" {
            return Some("image/avif");
        }
        if brand == b"heic" || brand == b"heix" || brand == b"mif1" {
            return Some("image/heic");
        }
    }

    None
}

/// Look up a media type from a file extension.
///
/// Used when the content signature is unrecognized, e.g. truncated reads.
pub fn media_type_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" | "heif" => Some("image/heic"),
        _ => None,
    }
}
