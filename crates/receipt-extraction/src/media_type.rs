/// Detect media type from image data using magic numbers
///
/// Returns `None` when the bytes match none of the known signatures.
pub fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }

    // GIF: 47 49 46
    if data.starts_with(b"GIF") {
        return Some("image/gif");
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // HEIC: ....ftypheic / ftypheix / ftypmif1
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        let brand = &data[8..12];
        if brand == b"heic" || brand == b"heix" || brand == b"mif1" || brand == b"msf1" {
            return Some("image/heic");
        }
    }

    None
}
