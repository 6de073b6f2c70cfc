//! Helpers for inspecting rendered PNG output in tests.

use image::RgbaImage;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Whether the bytes start with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() > PNG_SIGNATURE.len() && bytes[..8] == PNG_SIGNATURE
}

/// Decode PNG bytes into an RGBA image, panicking with context on failure.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("invalid PNG ({} bytes): {}", bytes.len(), e))
        .to_rgba8()
}

/// Width and height from the IHDR chunk.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if !is_png(bytes) || bytes.len() < 24 || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// Color type byte from the IHDR chunk (3 = indexed, 6 = RGBA).
pub fn png_color_type(bytes: &[u8]) -> Option<u8> {
    png_dimensions(bytes)?;
    bytes.get(25).copied()
}

/// All `tEXt` chunks as (keyword, text) pairs.
pub fn png_text_chunks(bytes: &[u8]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= bytes.len() {
        let len = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]) as usize;
        let kind = &bytes[pos + 4..pos + 8];
        let data_end = pos + 8 + len;
        if data_end > bytes.len() {
            break;
        }
        if kind == b"tEXt" {
            let data = &bytes[pos + 8..data_end];
            if let Some(nul) = data.iter().position(|b| *b == 0) {
                let key: String = data[..nul].iter().map(|b| *b as char).collect();
                let text: String = data[nul + 1..].iter().map(|b| *b as char).collect();
                out.push((key, text));
            }
        }
        pos = data_end + 4; // skip CRC
    }
    out
}

/// Count pixels that are not pure white.
pub fn count_non_background(img: &RgbaImage) -> usize {
    img.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count()
}
