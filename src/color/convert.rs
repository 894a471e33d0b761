//! Conversions between RGB triples, packed 24-bit integers and hex strings.
//!
//! Packed values above 0xFFFFFF are masked to their low 24 bits, so every
//! conversion is total and the documented round trips hold exactly.

use super::Rgb;
use crate::error::{GalleryError, Result};

const PACKED_MASK: u32 = 0x00FF_FFFF;

/// `r << 16 | g << 8 | b`
pub fn rgb_to_packed(rgb: Rgb) -> u32 {
    (rgb.r as u32) << 16 | (rgb.g as u32) << 8 | rgb.b as u32
}

/// Inverse of [`rgb_to_packed`]; high bits beyond 24 are ignored
pub fn packed_to_rgb(packed: u32) -> Rgb {
    let packed = packed & PACKED_MASK;
    Rgb {
        r: (packed >> 16 & 0xFF) as u8,
        g: (packed >> 8 & 0xFF) as u8,
        b: (packed & 0xFF) as u8,
    }
}

/// Six uppercase hex digits, zero-padded (255 -> "0000FF")
pub fn packed_to_hex(packed: u32) -> String {
    format!("{:06X}", packed & PACKED_MASK)
}

/// Parses exactly six hex digits, case-insensitive. Signs are not digits:
/// `from_str_radix` alone would accept "+1234F".
pub fn hex_to_packed(hex: &str) -> Result<u32> {
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GalleryError::ColorParse {
            value: hex.to_string(),
        });
    }
    u32::from_str_radix(hex, 16).map_err(|_| GalleryError::ColorParse {
        value: hex.to_string(),
    })
}

pub fn hex_to_rgb(hex: &str) -> Result<Rgb> {
    Ok(packed_to_rgb(hex_to_packed(hex)?))
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    packed_to_hex(rgb_to_packed(rgb))
}
