//! Color math for the gallery pipeline: packed/hex conversions, Euclidean
//! distance, greedy deduplication and similarity search.

mod combine;
mod convert;
mod distance;
mod similar;

pub use combine::combine_colors;
pub use convert::{hex_to_packed, hex_to_rgb, packed_to_hex, packed_to_rgb, rgb_to_hex, rgb_to_packed};
pub use distance::{distance, min_distance, EMPTY_SET_DISTANCE};
pub use similar::{expand_query_colors, similar_colors, DEFAULT_THRESHOLD};

use serde::{Deserialize, Serialize};

/// An RGB triple, each channel in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Packed 24-bit form, `r << 16 | g << 8 | b`
    pub fn packed(self) -> u32 {
        rgb_to_packed(self)
    }

    /// Six uppercase hex digits, zero-padded
    pub fn hex(self) -> String {
        rgb_to_hex(self)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb { r, g, b }
    }
}
