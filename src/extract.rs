//! Dominant-color extraction: decode, downscale, quantize.

use crate::color::Rgb;
use crate::error::Result;
use color_thief::ColorFormat;
use image::DynamicImage;

/// Longest side fed into the quantizer. Downscaling is purely a performance
/// bound; it does not materially change the extracted palette.
const MAX_DIMENSION: u32 = 700;

/// Default palette size
pub const DEFAULT_COLOR_COUNT: u8 = 5;
/// Default sampling quality (1 = every pixel, 10 = coarsest)
pub const DEFAULT_QUALITY: u8 = 1;

/// Extracts up to `count` representative colors from raw image bytes, ordered
/// by descending visual dominance. Fails with an image error if the bytes
/// cannot be decoded; low-color images degrade to fewer colors.
pub fn extract_palette(bytes: &[u8], count: u8, quality: u8) -> Result<Vec<Rgb>> {
    let img = image::load_from_memory(bytes)?;
    Ok(palette_from_image(&img, count, quality))
}

/// Same as [`extract_palette`] for an already-decoded image.
pub fn palette_from_image(img: &DynamicImage, count: u8, quality: u8) -> Vec<Rgb> {
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img.clone()
    };
    let rgb = img.to_rgb8();
    let quality = quality.clamp(1, 10);

    if let Some(palette) = quantized_palette(rgb.as_raw(), count, quality) {
        return palette;
    }

    // Median cut cannot split images with too few distinct colors; fall back
    // to the single most common bucketed color.
    log::debug!("quantizer found too few distinct colors, falling back to modal color");
    modal_color(&rgb).into_iter().collect()
}

/// Runs the median-cut quantizer, stepping the requested palette size down
/// when the color space cannot be cut that many times.
fn quantized_palette(pixels: &[u8], count: u8, quality: u8) -> Option<Vec<Rgb>> {
    let mut max_colors = count.max(2);
    loop {
        match color_thief::get_palette(pixels, ColorFormat::Rgb, quality, max_colors) {
            Ok(colors) if !colors.is_empty() => {
                return Some(
                    colors
                        .into_iter()
                        .take(count.max(1) as usize)
                        .map(|c| Rgb::new(c.r, c.g, c.b))
                        .collect(),
                );
            }
            _ if max_colors > 2 => max_colors -= 1,
            _ => return None,
        }
    }
}

/// Most common color after 5-bit-per-channel bucketing, mapped back to the
/// bucket center. None only for images with no opaque pixels at all.
fn modal_color(rgb: &image::RgbImage) -> Option<Rgb> {
    let mut buckets = vec![0u32; 32 * 32 * 32];
    for p in rgb.pixels() {
        let [r, g, b] = p.0;
        let idx = ((r >> 3) as usize) << 10 | ((g >> 3) as usize) << 5 | (b >> 3) as usize;
        buckets[idx] += 1;
    }
    let (best_idx, best_count) = buckets
        .iter()
        .enumerate()
        .max_by_key(|&(_, c)| c)?;
    if *best_count == 0 {
        return None;
    }
    let to_8 = |v5: u8| (v5 << 3) | (v5 >> 2);
    Some(Rgb::new(
        to_8((best_idx >> 10 & 31) as u8),
        to_8((best_idx >> 5 & 31) as u8),
        to_8((best_idx & 31) as u8),
    ))
}
