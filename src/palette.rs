//! Palette sheet rendering: the combined swatch grid regenerated from the
//! whole catalog.

use crate::catalog::Catalog;
use crate::color::{combine_colors, Rgb};
use crate::error::Result;
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Side of one swatch in pixels
pub const SWATCH_SIZE: u32 = 500;
/// Swatches per row
pub const COLUMNS: u32 = 5;
/// Output filename under the assets directory
pub const PALETTE_FILENAME: &str = "palette.png";

/// Rasterizes the deduplicated colors as a row-major grid of solid swatches
/// on a transparent canvas. Canvas width is `min(n, COLUMNS) * SWATCH_SIZE`,
/// height `(n / COLUMNS + 1) * SWATCH_SIZE`, so the last row is padded with
/// transparent cells.
pub fn render(colors: &[Rgb]) -> RgbaImage {
    let n = colors.len() as u32;
    let width = n.min(COLUMNS) * SWATCH_SIZE;
    let height = (n / COLUMNS + 1) * SWATCH_SIZE;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for (idx, color) in colors.iter().enumerate() {
        let x0 = (idx as u32 % COLUMNS) * SWATCH_SIZE;
        let y0 = (idx as u32 / COLUMNS) * SWATCH_SIZE;
        let pixel = Rgba([color.r, color.g, color.b, 255]);
        for y in y0..y0 + SWATCH_SIZE {
            for x in x0..x0 + SWATCH_SIZE {
                canvas.put_pixel(x, y, pixel);
            }
        }
    }

    canvas
}

/// Full, idempotent regeneration of the palette sheet from every stored color
/// of every non-deleted artwork. Returns the output path, or `None` when the
/// catalog holds no colors yet.
pub fn generate(catalog: &Catalog, assets_dir: &Path, tolerance: f64) -> Result<Option<PathBuf>> {
    let colors = catalog.all_colors()?;
    let combined = combine_colors(&colors, tolerance);
    if combined.is_empty() {
        log::info!("no stored colors, skipping palette regeneration");
        return Ok(None);
    }

    let sheet = render(&combined);
    fs::create_dir_all(assets_dir)?;
    let output = assets_dir.join(PALETTE_FILENAME);
    sheet.save(&output)?;
    log::info!(
        "palette regenerated: {} swatches from {} stored colors -> {}",
        combined.len(),
        colors.len(),
        output.display()
    );
    Ok(Some(output))
}
