//! Upload ingest pipeline.
//!
//! Explicit stages, in order: decode the bytes, extract the dominant colors,
//! write the original and thumbnail renditions into the assets directory,
//! persist the artwork with its weighted colors in one transaction, then
//! schedule the debounced palette regeneration. A decode failure aborts
//! before anything is written.

use crate::catalog::{Artwork, Catalog, Category};
use crate::error::Result;
use crate::extract::{palette_from_image, DEFAULT_COLOR_COUNT, DEFAULT_QUALITY};
use crate::scheduler::RegenScheduler;
use image::imageops::FilterType;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Side of the square thumbnail rendition
const THUMBNAIL_SIZE: u32 = 256;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub name: String,
    pub category: Category,
    pub source: String,
    pub count: u8,
    pub quality: u8,
}

impl IngestOptions {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        IngestOptions {
            name: name.into(),
            category,
            source: "upload".to_string(),
            count: DEFAULT_COLOR_COUNT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Runs the full ingest pipeline for one uploaded image.
pub fn ingest_artwork(
    catalog: &mut Catalog,
    scheduler: &RegenScheduler,
    assets_dir: &Path,
    bytes: &[u8],
    opts: &IngestOptions,
) -> Result<Artwork> {
    let img = image::load_from_memory(bytes)?;
    let colors = palette_from_image(&img, opts.count, opts.quality);
    log::debug!(
        "extracted {} colors for {:?}: {:?}",
        colors.len(),
        opts.name,
        colors.iter().map(|c| c.hex()).collect::<Vec<_>>()
    );

    let stem = Uuid::new_v4().simple().to_string();
    let media_dir = assets_dir.join("media");
    fs::create_dir_all(&media_dir)?;

    let original = media_dir.join(format!("{stem}.png"));
    img.save(&original)?;
    let thumb_path = media_dir.join(format!("{stem}.thumbnail.png"));
    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    thumbnail.save(&thumb_path)?;

    let persisted = catalog.create_artwork(
        &opts.name,
        opts.category,
        &format!("{stem}.png"),
        &opts.source,
        &colors,
    );
    let artwork = match persisted {
        Ok(artwork) => artwork,
        Err(e) => {
            // The insert rolled back; don't leave orphaned renditions behind
            let _ = fs::remove_file(&original);
            let _ = fs::remove_file(&thumb_path);
            return Err(e);
        }
    };

    scheduler.schedule();
    Ok(artwork)
}
