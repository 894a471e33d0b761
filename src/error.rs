use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Error types for the gallery color pipeline and catalog
#[derive(Error, Debug)]
pub enum GalleryError {
    /// A color value could not be parsed (bad hex digits, wrong length)
    #[error("invalid color value: {value:?}")]
    ColorParse { value: String },

    /// Image bytes could not be decoded, or a rendition could not be encoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Catalog database error
    #[error("catalog error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A category string outside the closed set
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// Lookup by slug found nothing
    #[error("artwork not found: {0:?}")]
    NotFound(String),

    /// Config file existed but could not be parsed
    #[error("failed to parse config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Filesystem error (assets dir, renditions, palette output)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
