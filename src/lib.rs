//! # wallery
//!
//! Gallery backend core: artworks are ingested, their dominant colors
//! extracted and stored with rank weights in a SQLite catalog, exposed
//! through a paginated, color-similarity-aware listing, and periodically
//! folded into a combined palette sheet.
//!
//! The pipeline, leaves first:
//!
//! - [`color`] — packed/hex conversions, Euclidean distance, greedy
//!   deduplication ([`color::combine_colors`]) and similarity search
//! - [`extract`] — dominant-color extraction from image bytes
//! - [`palette`] — the swatch-grid sheet regenerated from the whole catalog
//! - [`catalog`] — the relational store, listing and search
//! - [`ingest`] — the upload pipeline tying the stages together
//! - [`scheduler`] — debounced, single-slot palette regeneration

pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod palette;
pub mod scheduler;

pub use color::Rgb;
pub use config::Config;
pub use error::{GalleryError, Result};
