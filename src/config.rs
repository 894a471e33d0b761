//! Application configuration, loaded from a TOML file with full defaults.

use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite catalog path
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory receiving renditions and the palette sheet
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Public host used for artwork links
    #[serde(default = "default_web_host")]
    pub web_host: String,

    /// Public root under which renditions are served (CDN or assets mount)
    #[serde(default = "default_media_root")]
    pub media_root: String,

    #[serde(default)]
    pub palette: PaletteConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Merge tolerance for the palette sheet
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Quiet period after the last upload before regeneration fires
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Target palette size per artwork
    #[serde(default = "default_color_count")]
    pub count: u8,

    /// Sampling quality, 1 (finest) to 10 (coarsest)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_tolerance() -> f64 {
    70.0
}

fn default_debounce_secs() -> u64 {
    120
}

fn default_color_count() -> u8 {
    crate::extract::DEFAULT_COLOR_COUNT
}

fn default_quality() -> u8 {
    crate::extract::DEFAULT_QUALITY
}

fn default_web_host() -> String {
    "http://localhost:8080".to_string()
}

fn default_media_root() -> String {
    "http://localhost:8080/api/assets/media".to_string()
}

/// Application data directory, with a home-dir fallback when the platform
/// data dir cannot be determined
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wallery")
}

fn default_db_path() -> PathBuf {
    data_dir().join("wallery.db")
}

fn default_assets_dir() -> PathBuf {
    data_dir().join("assets")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: default_db_path(),
            assets_dir: default_assets_dir(),
            web_host: default_web_host(),
            media_root: default_media_root(),
            palette: PaletteConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig {
            tolerance: default_tolerance(),
            debounce_secs: default_debounce_secs(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            count: default_color_count(),
            quality: default_quality(),
        }
    }
}

impl Config {
    /// Loads the config file if present, otherwise returns defaults. A file
    /// that exists but fails to parse is an error, not a silent default.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|source| GalleryError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wallery")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.palette.tolerance, 70.0);
        assert_eq!(cfg.palette.debounce_secs, 120);
        assert_eq!(cfg.extract.count, 5);
        assert_eq!(cfg.extract.quality, 1);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("web_host = \"https://walls.example\"").unwrap();
        assert_eq!(cfg.web_host, "https://walls.example");
        assert_eq!(cfg.extract.count, 5);
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
