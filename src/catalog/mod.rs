//! The artwork catalog: SQLite-backed storage for artworks and their
//! weighted colors.

mod query;

pub use query::{
    clamp_page, parse_categories, parse_colors, ArtworkSummary, ListRequest, ListResponse,
    PublicLinks,
};

use crate::color::Rgb;
use crate::error::{GalleryError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of artwork categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Minimal,
    Abstract,
    Movies,
    Sport,
    Games,
    Cartoon,
    Fantasy,
    Nature,
    Whatever,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Minimal,
        Category::Abstract,
        Category::Movies,
        Category::Sport,
        Category::Games,
        Category::Cartoon,
        Category::Fantasy,
        Category::Nature,
        Category::Whatever,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Minimal => "minimal",
            Category::Abstract => "abstract",
            Category::Movies => "movies",
            Category::Sport => "sport",
            Category::Games => "games",
            Category::Cartoon => "cartoon",
            Category::Fantasy => "fantasy",
            Category::Nature => "nature",
            Category::Whatever => "whatever",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| GalleryError::UnknownCategory(s.to_string()))
    }
}

/// One catalog row
#[derive(Debug, Clone)]
pub struct Artwork {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category: Category,
    pub image: String,
    pub source: String,
    pub last_modified: i64,
    pub deleted: bool,
}

/// Spinal-case slug derived from a display name ("Red Mist!" -> "red-mist")
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// The Catalog owns the SQLite connection and the schema.
pub struct Catalog {
    conn: Connection,
    db_path: PathBuf,
}

impl Catalog {
    /// Open (or create) the catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let catalog = Catalog {
            conn,
            db_path: path.to_path_buf(),
        };
        catalog.init_schema()?;
        log::debug!("catalog opened at {}", path.display());
        Ok(catalog)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS artworks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                slug            TEXT NOT NULL,
                category        TEXT NOT NULL,
                image           TEXT NOT NULL,
                source          TEXT NOT NULL DEFAULT 'upload',
                last_modified   INTEGER NOT NULL,
                deleted         INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS artcolors (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                artwork_id      INTEGER NOT NULL,
                color           INTEGER NOT NULL,
                weight          INTEGER NOT NULL,
                FOREIGN KEY(artwork_id) REFERENCES artworks(id) ON DELETE CASCADE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_artworks_last_modified
             ON artworks(last_modified DESC)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_artworks_slug ON artworks(slug)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_artcolors_artwork_id
             ON artcolors(artwork_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_artcolors_color ON artcolors(color)",
            [],
        )?;

        Ok(())
    }

    /// Path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Number of non-deleted artworks
    pub fn artwork_count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM artworks WHERE deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert an artwork and its extracted colors in one transaction.
    ///
    /// The i-th of k colors (rank 0 = most dominant) is stored with weight
    /// `2^(k-1-i)`, so a higher-ranked match always outweighs any combination
    /// of lower-ranked ones. Exponents cap at 62 to stay within i64; palettes
    /// that large exceed any realistic extraction anyway.
    pub fn create_artwork(
        &mut self,
        name: &str,
        category: Category,
        image: &str,
        source: &str,
        colors: &[Rgb],
    ) -> Result<Artwork> {
        let slug = slugify(name);
        let now = Utc::now().timestamp();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO artworks (name, slug, category, image, source, last_modified, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![name, slug, category.as_str(), image, source, now],
        )?;
        let id = tx.last_insert_rowid();

        let k = colors.len();
        for (i, color) in colors.iter().enumerate() {
            let weight: i64 = 1 << (k - 1 - i).min(62);
            tx.execute(
                "INSERT INTO artcolors (artwork_id, color, weight) VALUES (?1, ?2, ?3)",
                params![id, color.packed() as i64, weight],
            )?;
        }
        tx.commit()?;

        log::info!("created artwork {:?} ({} colors)", slug, k);
        Ok(Artwork {
            id,
            name: name.to_string(),
            slug,
            category,
            image: image.to_string(),
            source: source.to_string(),
            last_modified: now,
            deleted: false,
        })
    }

    /// Soft delete: the row is kept, flagged and touched.
    pub fn soft_delete(&self, slug: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE artworks SET deleted = 1, last_modified = ?1 WHERE slug = ?2",
            params![Utc::now().timestamp(), slug],
        )?;
        if changed == 0 {
            return Err(GalleryError::NotFound(slug.to_string()));
        }
        Ok(())
    }

    /// Hard delete, for explicit admin action only: removes the artwork and
    /// its color rows.
    pub fn hard_delete(&mut self, slug: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let id: Option<i64> = tx
            .query_row("SELECT id FROM artworks WHERE slug = ?1", params![slug], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(id) = id else {
            return Err(GalleryError::NotFound(slug.to_string()));
        };
        tx.execute("DELETE FROM artcolors WHERE artwork_id = ?1", params![id])?;
        tx.execute("DELETE FROM artworks WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Distinct stored colors, the candidate set for similarity expansion
    pub fn distinct_colors(&self) -> Result<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT color FROM artcolors ORDER BY color")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut colors = Vec::new();
        for color in rows {
            colors.push(color? as u32);
        }
        Ok(colors)
    }

    /// Every color of every non-deleted artwork, newest artwork first and
    /// most dominant color first within an artwork. This is the input order
    /// the greedy palette deduplication depends on.
    pub fn all_colors(&self) -> Result<Vec<u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.color FROM artcolors c
             JOIN artworks a ON a.id = c.artwork_id
             WHERE a.deleted = 0
             ORDER BY a.last_modified DESC, a.id DESC, c.weight DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut colors = Vec::new();
        for color in rows {
            colors.push(color? as u32);
        }
        Ok(colors)
    }

    /// Non-deleted artwork counts per category
    pub fn stats(&self) -> Result<Vec<(Category, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM artworks WHERE deleted = 0
             GROUP BY category ORDER BY COUNT(*) DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut stats = Vec::new();
        for row in rows {
            let (raw, count) = row?;
            stats.push((Category::from_str(&raw)?, count));
        }
        Ok(stats)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("db_path", &self.db_path)
            .finish()
    }
}
