//! Listing and search over the catalog: filter parsing, similarity
//! expansion, pagination and JSON-ready summaries.

use super::{Catalog, Category};
use crate::color::{
    expand_query_colors, hex_to_packed, packed_to_hex, packed_to_rgb, Rgb, DEFAULT_THRESHOLD,
};
use crate::config::Config;
use crate::error::Result;
use rusqlite::Row;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// Listing parameters. Filters that fail to parse degrade to "no filter"
/// rather than failing the request.
#[derive(Debug, Clone)]
pub struct ListRequest {
    /// 1-based page; -1 selects the random-sample mode
    pub page: i64,
    pub limit: i64,
    /// Comma-separated category names
    pub categories: Option<String>,
    /// Comma-separated colors, decimal or 6-digit hex
    pub colors: Option<String>,
    /// Similarity threshold for the color filter
    pub threshold: f64,
    /// Only artworks modified strictly after this unix timestamp
    pub last_modified: Option<i64>,
}

impl Default for ListRequest {
    fn default() -> Self {
        ListRequest {
            page: 1,
            limit: 20,
            categories: None,
            colors: None,
            threshold: DEFAULT_THRESHOLD,
            last_modified: None,
        }
    }
}

/// One artwork as the API would serialize it
#[derive(Debug, Clone, Serialize)]
pub struct ArtworkSummary {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Comma-joined hex values of the stored colors, most dominant first
    pub colors: String,
    pub raw_src: String,
    pub thumb_src: String,
    pub web_uri: String,
    pub last_modified: i64,
    pub deleted: bool,
}

/// A listing page plus the values the HTTP layer forwards as pagination
/// headers.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<ArtworkSummary>,
    pub total: i64,
    pub page: i64,
    pub next: Option<String>,
}

/// Public URL roots for artwork links and renditions
#[derive(Debug, Clone)]
pub struct PublicLinks {
    pub web_host: String,
    pub media_root: String,
}

impl PublicLinks {
    pub fn from_config(config: &Config) -> Self {
        PublicLinks {
            web_host: config.web_host.clone(),
            media_root: config.media_root.clone(),
        }
    }

    fn summary(&self, row: &Row<'_>) -> rusqlite::Result<ArtworkSummary> {
        let name: String = row.get("name")?;
        let slug: String = row.get("slug")?;
        let category: String = row.get("category")?;
        let image: String = row.get("image")?;
        let colors: String = row.get("colors")?;
        let last_modified: i64 = row.get("last_modified")?;
        let deleted: bool = row.get("deleted")?;

        let category = Category::from_str(&category).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
        let stem = Path::new(&image)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.clone());

        // Rendition names mirror what the ingest pipeline writes
        Ok(ArtworkSummary {
            web_uri: format!("{}/v/{}", self.web_host, slug),
            raw_src: format!("{}/{}.png", self.media_root, stem),
            thumb_src: format!("{}/{}.thumbnail.png", self.media_root, stem),
            id: slug,
            title: name,
            category,
            colors: hexify_color_list(&colors),
            last_modified,
            deleted,
        })
    }
}

/// Rewrites a comma-joined list of decimal packed colors as hex
fn hexify_color_list(raw: &str) -> String {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .map(packed_to_hex)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a comma-separated category filter, dropping unknown names
pub fn parse_categories(raw: &str) -> Vec<Category> {
    let mut categories = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match Category::from_str(part) {
            Ok(c) if !categories.contains(&c) => categories.push(c),
            Ok(_) => {}
            Err(_) => log::debug!("ignoring unknown category filter {part:?}"),
        }
    }
    categories
}

/// Parses a comma-separated color filter; each entry is a decimal packed
/// value or six hex digits. Malformed entries are dropped.
pub fn parse_colors(raw: &str) -> Vec<u32> {
    let mut colors = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        // Plain digits only for the decimal branch; str::parse would accept
        // a leading sign
        let parsed = if part.chars().all(|c| c.is_ascii_digit()) {
            part.parse::<u32>().ok()
        } else {
            hex_to_packed(part).ok()
        };
        match parsed {
            Some(packed) => colors.push(packed & 0xFF_FFFF),
            None => log::debug!("ignoring unparsable color filter {part:?}"),
        }
    }
    colors
}

/// Clamps a requested page into `[1, total/limit + 1]`
pub fn clamp_page(page: i64, total: i64, limit: i64) -> i64 {
    if total <= 0 {
        return page.max(1);
    }
    page.clamp(1, total / limit.max(1) + 1)
}

impl Catalog {
    /// Paginated, filtered listing. The color filter is expanded against the
    /// distinct stored colors; matching artworks are ranked by the summed
    /// weight of their matching colors, then recency. A color filter that
    /// matches nothing degrades to no filter, as do unparsable filters.
    pub fn list(&self, req: &ListRequest, links: &PublicLinks) -> Result<ListResponse> {
        let limit = req.limit.max(1);
        let mut conditions = vec!["a.deleted = 0".to_string()];
        let mut rank_by_weight = false;

        if let Some(raw) = req.categories.as_deref() {
            let categories = parse_categories(raw);
            if !categories.is_empty() {
                let names: Vec<String> = categories
                    .iter()
                    .map(|c| format!("'{}'", c.as_str()))
                    .collect();
                conditions.push(format!("a.category IN ({})", names.join(",")));
            }
        }

        if let Some(cutoff) = req.last_modified {
            conditions.push(format!("a.last_modified > {cutoff}"));
        }

        if let Some(raw) = req.colors.as_deref() {
            let queries: Vec<Rgb> = parse_colors(raw).into_iter().map(packed_to_rgb).collect();
            if !queries.is_empty() {
                let candidates: Vec<Rgb> = self
                    .distinct_colors()?
                    .into_iter()
                    .map(packed_to_rgb)
                    .collect();
                let expanded = expand_query_colors(&queries, &candidates, req.threshold);
                if expanded.is_empty() {
                    log::debug!("color filter matched no stored colors, dropping it");
                } else {
                    log::debug!("expanded {} query colors to {}", queries.len(), expanded.len());
                    let values: Vec<String> =
                        expanded.iter().map(|c| c.to_string()).collect();
                    conditions.push(format!("c.color IN ({})", values.join(",")));
                    rank_by_weight = true;
                }
            }
        }

        let where_clause = conditions.join(" AND ");
        let total: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM (
                    SELECT a.id FROM artworks a
                    JOIN artcolors c ON c.artwork_id = a.id
                    WHERE {where_clause}
                    GROUP BY a.id
                )"
            ),
            [],
            |row| row.get(0),
        )?;

        let (order_by, page, offset_clause) = if req.page == -1 {
            ("RANDOM()".to_string(), -1, String::new())
        } else {
            let page = clamp_page(req.page, total, limit);
            let order = if rank_by_weight {
                "SUM(c.weight) DESC, a.last_modified DESC, a.id DESC".to_string()
            } else {
                "a.last_modified DESC, a.id DESC".to_string()
            };
            (order, page, format!(" OFFSET {}", (page - 1) * limit))
        };

        let sql = format!(
            "SELECT a.name AS name, a.slug AS slug, a.category AS category,
                    a.image AS image, a.last_modified AS last_modified,
                    a.deleted AS deleted,
                    GROUP_CONCAT(c.color ORDER BY c.weight DESC) AS colors
             FROM artworks a
             JOIN artcolors c ON c.artwork_id = a.id
             WHERE {where_clause}
             GROUP BY a.id
             ORDER BY {order_by}
             LIMIT {limit}{offset_clause}"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| links.summary(row))?;
        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }

        let next = next_url(links, req, page, total, limit);
        Ok(ListResponse {
            items,
            total,
            page,
            next,
        })
    }

    /// Single-artwork lookup by slug, with the same color aggregation as the
    /// listing. Soft-deleted artworks remain addressable here.
    pub fn get(&self, slug: &str, links: &PublicLinks) -> Result<Option<ArtworkSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.name AS name, a.slug AS slug, a.category AS category,
                    a.image AS image, a.last_modified AS last_modified,
                    a.deleted AS deleted,
                    GROUP_CONCAT(c.color ORDER BY c.weight DESC) AS colors
             FROM artworks a
             JOIN artcolors c ON c.artwork_id = a.id
             WHERE a.slug = ?1
             GROUP BY a.id",
        )?;
        let mut rows = stmt.query_map(rusqlite::params![slug], |row| links.summary(row))?;
        match rows.next() {
            Some(item) => Ok(Some(item?)),
            None => Ok(None),
        }
    }
}

/// Absolute URL for the following page, or `None` on the last one
fn next_url(
    links: &PublicLinks,
    req: &ListRequest,
    page: i64,
    total: i64,
    limit: i64,
) -> Option<String> {
    if page < 1 {
        return None;
    }
    let last_page = (total + limit - 1) / limit.max(1);
    let next = page + 1;
    if next > last_page {
        return None;
    }

    let mut params = vec![("page", next.to_string()), ("limit", limit.to_string())];
    if let Some(categories) = req.categories.as_deref() {
        params.push(("category", categories.to_string()));
    }
    if let Some(colors) = req.colors.as_deref() {
        params.push(("color", colors.to_string()));
    }
    if let Some(cutoff) = req.last_modified {
        params.push(("last_modified", cutoff.to_string()));
    }
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    Some(format!(
        "{}/api/artworks?{}",
        links.web_host,
        query.join("&")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_links() -> PublicLinks {
        PublicLinks {
            web_host: "https://walls.example".to_string(),
            media_root: "https://cdn.example/media".to_string(),
        }
    }

    fn open_temp() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(&dir.path().join("catalog.db")).unwrap();
        (dir, catalog)
    }

    #[test]
    fn clamp_matches_the_documented_formula() {
        assert_eq!(clamp_page(99, 45, 20), 3);
        assert_eq!(clamp_page(0, 45, 20), 1);
        assert_eq!(clamp_page(-5, 45, 20), 1);
        assert_eq!(clamp_page(2, 45, 20), 2);
        assert_eq!(clamp_page(7, 0, 20), 7);
    }

    #[test]
    fn color_parsing_accepts_decimal_and_hex_and_degrades() {
        assert_eq!(parse_colors("16711680"), vec![0xFF0000]);
        assert_eq!(parse_colors("FF0000"), vec![0xFF0000]);
        assert_eq!(parse_colors("ff0000, 00FF00"), vec![0xFF0000, 0x00FF00]);
        assert_eq!(parse_colors("nope, FF00"), Vec::<u32>::new());
        assert_eq!(parse_colors("nope,0000FF"), vec![0x0000FF]);
        assert_eq!(parse_colors("+123,-123"), Vec::<u32>::new());
    }

    #[test]
    fn category_parsing_drops_unknown_names() {
        assert_eq!(
            parse_categories("nature, vaporwave ,GAMES"),
            vec![Category::Nature, Category::Games]
        );
        assert!(parse_categories("vaporwave").is_empty());
    }

    #[test]
    fn listing_orders_by_recency_without_color_filter() {
        let (_dir, mut catalog) = open_temp();
        catalog
            .create_artwork("Old", Category::Nature, "old.png", "upload", &[Rgb::new(9, 9, 9)])
            .unwrap();
        catalog
            .create_artwork("New", Category::Nature, "new.png", "upload", &[Rgb::new(8, 8, 8)])
            .unwrap();

        let res = catalog.list(&ListRequest::default(), &test_links()).unwrap();
        assert_eq!(res.total, 2);
        assert_eq!(res.page, 1);
        assert!(res.next.is_none());
        assert_eq!(res.items[0].id, "new");
        assert_eq!(res.items[1].id, "old");
        assert_eq!(res.items[0].colors, "080808");
        assert_eq!(
            res.items[0].raw_src,
            "https://cdn.example/media/new.png"
        );
        assert_eq!(
            res.items[0].thumb_src,
            "https://cdn.example/media/new.thumbnail.png"
        );
    }

    #[test]
    fn color_filter_ranks_by_summed_matching_weight() {
        let (_dir, mut catalog) = open_temp();
        // "Strong" matches with its top-ranked color (weight 2); "Weak" was
        // created later but only matches with weight 1.
        catalog
            .create_artwork(
                "Strong",
                Category::Abstract,
                "s.png",
                "upload",
                &[Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)],
            )
            .unwrap();
        catalog
            .create_artwork(
                "Weak",
                Category::Abstract,
                "w.png",
                "upload",
                &[Rgb::new(254, 2, 2)],
            )
            .unwrap();

        let req = ListRequest {
            colors: Some(format!("{}", 0xFE0101u32)),
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.total, 2);
        assert_eq!(res.items[0].id, "strong");
        assert_eq!(res.items[1].id, "weak");
        // Only the matching colors are aggregated under a color filter
        assert_eq!(res.items[0].colors, "FF0000");
    }

    #[test]
    fn unmatched_color_filter_degrades_to_no_filter() {
        let (_dir, mut catalog) = open_temp();
        catalog
            .create_artwork("Only", Category::Sport, "o.png", "upload", &[Rgb::new(0, 0, 0)])
            .unwrap();

        let req = ListRequest {
            colors: Some("FFFFFF".to_string()),
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.total, 1);
        assert_eq!(res.items.len(), 1);
    }

    #[test]
    fn category_filter_narrows_results() {
        let (_dir, mut catalog) = open_temp();
        catalog
            .create_artwork("A", Category::Games, "a.png", "upload", &[Rgb::new(1, 1, 1)])
            .unwrap();
        catalog
            .create_artwork("B", Category::Nature, "b.png", "upload", &[Rgb::new(2, 2, 2)])
            .unwrap();

        let req = ListRequest {
            categories: Some("games".to_string()),
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.total, 1);
        assert_eq!(res.items[0].id, "a");
    }

    #[test]
    fn pagination_clamps_and_links_next() {
        let (_dir, mut catalog) = open_temp();
        for i in 0..45 {
            catalog
                .create_artwork(
                    &format!("Art {i}"),
                    Category::Whatever,
                    &format!("{i}.png"),
                    "upload",
                    &[Rgb::new((i % 256) as u8, 0, 0)],
                )
                .unwrap();
        }

        let req = ListRequest {
            page: 99,
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.total, 45);
        assert_eq!(res.page, 3);
        assert_eq!(res.items.len(), 5);
        assert!(res.next.is_none());

        let req = ListRequest {
            page: 1,
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.items.len(), 20);
        assert_eq!(
            res.next.as_deref(),
            Some("https://walls.example/api/artworks?page=2&limit=20")
        );
    }

    #[test]
    fn random_mode_returns_a_sample() {
        let (_dir, mut catalog) = open_temp();
        for i in 0..10 {
            catalog
                .create_artwork(
                    &format!("R {i}"),
                    Category::Whatever,
                    "r.png",
                    "upload",
                    &[Rgb::new(i as u8, 0, 0)],
                )
                .unwrap();
        }
        let req = ListRequest {
            page: -1,
            limit: 3,
            ..ListRequest::default()
        };
        let res = catalog.list(&req, &test_links()).unwrap();
        assert_eq!(res.items.len(), 3);
        assert_eq!(res.page, -1);
        assert!(res.next.is_none());
    }

    #[test]
    fn get_finds_by_slug_including_soft_deleted() {
        let (_dir, mut catalog) = open_temp();
        catalog
            .create_artwork("Kept Art", Category::Movies, "k.png", "upload", &[Rgb::new(5, 5, 5)])
            .unwrap();
        catalog.soft_delete("kept-art").unwrap();

        let found = catalog.get("kept-art", &test_links()).unwrap().unwrap();
        assert!(found.deleted);
        assert_eq!(found.title, "Kept Art");
        assert!(catalog.get("missing", &test_links()).unwrap().is_none());
    }
}
