//! Similarity search: expand a query color into the stored colors it matches.

use super::convert::rgb_to_packed;
use super::distance::distance;
use super::Rgb;

/// Default match threshold. Tunable recall/precision trade-off; plain
/// Euclidean RGB distance, no perceptual normalization.
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Every candidate strictly closer than `threshold` to `query`, in candidate
/// order. An empty candidate set is not an error, just an empty result.
pub fn similar_colors(query: Rgb, candidates: &[Rgb], threshold: f64) -> Vec<Rgb> {
    candidates
        .iter()
        .copied()
        .filter(|&c| distance(query, c) < threshold)
        .collect()
}

/// Union of [`similar_colors`] results over several query colors, as packed
/// values, deduplicated with first-occurrence order preserved.
pub fn expand_query_colors(queries: &[Rgb], candidates: &[Rgb], threshold: f64) -> Vec<u32> {
    let mut expanded: Vec<u32> = Vec::new();
    for &query in queries {
        for rgb in similar_colors(query, candidates, threshold) {
            let packed = rgb_to_packed(rgb);
            if !expanded.contains(&packed) {
                expanded.push(packed);
            }
        }
    }
    expanded
}
