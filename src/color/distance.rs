//! Euclidean distance in RGB space.

use super::Rgb;

/// Distance reported for an empty candidate set. Deliberately larger than the
/// maximum possible RGB distance (~441.67), so callers can read it as "nothing
/// is close, keep this color".
pub const EMPTY_SET_DISTANCE: f64 = 500.0;

/// `sqrt((ar-br)^2 + (ag-bg)^2 + (ab-bb)^2)`, range [0, 441.67]
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Minimum distance from `color` to any element of `set`, or
/// [`EMPTY_SET_DISTANCE`] when the set is empty
pub fn min_distance(set: &[Rgb], color: Rgb) -> f64 {
    set.iter()
        .map(|&c| distance(c, color))
        .fold(EMPTY_SET_DISTANCE, f64::min)
}
