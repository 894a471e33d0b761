//! Greedy color deduplication used to build the palette sheet.

use super::convert::packed_to_rgb;
use super::distance::min_distance;
use super::Rgb;

/// Folds an ordered list of packed colors into a reduced set where every kept
/// pair is more than `tolerance` apart.
///
/// Single left-to-right pass: a color survives only if its minimum distance to
/// everything already kept exceeds the tolerance. The result depends on input
/// order — an early color can claim a slot that two later, mutually-closer
/// colors would otherwise have shared. That order dependence is accepted: the
/// same input and tolerance always produce the same output.
pub fn combine_colors(colors: &[u32], tolerance: f64) -> Vec<Rgb> {
    let mut kept: Vec<Rgb> = Vec::new();
    for &packed in colors {
        let rgb = packed_to_rgb(packed);
        if min_distance(&kept, rgb) > tolerance {
            kept.push(rgb);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_empty_output() {
        assert!(combine_colors(&[], 70.0).is_empty());
        assert!(combine_colors(&[], 0.0).is_empty());
    }

    #[test]
    fn single_color_survives_any_tolerance() {
        for tol in [0.0, 70.0, 441.0] {
            assert_eq!(combine_colors(&[0xFF0000], tol), vec![Rgb::new(255, 0, 0)]);
        }
    }

    #[test]
    fn zero_tolerance_keeps_distinct_drops_exact_duplicates() {
        let input = [0xFF0000, 0xFF0000, 0xFF0001, 0x00FF00, 0xFF0000];
        let out = combine_colors(&input, 0.0);
        assert_eq!(
            out,
            vec![Rgb::new(255, 0, 0), Rgb::new(255, 0, 1), Rgb::new(0, 255, 0)]
        );
    }

    #[test]
    fn near_colors_fold_into_first_arrival() {
        // 0xFF0101 is ~1.4 away from 0xFF0000, well under tolerance
        let out = combine_colors(&[0xFF0000, 0xFF0101, 0x0000FF], 70.0);
        assert_eq!(out, vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
    }

    #[test]
    fn deterministic_run_to_run() {
        let input: Vec<u32> = (0..500u32).map(|i| i * 33023 & 0xFF_FFFF).collect();
        let a = combine_colors(&input, 70.0);
        let b = combine_colors(&input, 70.0);
        assert_eq!(a, b);
    }

    #[test]
    fn order_dependence_is_accepted() {
        // Greedy pass, not optimal clustering: with the mid color first, it
        // claims the slot and suppresses both neighbors; with the neighbors
        // first, both survive.
        let mid_first = combine_colors(&[0x320000, 0x000000, 0x640000], 60.0);
        let ends_first = combine_colors(&[0x000000, 0x640000, 0x320000], 60.0);
        assert_eq!(mid_first.len(), 1);
        assert_eq!(ends_first.len(), 2);
    }
}
