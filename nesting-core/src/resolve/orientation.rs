//! Flip assignment so that matching cuts line up.

use tracing::debug;

use super::boundary::can_share;
use super::PlacedPart;
use crate::config::ResolverConfig;
use crate::model::{CutEnd, PartGeometry};

/// Flip decision for the first part on the bar.
///
/// The straighter end should face the bar's leading edge so no material is
/// wasted at the head of the bar. A genuinely double-mitered part is never
/// reoriented.
pub fn anchor_flip(geometry: &PartGeometry, config: &ResolverConfig) -> bool {
    match (geometry.start.cut, geometry.end.cut) {
        (CutEnd::Miter { .. }, CutEnd::Straight) => true,
        (
            CutEnd::Miter {
                deviation_deg: start,
                ..
            },
            CutEnd::Miter {
                deviation_deg: end, ..
            },
        ) => end < config.anchor_straight_deg && start >= config.anchor_straight_deg,
        _ => false,
    }
}

/// Parts whose touching ends are worth aligning.
fn is_related(left: &PlacedPart, right: &PlacedPart) -> bool {
    (left.complementary && right.complementary) || left.name == right.name
}

/// Flip `parts[left + 1]` if that lets it share a cut with `parts[left]`.
fn align_right_neighbour(parts: &mut [PlacedPart], left: usize, config: &ResolverConfig) {
    if !is_related(&parts[left], &parts[left + 1]) {
        return;
    }

    let touching = parts[left].geometry.right().cut;
    let current = parts[left + 1].geometry;
    if can_share(&touching, &current.left().cut, config) {
        return;
    }

    let candidate = current.flipped();
    if can_share(&touching, &candidate.left().cut, config) {
        debug!(
            index = left + 1,
            name = %parts[left + 1].name,
            flipped = candidate.flipped,
            "flipped to match neighbour"
        );
        parts[left + 1].geometry = candidate;
    }
}

/// Assign flip bits to parts in layout order.
///
/// Index 0 is decided by the anchor pass only; the pairwise pass walks
/// pairs `(i, i + 1)` for `i` in `1..n-1`, and a final check on `(0, 1)`
/// may flip index 1.
pub fn orient(parts: &[PlacedPart], config: &ResolverConfig) -> Vec<PlacedPart> {
    let mut oriented: Vec<PlacedPart> = parts
        .iter()
        .map(|p| {
            let mut p = p.clone();
            p.geometry.flipped = false;
            p
        })
        .collect();

    if oriented.is_empty() {
        return oriented;
    }
    let anchor = anchor_flip(&oriented[0].geometry, config);
    oriented[0].geometry.flipped = anchor;
    debug!(flipped = anchor, "anchor pass");

    let n = oriented.len();
    for left in 1..n.saturating_sub(1) {
        align_right_neighbour(&mut oriented, left, config);
    }
    if n >= 2 {
        align_right_neighbour(&mut oriented, 0, config);
    }

    debug_assert_eq!(oriented[0].geometry.flipped, anchor);
    oriented
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EndCut, PartName, Sign};

    fn config() -> ResolverConfig {
        ResolverConfig::default()
    }

    fn geometry(start: Option<f64>, end: Option<f64>) -> PartGeometry {
        let cut = |d: Option<f64>| match d {
            Some(d) => EndCut::miter(d, Sign::Positive),
            None => EndCut::STRAIGHT,
        };
        PartGeometry::new(cut(start), cut(end))
    }

    fn placed(name: &str, geometry: PartGeometry) -> PlacedPart {
        PlacedPart {
            part_index: 0,
            name: PartName::new(name),
            length_mm: 1000.0,
            complementary: false,
            geometry,
        }
    }

    fn flips(parts: &[PlacedPart]) -> Vec<bool> {
        parts.iter().map(|p| p.geometry.flipped).collect()
    }

    // ==================== anchor tests ====================

    #[test]
    fn test_anchor_flips_miter_start() {
        assert!(anchor_flip(&geometry(Some(45.0), None), &config()));
    }

    #[test]
    fn test_anchor_keeps_straight_start() {
        assert!(!anchor_flip(&geometry(None, Some(45.0)), &config()));
        assert!(!anchor_flip(&geometry(None, None), &config()));
    }

    #[test]
    fn test_anchor_double_miter() {
        // end nearly straight, start significant
        assert!(anchor_flip(&geometry(Some(30.0), Some(3.0)), &config()));
        // start already the straighter one
        assert!(!anchor_flip(&geometry(Some(3.0), Some(30.0)), &config()));
        // both significant: never reoriented
        assert!(!anchor_flip(&geometry(Some(30.0), Some(10.0)), &config()));
        // both small
        assert!(!anchor_flip(&geometry(Some(4.0), Some(2.5)), &config()));
    }

    // ==================== orient tests ====================

    #[test]
    fn test_orient_empty_and_single() {
        assert!(orient(&[], &config()).is_empty());
        let single = orient(&[placed("a", geometry(Some(45.0), None))], &config());
        assert_eq!(flips(&single), vec![true]);
    }

    #[test]
    fn test_orient_same_name_pair_meets_at_miter() {
        let g = geometry(None, Some(45.0));
        let oriented = orient(&[placed("b1", g), placed("b1", g)], &config());
        assert_eq!(flips(&oriented), vec![false, true]);
        assert!(oriented[0].geometry.right().cut.is_miter());
        assert!(oriented[1].geometry.left().cut.is_miter());
    }

    #[test]
    fn test_orient_unrelated_neighbours_untouched() {
        let g = geometry(None, Some(45.0));
        let oriented = orient(&[placed("a", g), placed("b", g), placed("c", g)], &config());
        assert_eq!(flips(&oriented), vec![false, false, false]);
    }

    #[test]
    fn test_orient_complementary_pair() {
        let mut left = placed("c1", geometry(None, Some(30.0)));
        let mut right = placed("c2", geometry(None, Some(31.0)));
        left.complementary = true;
        right.complementary = true;
        let oriented = orient(&[placed("x", geometry(None, None)), left, right], &config());
        assert_eq!(flips(&oriented), vec![false, false, true]);
    }

    #[test]
    fn test_orient_chain_of_repeated_parts() {
        let g = geometry(None, Some(45.0));
        let parts: Vec<PlacedPart> = (0..4).map(|_| placed("b1", g)).collect();
        let oriented = orient(&parts, &config());
        // (1,2) flips 2, (2,3) already meet square, final (0,1) flips 1
        assert_eq!(flips(&oriented), vec![false, true, true, false]);
    }

    #[test]
    fn test_orient_never_changes_anchor() {
        let g = geometry(Some(45.0), None);
        let parts: Vec<PlacedPart> = (0..3).map(|_| placed("b1", g)).collect();
        let oriented = orient(&parts, &config());
        assert_eq!(oriented[0].geometry.flipped, anchor_flip(&g, &config()));
    }

    #[test]
    fn test_orient_resets_incoming_flips() {
        let g = geometry(None, None).flipped();
        let oriented = orient(&[placed("a", g)], &config());
        assert!(!oriented[0].geometry.flipped);
    }
}
