//! Cutting-pattern geometry resolution.
//!
//! Stages run strictly in order, each producing fresh values:
//!
//! 1. [`angle`] parses and normalizes raw angles,
//! 2. [`classify`] turns them into straight/miter ends per part,
//! 3. [`canonical`] makes repeated parts look identical,
//! 4. [`orientation`] assigns flips so matching cuts line up,
//! 5. [`boundary`] resolves one cut descriptor per position,
//! 6. [`layout`] emits spans as fractions of stock length.

pub mod angle;
pub mod boundary;
pub mod cache;
pub mod canonical;
pub mod classify;
pub mod layout;
pub mod orientation;

pub use cache::LayoutCache;

use tracing::{debug, warn};

use crate::config::{ResolverConfig, LENGTH_TOLERANCE_MM};
use crate::model::{
    Diagnostic, Layout, LayoutMarker, LayoutWarning, PartGeometry, PartName, Pattern, WasteSpan,
};

use self::boundary::resolve_boundaries;
use self::canonical::canonicalize;
use self::classify::classify_part;
use self::layout::{clamp_waste, edge_fractions, emit, EmitInput};
use self::orientation::orient;

/// A part in layout order together with its resolved end geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPart {
    /// Index into `Pattern::parts`.
    pub part_index: usize,
    pub name: PartName,
    pub length_mm: f64,
    pub complementary: bool,
    pub geometry: PartGeometry,
}

/// Resolve a cutting pattern into a renderer-independent layout.
///
/// Never fails: bad input degrades to a marker, a warning or a per-part
/// diagnostic.
pub fn resolve(pattern: &Pattern, config: &ResolverConfig) -> Layout {
    let reported_stock = pattern.stock_length_mm().unwrap_or(0.0);

    if pattern.parts.is_empty() {
        debug!("pattern has no parts");
        return Layout::empty(LayoutMarker::NoData, reported_stock);
    }
    let Some(stock) = pattern.valid_stock_length() else {
        warn!(stock_length = ?pattern.stock_length, "invalid stock length");
        return Layout::empty(LayoutMarker::InvalidStockLength, reported_stock);
    };

    let (placed, diagnostics) = classify_in_layout_order(pattern, config);
    let canonical = canonicalize(&placed);

    if let Some(longest) = longest_exceeding(&canonical, stock) {
        return exceeds_stock_layout(&canonical[longest], stock, config, diagnostics);
    }

    let oriented = orient(&canonical, config);

    let mut warnings = Vec::new();
    // An unusable waste value goes through the same clamp as NaN
    let reported_waste = pattern.waste_mm().unwrap_or(f64::NAN);
    let (waste_mm, clamped) = clamp_waste(reported_waste, stock);
    if let Some(warning) = clamped {
        warn!(%warning, "waste clamped");
        warnings.push(warning);
    }

    let lengths: Vec<f64> = oriented.iter().map(|p| p.length_mm).collect();
    let edges = edge_fractions(&lengths, stock, waste_mm);
    let boundaries = resolve_boundaries(&oriented, &edges, stock, config);

    let parts_end = edges.last().copied().unwrap_or(0.0);
    let waste = (waste_mm > 0.0).then(|| WasteSpan {
        start_fraction: parts_end,
        end_fraction: 1.0,
        length_mm: waste_mm,
    });

    emit(EmitInput {
        stock_length_mm: stock,
        parts: &oriented,
        edges: &edges,
        boundaries: &boundaries,
        waste,
        exceeds_stock: false,
        warnings,
        diagnostics,
    })
}

/// Classify every part, in layout order.
fn classify_in_layout_order(
    pattern: &Pattern,
    config: &ResolverConfig,
) -> (Vec<PlacedPart>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let placed = pattern
        .layout_order()
        .into_iter()
        .map(|index| {
            let part = &pattern.parts[index];
            let classification = classify_part(part, config);
            if let Some(message) = classification.diagnostic {
                warn!(part_index = index, %message, "part classification degraded");
                diagnostics.push(Diagnostic {
                    part_index: index,
                    message,
                });
            }
            PlacedPart {
                part_index: index,
                name: part.display_name(index),
                length_mm: part.length_mm(),
                complementary: part.is_complementary(),
                geometry: classification.geometry,
            }
        })
        .collect();
    (placed, diagnostics)
}

/// Position of the longest part that does not fit on the bar.
///
/// Parts are in descending length order, so that is the first one over.
fn longest_exceeding(parts: &[PlacedPart], stock_mm: f64) -> Option<usize> {
    parts
        .iter()
        .position(|p| p.length_mm > stock_mm + LENGTH_TOLERANCE_MM)
}

/// Degraded layout: one un-clipped span for the offending part.
fn exceeds_stock_layout(
    part: &PlacedPart,
    stock_mm: f64,
    config: &ResolverConfig,
    diagnostics: Vec<Diagnostic>,
) -> Layout {
    let warning = LayoutWarning::ExceedsStock {
        part_index: part.part_index,
        length_mm: part.length_mm,
        stock_length_mm: stock_mm,
    };
    warn!(%warning, name = %part.name, "part exceeds stock");

    let oriented = orient(std::slice::from_ref(part), config);
    let edges = [0.0, part.length_mm / stock_mm];
    let boundaries = resolve_boundaries(&oriented, &edges, stock_mm, config);

    emit(EmitInput {
        stock_length_mm: stock_mm,
        parts: &oriented,
        edges: &edges,
        boundaries: &boundaries,
        waste: None,
        exceeds_stock: true,
        warnings: vec![warning],
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundaryKind, Part, RawAngle, Side};
    use pretty_assertions::assert_eq;

    fn config() -> ResolverConfig {
        ResolverConfig::default()
    }

    fn angled(reference: &str, length: f64, start: Option<f64>, end: Option<f64>) -> Part {
        Part::new(reference, length).with_angles(start.map(RawAngle::from), end.map(RawAngle::from))
    }

    // ==================== scenario tests ====================

    #[test]
    fn test_repeated_miter_pair_shares_one_cut() {
        let pattern = Pattern::new(6000.0)
            .with_part(angled("B1", 2500.0, None, Some(45.0)))
            .with_part(angled("B1", 2500.0, None, Some(45.0)))
            .with_waste(1000.0);
        let layout = resolve(&pattern, &config());

        assert_eq!(layout.marker, None);
        assert_eq!(layout.spans.len(), 2);
        assert!(!layout.spans[0].geometry.flipped);
        assert!(layout.spans[1].geometry.flipped);

        let middle = layout.right_of(&layout.spans[0]);
        assert!(middle.shared);
        assert!(matches!(
            middle.kind,
            BoundaryKind::Sloped {
                owner: Side::Left,
                ..
            }
        ));
        assert_eq!(layout.sloped_count(), 1);

        let waste = layout.waste.expect("waste span");
        assert!((waste.start_fraction - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(waste.end_fraction, 1.0);
    }

    #[test]
    fn test_no_parts_is_no_data() {
        let layout = resolve(&Pattern::new(6000.0), &config());
        assert_eq!(layout.marker, Some(LayoutMarker::NoData));
        assert!(layout.spans.is_empty());
        assert!(!layout.is_renderable());
    }

    #[test]
    fn test_no_parts_wins_over_bad_stock() {
        let layout = resolve(&Pattern::default(), &config());
        assert_eq!(layout.marker, Some(LayoutMarker::NoData));
    }

    #[test]
    fn test_invalid_stock_marker() {
        for stock in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let pattern = Pattern::new(stock).with_part(Part::new("A", 100.0));
            let layout = resolve(&pattern, &config());
            assert_eq!(layout.marker, Some(LayoutMarker::InvalidStockLength));
            assert!(layout.spans.is_empty());
        }
        let mut missing = Pattern::default().with_part(Part::new("A", 100.0));
        missing.stock_length = None;
        assert_eq!(
            resolve(&missing, &config()).marker,
            Some(LayoutMarker::InvalidStockLength)
        );
    }

    #[test]
    fn test_zero_waste_ends_at_one() {
        let pattern = Pattern::new(12000.0)
            .with_part(Part::new("A", 4000.1))
            .with_part(Part::new("B", 3999.9))
            .with_part(Part::new("C", 4000.0));
        let layout = resolve(&pattern, &config());
        assert_eq!(layout.spans.last().unwrap().end_fraction, 1.0);
        assert!(layout.waste.is_none());
    }

    #[test]
    fn test_exceeds_stock_single_span() {
        let pattern = Pattern::new(12000.0)
            .with_part(Part::new("short", 2000.0))
            .with_part(Part::new("long", 13000.0));
        let layout = resolve(&pattern, &config());

        assert!(layout.exceeds_stock);
        assert_eq!(layout.spans.len(), 1);
        assert_eq!(layout.spans[0].part_index, 1);
        assert!((layout.spans[0].end_fraction - 13000.0 / 12000.0).abs() < 1e-12);
        assert!(layout.waste.is_none());
        assert!(matches!(
            layout.warnings.as_slice(),
            [LayoutWarning::ExceedsStock { part_index: 1, .. }]
        ));
    }

    // ==================== ordering tests ====================

    #[test]
    fn test_spans_in_descending_length_order() {
        let pattern = Pattern::new(10000.0)
            .with_part(Part::new("small", 1000.0))
            .with_part(Part::new("big", 5000.0))
            .with_part(Part::new("mid", 3000.0))
            .with_waste(1000.0);
        let layout = resolve(&pattern, &config());
        let order: Vec<usize> = layout.spans.iter().map(|s| s.part_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_span_fractions_are_contiguous() {
        let pattern = Pattern::new(10000.0)
            .with_part(Part::new("a", 3000.0))
            .with_part(Part::new("b", 2500.0))
            .with_part(Part::new("c", 2500.0))
            .with_waste(2000.0);
        let layout = resolve(&pattern, &config());
        for pair in layout.spans.windows(2) {
            assert_eq!(pair[0].end_fraction, pair[1].start_fraction);
            assert_eq!(pair[0].right_boundary, pair[1].left_boundary);
        }
        assert!((layout.drawn_length_mm() - 10000.0).abs() < 1e-6);
    }

    #[test]
    fn test_waste_outside_stock_is_clamped() {
        let pattern = Pattern::new(1000.0)
            .with_part(Part::new("a", 900.0))
            .with_waste(-50.0);
        let layout = resolve(&pattern, &config());
        assert!(layout.waste.is_none());
        assert!(matches!(
            layout.warnings.as_slice(),
            [LayoutWarning::WasteClamped { .. }]
        ));
    }

    // ==================== degradation tests ====================

    #[test]
    fn test_malformed_angle_is_local() {
        let mut bad = angled("bad", 3000.0, Some(30.0), None);
        bad.end_angle = Some(RawAngle::Malformed(serde_json::json!({ "deg": 30 })));
        let pattern = Pattern::new(8000.0)
            .with_part(bad)
            .with_part(angled("good", 2000.0, None, Some(30.0)));
        let layout = resolve(&pattern, &config());

        assert_eq!(layout.spans.len(), 2);
        assert_eq!(layout.diagnostics.len(), 1);
        assert_eq!(layout.diagnostics[0].part_index, 0);
        assert!(layout.spans[0].geometry.is_square());
        assert!(layout.spans[1].geometry.end.cut.is_miter());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let pattern = Pattern::new(9000.0)
            .with_part(angled("a", 3000.0, Some(60.0), Some(20.0)))
            .with_part(angled("a", 3000.0, Some(60.0), Some(20.0)))
            .with_part(angled("b", 2000.0, Some(-12.0), None));
        assert_eq!(resolve(&pattern, &config()), resolve(&pattern, &config()));
    }

    // ==================== wire value tests ====================

    fn from_json(json: &str) -> Pattern {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numeric_strings_resolve_like_numbers() {
        let text = from_json(
            r#"{"stock_length": "6000", "waste": "1000",
                "parts": [{"length": "2500"}, {"length": 2500}]}"#,
        );
        let numeric = from_json(
            r#"{"stock_length": 6000, "waste": 1000,
                "parts": [{"length": 2500}, {"length": 2500}]}"#,
        );
        let layout = resolve(&text, &config());
        assert_eq!(layout.marker, None);
        assert!(layout.diagnostics.is_empty());
        assert_eq!(layout.spans, resolve(&numeric, &config()).spans);
    }

    #[test]
    fn test_unusable_stock_length_is_invalid_stock_marker() {
        for stock in [r#""six metres""#, "true", r#"{"mm": 6000}"#] {
            let pattern = from_json(&format!(
                r#"{{"stock_length": {}, "parts": [{{"length": 100}}]}}"#,
                stock
            ));
            let layout = resolve(&pattern, &config());
            assert_eq!(layout.marker, Some(LayoutMarker::InvalidStockLength));
            assert_eq!(layout.stock_length_mm, 0.0);
        }
    }

    #[test]
    fn test_unusable_length_is_zero_width_with_diagnostic() {
        let pattern = from_json(
            r#"{"stock_length": 6000, "waste": 2000,
                "parts": [{"length": 4000}, {"length": [4000]}]}"#,
        );
        let layout = resolve(&pattern, &config());

        assert_eq!(layout.spans.len(), 2);
        let bad = &layout.spans[1];
        assert_eq!(bad.part_index, 1);
        assert_eq!(bad.width_fraction(), 0.0);
        assert_eq!(layout.diagnostics.len(), 1);
        assert_eq!(layout.diagnostics[0].part_index, 1);
        assert!(layout.diagnostics[0].message.contains("zero-width"));
    }

    #[test]
    fn test_unusable_complementary_flag_is_false_with_diagnostic() {
        let pattern = from_json(
            r#"{"stock_length": 6000, "waste": 1000,
                "parts": [{"length": 2500, "end_angle": 45, "is_complementary_pair": 1},
                          {"length": 2500, "end_angle": 45}]}"#,
        );
        let layout = resolve(&pattern, &config());

        assert_eq!(layout.spans.len(), 2);
        assert!(layout.spans.iter().all(|s| !s.complementary));
        assert_eq!(layout.diagnostics.len(), 1);
        assert_eq!(layout.diagnostics[0].part_index, 0);
        assert!(layout.diagnostics[0].message.contains("is_complementary_pair"));
    }

    #[test]
    fn test_unusable_waste_is_clamped_to_zero() {
        let pattern = from_json(
            r#"{"stock_length": 1000, "waste": "lots", "parts": [{"length": 900}]}"#,
        );
        let layout = resolve(&pattern, &config());
        assert!(layout.waste.is_none());
        assert!(matches!(
            layout.warnings.as_slice(),
            [LayoutWarning::WasteClamped { used_mm, .. }] if *used_mm == 0.0
        ));
        assert!((layout.drawn_length_mm() - 1000.0).abs() < 1e-9);
    }
}
