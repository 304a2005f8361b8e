//! Integration tests for loading and resolving nesting reports.
//!
//! These tests run the whole pipeline on saved optimizer output and check
//! the resulting layouts structurally: span order, boundary decisions,
//! orientation, and agreement between the screen and print surfaces.

use nesting_core::generator::page::{layout_pages, PrintBar};
use nesting_core::generator::scene::{BarScene, Rect};
use nesting_core::generator::{render_dxf, render_svg, screen_scene};
use nesting_core::model::{LayoutWarning, Side, Sign};
use nesting_core::report::{bill_of_materials, pattern_summaries};
use nesting_core::resolve::orientation::anchor_flip;
use nesting_core::{
    parse_report_file, resolve, resolve_report_file, validate_patterns, BoundaryKind, Layout,
    LayoutCache, LayoutMarker, NestingError, Pattern, ResolverConfig,
};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Fixture directory for integration tests
const FIXTURE_DIR: &str = "tests/fixtures";

// ==================== Test Helpers ====================

fn load_patterns(name: &str) -> Vec<Pattern> {
    parse_report_file(&Path::new(FIXTURE_DIR).join(name))
        .expect("Failed to parse fixture")
        .patterns()
}

fn resolve_all(patterns: &[Pattern]) -> Vec<Layout> {
    let config = ResolverConfig::default();
    patterns.iter().map(|p| resolve(p, &config)).collect()
}

/// Response fixture patterns, in file order:
/// 0 miter pair, 1 zero waste, 2 complementary + flags,
/// 3 empty, 4 oversize, 5 repeated names.
fn response_layouts() -> Vec<Layout> {
    resolve_all(&load_patterns("response.json"))
}

fn names(layout: &Layout) -> Vec<&str> {
    layout.spans.iter().map(|s| s.name.as_str()).collect()
}

/// Per-cut decisions a surface draws: (sloped, lean, shared).
fn cut_decisions(scene: &BarScene) -> Vec<(bool, Option<Sign>, bool)> {
    scene
        .cut_lines
        .iter()
        .map(|l| (l.sloped, l.lean, l.shared))
        .collect()
}

/// Per-span edge decisions a surface draws: (left sloped, right sloped).
fn edge_decisions(scene: &BarScene) -> Vec<(bool, bool)> {
    scene
        .spans
        .iter()
        .map(|s| (s.left_sloped, s.right_sloped))
        .collect()
}

// ==================== Loading Tests ====================

#[test]
fn test_all_fixtures_parse() {
    let fixtures = [
        ("response.json", 6),
        ("pattern_list.json", 4),
        ("single_pattern.json", 1),
    ];

    for (fixture, expected) in &fixtures {
        let patterns = load_patterns(fixture);
        assert_eq!(patterns.len(), *expected, "Pattern count in {}", fixture);
    }
}

#[test]
fn test_profile_names_reach_patterns() {
    let patterns = load_patterns("response.json");
    let profiles: Vec<&str> = patterns
        .iter()
        .map(|p| p.profile_name.as_deref().unwrap_or("-"))
        .collect();
    assert_eq!(
        profiles,
        vec!["IPE200", "IPE200", "IPE200", "HEA100", "HEA100", "HEA100"]
    );
}

#[test]
fn test_missing_fixture() {
    let result = parse_report_file(&Path::new(FIXTURE_DIR).join("missing.json"));
    assert!(matches!(result, Err(NestingError::FileNotFound { .. })));
}

// ==================== Scenario Tests ====================

/// Two identical parts with one 45° end meet at a single shared cut.
#[test]
fn test_miter_pair_shares_cut() {
    let layout = &response_layouts()[0];

    assert_eq!(layout.spans.len(), 2);
    assert_eq!(
        layout.spans.iter().map(|s| s.geometry.flipped).collect::<Vec<_>>(),
        vec![false, true]
    );

    let sloped: Vec<_> = layout.boundaries.iter().filter(|b| b.kind.is_sloped()).collect();
    assert_eq!(sloped.len(), 1);
    assert!(sloped[0].shared);
    assert!((sloped[0].position_mm - 2500.0).abs() < 1e-9);

    let waste = layout.waste.expect("waste span");
    assert!((waste.start_fraction - 5.0 / 6.0).abs() < 1e-12);
    assert_eq!(waste.end_fraction, 1.0);
}

#[test]
fn test_empty_pattern_is_no_data() {
    let layout = &response_layouts()[3];
    assert!(layout.spans.is_empty());
    assert_eq!(layout.marker, Some(LayoutMarker::NoData));
    assert_eq!(
        serde_json::to_value(layout).unwrap()["marker"],
        serde_json::json!("no-data")
    );
}

#[test]
fn test_zero_waste_reaches_bar_end() {
    let layout = &response_layouts()[1];
    assert_eq!(names(layout), vec!["P4", "P6", "P5"]);
    assert_eq!(layout.spans.last().unwrap().end_fraction, 1.0);
    assert!(layout.waste.is_none());
}

#[test]
fn test_oversize_part_single_span() {
    let layout = &response_layouts()[4];
    assert!(layout.exceeds_stock);
    assert_eq!(layout.spans.len(), 1);
    assert!(layout.spans[0].end_fraction > 1.0);
    assert_eq!(layout.warnings.len(), 1);
}

#[test]
fn test_invalid_stock_single_pattern() {
    let layouts = resolve_all(&load_patterns("single_pattern.json"));
    assert_eq!(layouts[0].marker, Some(LayoutMarker::InvalidStockLength));
}

// ==================== Resolution Tests ====================

/// Complementary halves line up even though their names differ; the
/// flagged brace keeps its straight start and owns the bar-end cut.
#[test]
fn test_complementary_pair_and_flags() {
    let layout = &response_layouts()[2];

    assert_eq!(names(layout), vec!["C1", "C2", "Brace"]);
    assert_eq!(
        layout.spans.iter().map(|s| s.geometry.flipped).collect::<Vec<_>>(),
        vec![true, true, false]
    );

    let between = layout.right_of(&layout.spans[0]);
    assert!(between.shared);
    assert!(matches!(
        between.kind,
        BoundaryKind::Sloped {
            owner: Side::Left,
            ..
        }
    ));

    let brace = &layout.spans[2];
    assert!(brace.geometry.start.cut.is_straight());
    assert_eq!(brace.geometry.start.measured_deviation_deg, Some(0.0));
    assert_eq!(brace.geometry.end.cut.deviation(), 30.0);

    let bar_end = layout.right_of(brace);
    assert!(!bar_end.shared);
    assert_eq!(
        bar_end.kind,
        BoundaryKind::Sloped {
            deviation_deg: 30.0,
            owner: Side::Left,
            lean: Sign::Negative,
        }
    );
}

#[test]
fn test_repeated_names_are_identical() {
    let layout = &response_layouts()[5];
    let ends: Vec<_> = layout
        .spans
        .iter()
        .filter(|s| s.name.as_str() == "R1")
        .map(|s| (s.geometry.start, s.geometry.end))
        .collect();

    assert_eq!(ends.len(), 3);
    assert!(ends.windows(2).all(|w| w[0] == w[1]));
    assert!(ends[0].0.cut.is_straight());
    assert_eq!(ends[0].1.cut.deviation(), 45.0);
}

#[test]
fn test_anchor_decides_first_part() {
    let config = ResolverConfig::default();
    for name in ["response.json", "pattern_list.json"] {
        for layout in resolve_all(&load_patterns(name)) {
            if let Some(first) = layout.spans.first() {
                assert_eq!(
                    first.geometry.flipped,
                    anchor_flip(&first.geometry, &config),
                    "anchor changed in {}",
                    name
                );
            }
        }
    }
}

#[test]
fn test_absolute_convention_small_miters() {
    let layouts = resolve_all(&load_patterns("pattern_list.json"));
    let span = &layouts[0].spans[0];
    assert!((span.geometry.start.cut.deviation() - 1.6).abs() < 1e-9);
    assert!((span.geometry.end.cut.deviation() - 1.2).abs() < 1e-9);
}

#[test]
fn test_malformed_angle_fails_only_its_part() {
    let layouts = resolve_all(&load_patterns("pattern_list.json"));
    let layout = &layouts[1];
    assert_eq!(layout.spans.len(), 1);
    assert!(layout.spans[0].geometry.is_square());
    assert_eq!(layout.diagnostics.len(), 1);
    assert!(layout.diagnostics[0].message.contains("start_angle"));
}

#[test]
fn test_text_values_in_pattern_list() {
    let layouts = resolve_all(&load_patterns("pattern_list.json"));
    let layout = &layouts[2];
    assert_eq!(layout.marker, None);
    assert_eq!(layout.stock_length_mm, 6000.0);
    assert_eq!(names(layout), vec!["K8", "K9"]);

    let k8 = &layout.spans[0];
    assert_eq!(k8.length_mm, 2000.4);
    assert!((k8.geometry.start.cut.deviation() - 8.7).abs() < 1e-9);
    let k9 = &layout.spans[1];
    assert_eq!(k9.geometry.end.cut.deviation(), 45.0);
    assert!(!k9.complementary);

    assert_eq!(layout.diagnostics.len(), 1);
    assert_eq!(layout.diagnostics[0].part_index, 1);
    assert!(layout.diagnostics[0].message.contains("is_complementary_pair"));
}

/// Parts plus waste always fill the bar exactly, even when the optimizer's
/// numbers do not add up or the waste had to be clamped.
#[test]
fn test_drawn_length_matches_stock() {
    let mut checked = 0;
    for name in ["response.json", "pattern_list.json", "single_pattern.json"] {
        for layout in resolve_all(&load_patterns(name)) {
            if !layout.is_renderable() || layout.exceeds_stock {
                continue;
            }
            let stock = layout.stock_length_mm;
            assert!(
                (layout.drawn_length_mm() - stock).abs() <= 0.01,
                "{}: drew {} mm on a {} mm bar",
                name,
                layout.drawn_length_mm(),
                stock
            );
            checked += 1;
        }
    }
    // every pattern except the empty, oversize and invalid-stock ones
    assert_eq!(checked, 4 + 4);
}

#[test]
fn test_mismatched_lengths_are_scaled() {
    let patterns = load_patterns("pattern_list.json");
    assert!(!patterns[2].lengths_balance());
    assert!(!patterns[3].lengths_balance());

    let layouts = resolve_all(&patterns);
    let clamped = &layouts[3];
    assert!(clamped.waste.is_none());
    assert!(matches!(
        clamped.warnings.as_slice(),
        [LayoutWarning::WasteClamped { .. }]
    ));
    assert_eq!(clamped.spans.last().unwrap().end_fraction, 1.0);

    let scaled = &layouts[2];
    let waste = scaled.waste.expect("waste span");
    assert!((waste.start_fraction - (6000.0 - 2050.0) / 6000.0).abs() < 1e-12);
}

#[test]
fn test_boundaries_unique_and_sorted() {
    for layout in response_layouts() {
        assert!(layout
            .boundaries
            .windows(2)
            .all(|w| w[0].position_mm < w[1].position_mm));
    }
}

#[test]
fn test_every_span_edge_has_a_boundary() {
    for name in ["response.json", "pattern_list.json"] {
        for layout in resolve_all(&load_patterns(name)) {
            if !layout.is_renderable() {
                continue;
            }
            let first = layout.left_of(&layout.spans[0]);
            assert_eq!(first.position_mm, 0.0, "bar start in {}", name);
            for span in &layout.spans {
                for boundary in [layout.left_of(span), layout.right_of(span)] {
                    assert!(matches!(
                        boundary.kind,
                        BoundaryKind::Straight | BoundaryKind::Sloped { .. }
                    ));
                }
            }
        }
    }
}

// ==================== Renderer Tests ====================

/// The screen and print surfaces draw the same cut decisions.
#[test]
fn test_screen_and_page_agree() {
    let layouts = response_layouts();
    let bars: Vec<PrintBar> = layouts
        .iter()
        .map(|layout| PrintBar {
            caption: "bar",
            layout,
        })
        .collect();
    let pages = layout_pages(&bars);
    let page_scenes: Vec<&BarScene> = pages
        .iter()
        .flat_map(|p| p.rows.iter().map(|r| &r.scene))
        .collect();
    assert_eq!(page_scenes.len(), layouts.len());

    for (layout, page_scene) in layouts.iter().zip(page_scenes) {
        let screen = screen_scene(layout, Rect::new(0.0, 0.0, 1280.0, 240.0), 24.0);
        assert_eq!(cut_decisions(&screen), cut_decisions(page_scene));
        assert_eq!(edge_decisions(&screen), edge_decisions(page_scene));
        assert_eq!(screen.placeholder, page_scene.placeholder);
    }
}

#[test]
fn test_exports_render_every_fixture() {
    let layouts = response_layouts();
    let bars: Vec<PrintBar> = layouts
        .iter()
        .map(|layout| PrintBar {
            caption: "bar",
            layout,
        })
        .collect();
    let pages = layout_pages(&bars);

    let svg = render_svg(&pages);
    assert_eq!(svg.matches("<polygon").count(), 2 + 3 + 3 + 1 + 4);

    let dxf = render_dxf(&pages);
    assert!(dxf.trim_end().ends_with("EOF"));
}

// ==================== Pipeline Tests ====================

#[test]
fn test_resolve_report_file() {
    let resolved = resolve_report_file(
        &Path::new(FIXTURE_DIR).join("response.json"),
        &ResolverConfig::default(),
    )
    .expect("Failed to resolve report");
    assert_eq!(resolved.len(), 6);
    assert_eq!(resolved[0].1, response_layouts()[0]);
}

#[test]
fn test_invalid_config_rejected() {
    let config = ResolverConfig::default().with_near_straight(f64::NAN);
    let result = resolve_report_file(&Path::new(FIXTURE_DIR).join("response.json"), &config);
    assert!(matches!(result, Err(NestingError::InvalidValue { .. })));
}

#[test]
fn test_cache_reuses_equal_patterns() {
    let config = ResolverConfig::default();
    let mut cache = LayoutCache::new();
    for pattern in load_patterns("response.json") {
        cache.resolve(&pattern, &config);
    }
    // a second, independently loaded copy hits every entry
    for pattern in load_patterns("response.json") {
        cache.resolve(&pattern, &config);
    }
    assert_eq!(cache.len(), 6);
    assert_eq!(cache.hits(), 6);
}

#[test]
fn test_validation_flags_fixture_problems() {
    let result = validate_patterns(&load_patterns("response.json")).unwrap();
    assert!(!result.passed);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("exceeds stock length"));
}

#[test]
fn test_bom_and_summaries() {
    let patterns = load_patterns("response.json");
    let rows = bill_of_materials(&patterns, &ResolverConfig::default());
    let b1 = rows.iter().find(|r| r.name == "B1").unwrap();
    assert_eq!(b1.profile, "IPE200");
    assert_eq!(b1.quantity, 2);
    assert_eq!(b1.end_deg, Some(45.0));

    let r1 = rows.iter().find(|r| r.name == "R1").unwrap();
    assert_eq!(r1.quantity, 3);

    let summaries = pattern_summaries(&patterns);
    assert_eq!(summaries.len(), 6);
    assert_eq!(summaries[0].utilization_pct, 5000.0 / 6000.0 * 100.0);
}
