//! Projection of a resolved layout into a drawing rectangle.
//!
//! Every cut decision is taken from the [`Layout`]; this module only turns
//! fractions into coordinates. Coordinates are y-down, with `rect.y` at the
//! top edge of the bar.

use serde::Serialize;

use crate::config::angle::slant_ratio;
use crate::model::{Boundary, BoundaryKind, Layout, LayoutMarker, PartSpan, Side, Sign};

/// A point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, y-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle shrunk by `padding` on every side (never negative).
    pub fn shrink(&self, padding: f64) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - 2.0 * padding).max(0.0),
            height: (self.height - 2.0 * padding).max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// A cut drawn across the bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutLine {
    /// Index into `Layout::boundaries`.
    pub boundary: usize,
    pub top: Point,
    pub bottom: Point,
    pub sloped: bool,
    pub shared: bool,
    /// Lean of a sloped cut; `None` for straight cuts.
    pub lean: Option<Sign>,
    /// Deviation label for sloped cuts, e.g. `"45.0°"`.
    pub label: Option<String>,
}

impl CutLine {
    fn min_x(&self) -> f64 {
        self.top.x.min(self.bottom.x)
    }

    fn max_x(&self) -> f64 {
        self.top.x.max(self.bottom.x)
    }
}

/// A part outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanShape {
    pub part_index: usize,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub polygon: [Point; 4],
    /// The left edge follows a sloped cut.
    pub left_sloped: bool,
    /// The right edge follows a sloped cut.
    pub right_sloped: bool,
    /// Index into `BarScene::cut_lines` of the left cut.
    pub left_cut: usize,
    /// Index into `BarScene::cut_lines` of the right cut.
    pub right_cut: usize,
    pub complementary: bool,
    pub label: String,
    pub label_at: Point,
}

/// Leftover material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteShape {
    pub rect: Rect,
    pub label: String,
}

/// Everything a surface needs to draw one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarScene {
    /// Outline of the whole stock bar.
    pub bar: Rect,
    /// Placeholder text when there is nothing to draw.
    pub placeholder: Option<&'static str>,
    pub spans: Vec<SpanShape>,
    pub cut_lines: Vec<CutLine>,
    pub waste: Option<WasteShape>,
    pub exceeds_stock: bool,
    pub warnings: Vec<String>,
}

impl BarScene {
    fn placeholder(bar: Rect, marker: LayoutMarker) -> Self {
        Self {
            bar,
            placeholder: Some(marker.message()),
            spans: Vec::new(),
            cut_lines: Vec::new(),
            waste: None,
            exceeds_stock: false,
            warnings: Vec::new(),
        }
    }

    /// Bounding box of everything drawn, including un-clipped overflow.
    pub fn extent(&self) -> Rect {
        let right = self
            .spans
            .iter()
            .flat_map(|s| s.polygon.iter().map(|p| p.x))
            .fold(self.bar.right(), f64::max);
        Rect::new(self.bar.x, self.bar.y, right - self.bar.x, self.bar.height)
    }
}

/// Drawn length of a layout in units of stock length.
///
/// At least 1.0; more when an oversize part runs past the bar end.
pub fn layout_extent(layout: &Layout) -> f64 {
    layout
        .spans
        .iter()
        .map(|s| s.end_fraction)
        .filter(|f| f.is_finite())
        .fold(1.0, f64::max)
}

/// Span label: name and length.
pub fn span_label(span: &PartSpan) -> String {
    format!("{} {:.0}", span.name, span.length_mm)
}

/// Horizontal offset of the top point from the bottom point of a cut.
fn slant_dx(kind: &BoundaryKind, bar_height: f64) -> f64 {
    match kind {
        BoundaryKind::Straight => 0.0,
        BoundaryKind::Sloped {
            deviation_deg,
            lean,
            ..
        } => lean.value() * slant_ratio(*deviation_deg) * bar_height,
    }
}

/// Width of the span that owns a boundary, in surface units.
fn owner_width(layout: &Layout, index: usize, owner: Side, scale: f64) -> Option<f64> {
    layout
        .spans
        .iter()
        .find(|s| match owner {
            Side::Left => s.right_boundary == index,
            Side::Right => s.left_boundary == index,
        })
        .map(|s| s.width_fraction() * scale)
}

fn cut_line(
    layout: &Layout,
    index: usize,
    boundary: &Boundary,
    bar: Rect,
    scale: f64,
    last_index: usize,
) -> CutLine {
    let x = bar.x + boundary.fraction * scale;
    let mut dx = slant_dx(&boundary.kind, bar.height);
    if let BoundaryKind::Sloped { owner, .. } = boundary.kind {
        if let Some(width) = owner_width(layout, index, owner, scale) {
            let limit = width / 2.0;
            dx = dx.clamp(-limit, limit);
        }
    }

    // bar ends keep the whole slant inside the drawn parts
    let centre = if index == 0 {
        x + dx.abs() / 2.0
    } else if index == last_index {
        x - dx.abs() / 2.0
    } else {
        x
    };

    let (lean, label) = match boundary.kind {
        BoundaryKind::Straight => (None, None),
        BoundaryKind::Sloped {
            deviation_deg,
            lean,
            ..
        } => (Some(lean), Some(format!("{:.1}°", deviation_deg))),
    };

    CutLine {
        boundary: index,
        top: Point::new(centre + dx / 2.0, bar.y),
        bottom: Point::new(centre - dx / 2.0, bar.bottom()),
        sloped: boundary.kind.is_sloped(),
        shared: boundary.shared,
        lean,
        label,
    }
}

/// Which side of a cut a span is on.
fn edge_follows_line(boundary: &Boundary, span_side: Side) -> bool {
    match boundary.kind {
        BoundaryKind::Straight => false,
        BoundaryKind::Sloped { owner, .. } => boundary.shared || owner == span_side,
    }
}

/// Project a layout into `bar`.
///
/// A fraction of 1.0 maps to the right edge of `bar`; parts longer than the
/// stock are drawn past it.
pub fn project(layout: &Layout, bar: Rect) -> BarScene {
    if let Some(marker) = layout.marker {
        return BarScene::placeholder(bar, marker);
    }
    if layout.spans.is_empty() {
        return BarScene::placeholder(bar, LayoutMarker::NoData);
    }

    let scale = bar.width;
    let last_index = layout.spans.iter().map(|s| s.right_boundary).max().unwrap_or(0);
    let cut_lines: Vec<CutLine> = layout
        .boundaries
        .iter()
        .enumerate()
        .map(|(i, b)| cut_line(layout, i, b, bar, scale, last_index))
        .collect();

    let spans = layout
        .spans
        .iter()
        .map(|span| {
            let left_boundary = &layout.boundaries[span.left_boundary];
            let right_boundary = &layout.boundaries[span.right_boundary];
            let left_line = &cut_lines[span.left_boundary];
            let right_line = &cut_lines[span.right_boundary];

            // the span is the right-hand neighbour of its left boundary
            let left_sloped = edge_follows_line(left_boundary, Side::Right);
            let right_sloped = edge_follows_line(right_boundary, Side::Left);

            let (top_left, bottom_left) = if left_sloped {
                (left_line.top, left_line.bottom)
            } else {
                let x = left_line.max_x();
                (Point::new(x, bar.y), Point::new(x, bar.bottom()))
            };
            let (top_right, bottom_right) = if right_sloped {
                (right_line.top, right_line.bottom)
            } else {
                let x = right_line.min_x();
                (Point::new(x, bar.y), Point::new(x, bar.bottom()))
            };

            let centre_x = (top_left.x + top_right.x + bottom_left.x + bottom_right.x) / 4.0;
            SpanShape {
                part_index: span.part_index,
                polygon: [top_left, top_right, bottom_right, bottom_left],
                left_sloped,
                right_sloped,
                left_cut: span.left_boundary,
                right_cut: span.right_boundary,
                complementary: span.complementary,
                label: span_label(span),
                label_at: Point::new(centre_x, bar.y + bar.height / 2.0),
            }
        })
        .collect();

    let waste = layout.waste.map(|w| WasteShape {
        rect: Rect::new(
            bar.x + w.start_fraction * scale,
            bar.y,
            (w.end_fraction - w.start_fraction) * scale,
            bar.height,
        ),
        label: format!("waste {:.0}", w.length_mm),
    });

    BarScene {
        bar,
        placeholder: None,
        spans,
        cut_lines,
        waste,
        exceeds_stock: layout.exceeds_stock,
        warnings: layout.warnings.iter().map(|w| w.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::{Part, Pattern, RawAngle};
    use crate::resolve::resolve;

    fn miter_pair_layout() -> Layout {
        let part = Part::new("B1", 2500.0).with_angles(None, Some(RawAngle::from(45.0)));
        let pattern = Pattern::new(6000.0)
            .with_part(part.clone())
            .with_part(part)
            .with_waste(1000.0);
        resolve(&pattern, &ResolverConfig::default())
    }

    #[test]
    fn test_placeholder_for_marker() {
        let layout = Layout::empty(LayoutMarker::InvalidStockLength, 0.0);
        let scene = project(&layout, Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(scene.placeholder, Some("Invalid stock length"));
        assert!(scene.spans.is_empty());
    }

    #[test]
    fn test_shared_miter_both_edges_follow_line() {
        let layout = miter_pair_layout();
        let scene = project(&layout, Rect::new(0.0, 0.0, 600.0, 20.0));

        assert_eq!(scene.spans.len(), 2);
        assert!(scene.spans[0].right_sloped);
        assert!(scene.spans[1].left_sloped);
        assert!(!scene.spans[0].left_sloped);
        assert!(!scene.spans[1].right_sloped);
        // both polygons use the same line
        assert_eq!(scene.spans[0].polygon[1], scene.spans[1].polygon[0]);
        assert_eq!(scene.spans[0].polygon[2], scene.spans[1].polygon[3]);
    }

    #[test]
    fn test_sloped_line_uses_slant() {
        let layout = miter_pair_layout();
        let scene = project(&layout, Rect::new(0.0, 0.0, 600.0, 20.0));
        let line = scene.cut_lines.iter().find(|l| l.sloped).unwrap();
        // 45° over 20 units of height
        assert!(((line.top.x - line.bottom.x).abs() - 20.0).abs() < 1e-9);
        assert!(line.shared);
        assert_eq!(line.label.as_deref(), Some("45.0°"));
    }

    #[test]
    fn test_waste_rect() {
        let scene = project(&miter_pair_layout(), Rect::new(10.0, 5.0, 600.0, 20.0));
        let waste = scene.waste.unwrap();
        assert!((waste.rect.x - 510.0).abs() < 1e-9);
        assert!((waste.rect.right() - 610.0).abs() < 1e-9);
        assert_eq!(waste.label, "waste 1000");
    }

    #[test]
    fn test_unshared_cut_leaves_gap() {
        let pattern = Pattern::new(5000.0)
            .with_part(Part::new("A", 2000.0).with_angles(None, Some(RawAngle::from(30.0))))
            .with_part(Part::new("B", 1000.0));
        let layout = resolve(&pattern, &ResolverConfig::default());
        let scene = project(&layout, Rect::new(0.0, 0.0, 500.0, 20.0));

        assert!(scene.spans[0].right_sloped);
        assert!(!scene.spans[1].left_sloped);
        let line = &scene.cut_lines[scene.spans[1].left_cut];
        assert_eq!(scene.spans[1].polygon[0].x, line.max_x());
    }

    #[test]
    fn test_bar_start_slant_stays_inside() {
        let pattern = Pattern::new(5000.0).with_part(
            Part::new("A", 2000.0).with_angles(Some(RawAngle::from(30.0)), Some(RawAngle::from(20.0))),
        );
        let layout = resolve(&pattern, &ResolverConfig::default());
        let scene = project(&layout, Rect::new(0.0, 0.0, 500.0, 20.0));
        let first = &scene.cut_lines[0];
        assert!(first.min_x() >= -1e-9);
    }
}
