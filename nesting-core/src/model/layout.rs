//! Medium-independent layout of one cutting pattern.
//!
//! This is the only thing renderers consume: every geometric decision is
//! already made, renderers just scale fractions into their surface.

use serde::{Deserialize, Serialize};

use super::cut_end::{PartGeometry, Sign};
use super::part::PartName;

/// Which neighbour of a boundary owns the cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The part ending at the boundary.
    Left,
    /// The part starting at the boundary.
    Right,
}

/// Resolved cut at a boundary position.
///
/// Bar start and bar end resolve like any other position, so there is no
/// unresolved kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Square cut.
    Straight,
    /// Angled cut owned by one side.
    Sloped {
        deviation_deg: f64,
        owner: Side,
        /// Lean of the cut line: `Positive` means the top edge sits closer
        /// to the bar end than the bottom edge.
        lean: Sign,
    },
}

impl BoundaryKind {
    /// Check if this boundary is an angled cut.
    pub fn is_sloped(&self) -> bool {
        matches!(self, BoundaryKind::Sloped { .. })
    }
}

/// One cut position along the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Distance from the bar start in mm.
    pub position_mm: f64,
    /// Distance from the bar start as a fraction of stock length.
    pub fraction: f64,
    pub kind: BoundaryKind,
    /// Both touching ends are produced by a single saw cut.
    pub shared: bool,
}

/// A part drawn on the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpan {
    /// Index into `Pattern::parts`.
    pub part_index: usize,
    pub name: PartName,
    pub length_mm: f64,
    pub start_fraction: f64,
    pub end_fraction: f64,
    /// Canonical, oriented end geometry.
    pub geometry: PartGeometry,
    pub complementary: bool,
    /// Index into `Layout::boundaries`.
    pub left_boundary: usize,
    /// Index into `Layout::boundaries`.
    pub right_boundary: usize,
}

impl PartSpan {
    /// Width of the span as a fraction of stock length.
    pub fn width_fraction(&self) -> f64 {
        self.end_fraction - self.start_fraction
    }
}

/// Leftover material after the last part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WasteSpan {
    pub start_fraction: f64,
    pub end_fraction: f64,
    pub length_mm: f64,
}

/// Reason a layout carries no spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMarker {
    /// Pattern has no parts.
    NoData,
    /// Stock length is missing, non-positive or not finite.
    InvalidStockLength,
}

impl LayoutMarker {
    /// Marker as shown to renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMarker::NoData => "no-data",
            LayoutMarker::InvalidStockLength => "invalid-stock-length",
        }
    }

    /// Placeholder message for a surface.
    pub fn message(&self) -> &'static str {
        match self {
            LayoutMarker::NoData => "No cutting data for this bar",
            LayoutMarker::InvalidStockLength => "Invalid stock length",
        }
    }
}

impl std::fmt::Display for LayoutMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Degraded-but-rendered conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// A part is longer than the stock bar; the layout shows it un-clipped.
    ExceedsStock {
        part_index: usize,
        length_mm: f64,
        stock_length_mm: f64,
    },
    /// Waste was outside `[0, stock]` and has been clamped.
    WasteClamped { reported_mm: f64, used_mm: f64 },
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::ExceedsStock {
                length_mm,
                stock_length_mm,
                ..
            } => write!(
                f,
                "Part length {:.1} mm exceeds stock length {:.1} mm",
                length_mm, stock_length_mm
            ),
            LayoutWarning::WasteClamped {
                reported_mm,
                used_mm,
            } => write!(
                f,
                "Waste {:.1} mm is outside the bar, using {:.1} mm",
                reported_mm, used_mm
            ),
        }
    }
}

/// Per-part failure recorded while classifying end cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub part_index: usize,
    pub message: String,
}

/// Resolved layout of one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub marker: Option<LayoutMarker>,
    pub stock_length_mm: f64,
    pub spans: Vec<PartSpan>,
    pub waste: Option<WasteSpan>,
    /// De-duplicated boundaries, sorted by position.
    pub boundaries: Vec<Boundary>,
    pub exceeds_stock: bool,
    pub warnings: Vec<LayoutWarning>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    /// Layout with no spans and an explanatory marker.
    pub fn empty(marker: LayoutMarker, stock_length_mm: f64) -> Self {
        Self {
            marker: Some(marker),
            stock_length_mm,
            spans: Vec::new(),
            waste: None,
            boundaries: Vec::new(),
            exceeds_stock: false,
            warnings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Check if the layout has something to draw.
    pub fn is_renderable(&self) -> bool {
        self.marker.is_none() && !self.spans.is_empty()
    }

    /// Left boundary of a span.
    pub fn left_of(&self, span: &PartSpan) -> &Boundary {
        &self.boundaries[span.left_boundary]
    }

    /// Right boundary of a span.
    pub fn right_of(&self, span: &PartSpan) -> &Boundary {
        &self.boundaries[span.right_boundary]
    }

    /// Total drawn length in mm (part spans plus waste span).
    pub fn drawn_length_mm(&self) -> f64 {
        let parts: f64 = self
            .spans
            .iter()
            .map(|s| s.width_fraction() * self.stock_length_mm)
            .sum();
        let waste = self
            .waste
            .map(|w| (w.end_fraction - w.start_fraction) * self.stock_length_mm)
            .unwrap_or(0.0);
        parts + waste
    }

    /// Number of sloped boundaries.
    pub fn sloped_count(&self) -> usize {
        self.boundaries.iter().filter(|b| b.kind.is_sloped()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_strings() {
        assert_eq!(LayoutMarker::NoData.as_str(), "no-data");
        assert_eq!(
            serde_json::to_string(&LayoutMarker::InvalidStockLength).unwrap(),
            r#""invalid-stock-length""#
        );
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::empty(LayoutMarker::NoData, 6000.0);
        assert!(!layout.is_renderable());
        assert!(layout.spans.is_empty());
        assert_eq!(layout.drawn_length_mm(), 0.0);
    }

    #[test]
    fn test_warning_display() {
        let warning = LayoutWarning::ExceedsStock {
            part_index: 0,
            length_mm: 13000.0,
            stock_length_mm: 12000.0,
        };
        assert_eq!(
            warning.to_string(),
            "Part length 13000.0 mm exceeds stock length 12000.0 mm"
        );
    }
}
