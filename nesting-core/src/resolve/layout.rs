//! Layout emission: spans as fractions of stock length.

use super::boundary::dedup_boundaries;
use super::PlacedPart;
use crate::model::{Boundary, Diagnostic, Layout, LayoutWarning, PartSpan, WasteSpan};

/// Clamp the reported waste into `[0, stock]`.
///
/// Returns the usable waste and a warning when the reported value had to change.
pub fn clamp_waste(waste_mm: f64, stock_length_mm: f64) -> (f64, Option<LayoutWarning>) {
    let used = if waste_mm.is_finite() {
        waste_mm.clamp(0.0, stock_length_mm)
    } else {
        0.0
    };
    // NaN never compares equal, so it always produces a warning
    #[allow(clippy::float_cmp)]
    let unchanged = used == waste_mm;
    if unchanged {
        (used, None)
    } else {
        (
            used,
            Some(LayoutWarning::WasteClamped {
                reported_mm: waste_mm,
                used_mm: used,
            }),
        )
    }
}

/// Part edges along the bar as fractions of stock length.
///
/// Parts share the non-waste portion `(stock - waste) / stock` in proportion
/// to their lengths, so the last edge is exactly that portion (1.0 when there
/// is no waste). Negative lengths draw as zero width.
pub fn edge_fractions(lengths: &[f64], stock_length_mm: f64, waste_mm: f64) -> Vec<f64> {
    let drawn: Vec<f64> = lengths.iter().map(|l| l.max(0.0)).collect();
    let total: f64 = drawn.iter().sum();
    let region = (stock_length_mm - waste_mm) / stock_length_mm;

    let mut edges = Vec::with_capacity(drawn.len() + 1);
    edges.push(0.0);
    let mut cumulative = 0.0;
    for length in &drawn {
        cumulative += length;
        edges.push(if total > 0.0 {
            cumulative / total * region
        } else {
            0.0
        });
    }
    edges
}

/// Everything the emitter needs for one pattern.
pub struct EmitInput<'a> {
    pub stock_length_mm: f64,
    /// Oriented parts in layout order.
    pub parts: &'a [PlacedPart],
    /// `parts.len() + 1` edge fractions.
    pub edges: &'a [f64],
    /// One boundary per edge, before de-duplication.
    pub boundaries: &'a [Boundary],
    pub waste: Option<WasteSpan>,
    pub exceeds_stock: bool,
    pub warnings: Vec<LayoutWarning>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assemble the final layout.
pub fn emit(input: EmitInput<'_>) -> Layout {
    let (boundaries, index_map) = dedup_boundaries(input.boundaries);

    let spans = input
        .parts
        .iter()
        .enumerate()
        .map(|(pos, part)| PartSpan {
            part_index: part.part_index,
            name: part.name.clone(),
            length_mm: part.length_mm,
            start_fraction: input.edges[pos],
            end_fraction: input.edges[pos + 1],
            geometry: part.geometry,
            complementary: part.complementary,
            left_boundary: index_map[pos],
            right_boundary: index_map[pos + 1],
        })
        .collect();

    Layout {
        marker: None,
        stock_length_mm: input.stock_length_mm,
        spans,
        waste: input.waste,
        boundaries,
        exceeds_stock: input.exceeds_stock,
        warnings: input.warnings,
        diagnostics: input.diagnostics,
    }
}
