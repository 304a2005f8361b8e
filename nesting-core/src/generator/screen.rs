//! Interactive surface: fit one bar into a canvas.

use super::scene::{layout_extent, project, BarScene, Rect};
use crate::model::Layout;

/// Default padding between the canvas edge and the bar, in pixels.
pub const SCREEN_PADDING: f64 = 24.0;

/// Tallest bar drawn on screen, in pixels.
pub const SCREEN_MAX_BAR_HEIGHT: f64 = 72.0;

/// Rectangle the stock bar occupies inside `canvas`.
///
/// The bar is vertically centred; oversize parts shrink the bar so the
/// overflow still fits.
pub fn fit_bar(layout: &Layout, canvas: Rect, padding: f64) -> Rect {
    let inner = canvas.shrink(padding);
    let height = inner.height.min(SCREEN_MAX_BAR_HEIGHT);
    let width = inner.width / layout_extent(layout);
    Rect::new(
        inner.x,
        inner.y + (inner.height - height) / 2.0,
        width,
        height,
    )
}

/// Scene for an on-screen canvas.
pub fn screen_scene(layout: &Layout, canvas: Rect, padding: f64) -> BarScene {
    project(layout, fit_bar(layout, canvas, padding))
}
