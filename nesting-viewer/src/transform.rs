//! View transformation for converting between scene and screen coordinates.
//!
//! The scene is projected into the canvas at zoom 1.0, so "fit to window" is
//! just the identity transform. Both spaces are y-down.

use egui::{Pos2, Vec2};
use nesting_core::generator::Point;

/// Transformation state for pan and zoom.
#[derive(Debug, Clone)]
pub struct ViewTransform {
    /// Pan offset in screen pixels
    pub offset: Vec2,
    /// Zoom level (1.0 = fitted, 2.0 = twice as large, etc.)
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    /// Minimum zoom level
    pub const MIN_ZOOM: f32 = 0.5;
    /// Maximum zoom level
    pub const MAX_ZOOM: f32 = 40.0;
    /// Zoom factor per scroll step
    pub const ZOOM_FACTOR: f32 = 1.1;

    /// Convert scene coordinates (relative to the canvas origin) to screen coordinates.
    pub fn scene_to_screen(&self, p: Point, canvas_rect: egui::Rect) -> Pos2 {
        Pos2::new(
            canvas_rect.min.x + self.offset.x + p.x as f32 * self.zoom,
            canvas_rect.min.y + self.offset.y + p.y as f32 * self.zoom,
        )
    }

    /// Convert screen coordinates to scene coordinates.
    pub fn screen_to_scene(&self, screen_pos: Pos2, canvas_rect: egui::Rect) -> Point {
        Point::new(
            ((screen_pos.x - canvas_rect.min.x - self.offset.x) / self.zoom) as f64,
            ((screen_pos.y - canvas_rect.min.y - self.offset.y) / self.zoom) as f64,
        )
    }

    /// Zoom in/out centered on a screen position.
    pub fn zoom_at(&mut self, screen_pos: Pos2, canvas_rect: egui::Rect, factor: f32) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);

        if (self.zoom - old_zoom).abs() > f32::EPSILON {
            // Keep the point under the cursor fixed
            let local = screen_pos - canvas_rect.min;
            let anchor = (local - self.offset) / old_zoom;
            self.offset = local - anchor * self.zoom;
        }
    }

    /// Zoom in/out around the canvas centre.
    pub fn zoom_centered(&mut self, canvas_rect: egui::Rect, factor: f32) {
        self.zoom_at(canvas_rect.center(), canvas_rect, factor);
    }

    /// Pan the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Reset to the fitted view.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Get the zoom level as a percentage string.
    pub fn zoom_percent(&self) -> String {
        format!("{:.0}%", self.zoom * 100.0)
    }
}
