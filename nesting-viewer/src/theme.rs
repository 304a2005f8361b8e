//! Color palette and styling constants for the viewer.
//!
//! The stock bar is the neutral "paper"; parts use warm colors, sloped cuts
//! are high-visibility red, waste is a muted red tint.

use egui::Color32;

// =============================================================================
// BACKGROUND
// =============================================================================
pub const CANVAS_BG: Color32 = Color32::from_rgb(32, 34, 37);

// =============================================================================
// STOCK BAR - Neutral slate, like raw steel
// =============================================================================
pub const BAR_FILL: Color32 = Color32::from_rgb(55, 65, 75);
pub const BAR_BORDER: Color32 = Color32::from_rgb(100, 115, 130);

// =============================================================================
// CUTS
// =============================================================================
pub const SLOPED_CUT: Color32 = Color32::from_rgb(255, 85, 50);
pub const SLOPED_CUT_OWNED: Color32 = Color32::from_rgba_premultiplied(200, 70, 40, 160);
pub const STRAIGHT_CUT: Color32 = Color32::from_rgb(150, 160, 170);

// =============================================================================
// PARTS - Warm amber/gold tones that pop against the cool grey bar
// =============================================================================
pub const PART_BORDER: Color32 = Color32::from_rgb(255, 200, 100);
pub const PART_FILL: Color32 = Color32::from_rgba_premultiplied(255, 180, 80, 50);
pub const PART_HOVER_FILL: Color32 = Color32::from_rgba_premultiplied(255, 200, 100, 100);
pub const PART_HOVER_BORDER: Color32 = Color32::from_rgb(255, 230, 150);
pub const PART_SELECTED_FILL: Color32 = Color32::from_rgba_premultiplied(255, 220, 50, 120);
pub const PART_SELECTED_BORDER: Color32 = Color32::from_rgb(255, 220, 50);

/// Complementary pairs get a teal tint so the pairing is visible.
pub const COMPLEMENTARY_FILL: Color32 = Color32::from_rgba_premultiplied(0, 200, 160, 60);

// =============================================================================
// WASTE - Muted red tint to indicate "scrap"
// =============================================================================
pub const WASTE_FILL: Color32 = Color32::from_rgba_premultiplied(120, 50, 50, 80);
pub const WASTE_BORDER: Color32 = Color32::from_rgba_premultiplied(180, 80, 80, 150);

// =============================================================================
// TEXT
// =============================================================================
pub const LABEL_TEXT: Color32 = Color32::from_rgb(240, 240, 240);
pub const LABEL_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
pub const DIM_TEXT: Color32 = Color32::from_rgb(140, 145, 150);
pub const WARNING_TEXT: Color32 = Color32::from_rgb(255, 170, 60);

// =============================================================================
// STROKE WIDTHS
// =============================================================================
pub const BAR_STROKE_WIDTH: f32 = 2.0;
pub const SLOPED_STROKE_WIDTH: f32 = 2.0;
pub const STRAIGHT_STROKE_WIDTH: f32 = 1.0;
pub const PART_STROKE_WIDTH: f32 = 1.5;
pub const PART_HOVER_STROKE_WIDTH: f32 = 2.5;
pub const SELECTION_STROKE_WIDTH: f32 = 3.0;
pub const WASTE_STROKE_WIDTH: f32 = 1.0;
