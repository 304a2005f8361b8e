//! Canvas rendering for the nesting viewer.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};
use nesting_core::generator::{BarScene, Point, SpanShape};

use crate::layers::LayerVisibility;
use crate::theme;
use crate::transform::ViewTransform;

/// Hover and selection state passed to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight {
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
}

/// Render a bar scene on the canvas.
pub fn render_scene(
    painter: &Painter,
    scene: &BarScene,
    transform: &ViewTransform,
    canvas_rect: Rect,
    layers: &LayerVisibility,
    highlight: Highlight,
) {
    let to_screen = |p: Point| transform.scene_to_screen(p, canvas_rect);

    // Render layers from bottom to top
    if layers.bar {
        render_bar(painter, scene, &to_screen);
    }

    if let Some(message) = scene.placeholder {
        painter.text(
            to_screen(scene.bar.center()),
            Align2::CENTER_CENTER,
            message,
            FontId::proportional(18.0),
            theme::DIM_TEXT,
        );
        return;
    }

    if layers.waste {
        render_waste(painter, scene, &to_screen);
    }

    if layers.parts {
        for (i, span) in scene.spans.iter().enumerate() {
            render_span(painter, span, &to_screen, highlight, i);
        }
    }

    if layers.cuts {
        render_cut_lines(painter, scene, &to_screen, layers.angles);
    }

    if layers.labels {
        for (i, span) in scene.spans.iter().enumerate() {
            let emphasized = highlight.hovered == Some(i) || highlight.selected == Some(i);
            render_label(painter, to_screen(span.label_at), &span.label, emphasized);
        }
    }

    if layers.warnings {
        render_warnings(painter, scene, canvas_rect);
    }
}

fn render_bar(painter: &Painter, scene: &BarScene, to_screen: &impl Fn(Point) -> Pos2) {
    let [top_left, _, bottom_right, _] = scene.bar.corners();
    let rect = Rect::from_two_pos(to_screen(top_left), to_screen(bottom_right));

    painter.rect_filled(rect, 0.0, theme::BAR_FILL);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(theme::BAR_STROKE_WIDTH, theme::BAR_BORDER),
    );
}

fn render_waste(painter: &Painter, scene: &BarScene, to_screen: &impl Fn(Point) -> Pos2) {
    let Some(waste) = &scene.waste else {
        return;
    };
    let [top_left, _, bottom_right, _] = waste.rect.corners();
    let rect = Rect::from_two_pos(to_screen(top_left), to_screen(bottom_right));

    painter.rect_filled(rect, 0.0, theme::WASTE_FILL);
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(theme::WASTE_STROKE_WIDTH, theme::WASTE_BORDER),
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &waste.label,
        FontId::proportional(11.0),
        theme::DIM_TEXT,
    );
}

/// Render a single part outline.
fn render_span(
    painter: &Painter,
    span: &SpanShape,
    to_screen: &impl Fn(Point) -> Pos2,
    highlight: Highlight,
    index: usize,
) {
    let points: Vec<Pos2> = span.polygon.iter().map(|p| to_screen(*p)).collect();

    // Choose colors based on selection/hover state
    let (fill, border, width) = if highlight.selected == Some(index) {
        (
            theme::PART_SELECTED_FILL,
            theme::PART_SELECTED_BORDER,
            theme::SELECTION_STROKE_WIDTH,
        )
    } else if highlight.hovered == Some(index) {
        (
            theme::PART_HOVER_FILL,
            theme::PART_HOVER_BORDER,
            theme::PART_HOVER_STROKE_WIDTH,
        )
    } else if span.complementary {
        (
            theme::COMPLEMENTARY_FILL,
            theme::PART_BORDER,
            theme::PART_STROKE_WIDTH,
        )
    } else {
        (theme::PART_FILL, theme::PART_BORDER, theme::PART_STROKE_WIDTH)
    };

    painter.add(Shape::convex_polygon(points, fill, Stroke::new(width, border)));
}

fn render_cut_lines(
    painter: &Painter,
    scene: &BarScene,
    to_screen: &impl Fn(Point) -> Pos2,
    show_angles: bool,
) {
    for line in &scene.cut_lines {
        let top = to_screen(line.top);
        let bottom = to_screen(line.bottom);

        if !line.sloped {
            painter.line_segment(
                [top, bottom],
                Stroke::new(theme::STRAIGHT_STROKE_WIDTH, theme::STRAIGHT_CUT),
            );
            continue;
        }

        // Shared saw cuts are solid, cuts owned by one part are drawn fainter
        let color = if line.shared {
            theme::SLOPED_CUT
        } else {
            theme::SLOPED_CUT_OWNED
        };
        painter.line_segment([top, bottom], Stroke::new(theme::SLOPED_STROKE_WIDTH, color));

        if show_angles {
            if let Some(label) = &line.label {
                painter.text(
                    top - egui::Vec2::new(0.0, 4.0),
                    Align2::CENTER_BOTTOM,
                    label,
                    FontId::proportional(11.0),
                    theme::SLOPED_CUT,
                );
            }
        }
    }
}

/// Render a part label with a drop shadow.
fn render_label(painter: &Painter, center: Pos2, label: &str, emphasized: bool) {
    let font_size = if emphasized { 14.0 } else { 12.0 };
    let color: Color32 = if emphasized {
        theme::PART_SELECTED_BORDER
    } else {
        theme::LABEL_TEXT
    };

    // Draw shadow for better readability
    painter.text(
        center + egui::Vec2::new(1.0, 1.0),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(font_size),
        theme::LABEL_SHADOW,
    );
    painter.text(
        center,
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(font_size),
        color,
    );
}

/// Warnings stay pinned to the top-left of the canvas regardless of pan/zoom.
fn render_warnings(painter: &Painter, scene: &BarScene, canvas_rect: Rect) {
    let mut y = canvas_rect.min.y + 8.0;
    for warning in &scene.warnings {
        painter.text(
            Pos2::new(canvas_rect.min.x + 8.0, y),
            Align2::LEFT_TOP,
            format!("\u{26a0} {}", warning),
            FontId::proportional(13.0),
            theme::WARNING_TEXT,
        );
        y += 18.0;
    }
}

/// Index of the span whose outline contains `p`, if any.
pub fn span_at(scene: &BarScene, p: Point) -> Option<usize> {
    scene
        .spans
        .iter()
        .position(|span| polygon_contains(&span.polygon, p))
}

/// Point-in-convex-polygon test; the polygon winds clockwise in y-down space.
fn polygon_contains(polygon: &[Point; 4], p: Point) -> bool {
    (0..polygon.len()).all(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) >= 0.0
    })
}
