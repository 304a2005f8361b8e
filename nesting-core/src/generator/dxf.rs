//! DXF (Drawing Exchange Format) output for printed pages.
//!
//! Pages are stacked downwards in model space. DXF is y-up, so every page is
//! mirrored vertically from the y-down scene coordinates.

use std::fmt::Write;

use super::page::Page;
use super::scene::{BarScene, Point, Rect};

/// Vertical gap between stacked pages, in mm.
const PAGE_GAP_MM: f64 = 10.0;

/// DXF layer colors (AutoCAD color indices)
pub struct DxfColors {
    pub page: i32,    // Page frame
    pub bar: i32,     // Stock bar outline
    pub parts: i32,   // Part outlines
    pub sloped: i32,  // Sloped cuts
    pub waste: i32,   // Waste fill
    pub text: i32,    // Captions and labels
    pub warning: i32, // Warning text
}

impl Default for DxfColors {
    fn default() -> Self {
        Self {
            page: 8,     // Dark gray
            bar: 9,      // Light gray
            parts: 5,    // Blue
            sloped: 1,   // Red
            waste: 254,  // Gray
            text: 7,     // White/black
            warning: 1,  // Red
        }
    }
}

/// DXF writer for AutoCAD-compatible drawings.
pub struct DxfWriter {
    output: String,
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Get the generated DXF content.
    pub fn into_string(self) -> String {
        self.output
    }

    /// Write a DXF group code and value, code right-aligned in 3 chars.
    fn write_group(&mut self, code: i32, value: &str) {
        writeln!(self.output, "{:>3}", code).unwrap();
        writeln!(self.output, "{}", value).unwrap();
    }

    /// Write a DXF group code with integer value (right-aligned in 6 chars).
    fn write_group_int(&mut self, code: i32, value: i32) {
        writeln!(self.output, "{:>3}", code).unwrap();
        writeln!(self.output, "{:>6}", value).unwrap();
    }

    /// Format a coordinate with 3 decimal places, rounding half away from zero.
    fn format_coord(value: f64) -> String {
        let scaled = value * 1000.0;
        let rounded = if scaled >= 0.0 {
            (scaled + 0.5).floor()
        } else {
            (scaled - 0.5).ceil()
        };
        format!("{:.3}", rounded / 1000.0)
    }

    fn write_point(&mut self, index: i32, x: f64, y: f64) {
        self.write_group(10 + index, &Self::format_coord(x));
        self.write_group(20 + index, &Self::format_coord(y));
        self.write_group(30 + index, "0.000");
    }

    /// Write the header section with drawing extents.
    pub fn write_header(&mut self, min: (f64, f64), max: (f64, f64)) {
        self.write_group(0, "SECTION");
        self.write_group(2, "HEADER");

        self.write_group(9, "$ACADVER");
        self.write_group(1, "AC1009");

        self.write_group(9, "$EXTMIN");
        self.write_point(0, min.0, min.1);
        self.write_group(9, "$EXTMAX");
        self.write_point(0, max.0, max.1);

        self.write_group(0, "ENDSEC");
    }

    /// Write the tables section with layer definitions.
    pub fn write_tables(&mut self, layers: &[(&str, i32)]) {
        self.write_group(0, "SECTION");
        self.write_group(2, "TABLES");

        self.write_group(0, "TABLE");
        self.write_group(2, "LTYPE");
        self.write_group_int(70, 1);
        self.write_group(0, "LTYPE");
        self.write_group(2, "CONTINUOUS");
        self.write_group_int(70, 64);
        self.write_group(3, "Solid line");
        self.write_group_int(72, 65);
        self.write_group_int(73, 0);
        self.write_group(40, "0.0");
        self.write_group(0, "ENDTAB");

        self.write_group(0, "TABLE");
        self.write_group(2, "LAYER");
        self.write_group_int(70, layers.len() as i32);
        for (name, color) in layers {
            self.write_group(0, "LAYER");
            self.write_group(2, name);
            self.write_group_int(70, 64);
            self.write_group_int(62, *color);
            self.write_group(6, "CONTINUOUS");
        }
        self.write_group(0, "ENDTAB");

        self.write_group(0, "ENDSEC");
    }

    /// Begin the entities section.
    pub fn begin_entities(&mut self) {
        self.write_group(0, "SECTION");
        self.write_group(2, "ENTITIES");
    }

    /// End the entities section and write EOF.
    pub fn end_entities(&mut self) {
        self.write_group(0, "ENDSEC");
        self.write_group(0, "EOF");
    }

    /// Write a LINE entity.
    pub fn write_line_entity(&mut self, layer: &str, color: i32, from: Point, to: Point) {
        self.write_group(0, "LINE");
        self.write_group(8, layer);
        self.write_group_int(62, color);
        self.write_point(0, from.x, from.y);
        self.write_point(1, to.x, to.y);
    }

    /// Write a closed outline as LINE entities.
    pub fn write_outline(&mut self, layer: &str, color: i32, polygon: &[Point]) {
        for (i, from) in polygon.iter().enumerate() {
            let to = polygon[(i + 1) % polygon.len()];
            self.write_line_entity(layer, color, *from, to);
        }
    }

    /// Write a SOLID entity (filled quadrilateral).
    ///
    /// DXF SOLID corners go in zig-zag order: first, second, then the third
    /// and fourth across from them.
    pub fn write_solid_entity(&mut self, layer: &str, color: i32, corners: [Point; 4]) {
        self.write_group(0, "SOLID");
        self.write_group(8, layer);
        self.write_group_int(62, color);
        self.write_point(0, corners[0].x, corners[0].y);
        self.write_point(1, corners[1].x, corners[1].y);
        self.write_point(2, corners[3].x, corners[3].y);
        self.write_point(3, corners[2].x, corners[2].y);
    }

    /// Write a TEXT entity.
    pub fn write_text_entity(&mut self, layer: &str, color: i32, at: Point, height: f64, text: &str) {
        self.write_group(0, "TEXT");
        self.write_group(8, layer);
        self.write_group_int(62, color);
        self.write_point(0, at.x, at.y);
        self.write_group(40, &Self::format_coord(height));
        self.write_group(1, text);
    }
}

/// Maps y-down page coordinates into y-up model space.
#[derive(Debug, Clone, Copy)]
struct PageFrame {
    /// Model-space y of the page's top edge.
    top: f64,
}

impl PageFrame {
    fn map(&self, p: Point) -> Point {
        Point::new(p.x, self.top - p.y)
    }

    fn map_all(&self, polygon: &[Point; 4]) -> [Point; 4] {
        polygon.map(|p| self.map(p))
    }
}

fn write_bar(dxf: &mut DxfWriter, scene: &BarScene, frame: PageFrame, colors: &DxfColors) {
    let bar = scene.bar;
    dxf.write_outline("BAR", colors.bar, &frame.map_all(&bar.corners()));

    if let Some(message) = scene.placeholder {
        let c = bar.center();
        dxf.write_text_entity("TEXT", colors.text, frame.map(Point::new(bar.x + 2.0, c.y)), 3.5, message);
        return;
    }

    if let Some(waste) = &scene.waste {
        dxf.write_solid_entity("WASTE", colors.waste, frame.map_all(&waste.rect.corners()));
    }

    for span in &scene.spans {
        dxf.write_outline("PARTS", colors.parts, &frame.map_all(&span.polygon));
        dxf.write_text_entity("TEXT", colors.text, frame.map(span.label_at), 2.5, &span.label);
    }

    for line in scene.cut_lines.iter().filter(|l| l.sloped) {
        dxf.write_line_entity("SLOPED", colors.sloped, frame.map(line.top), frame.map(line.bottom));
        if let Some(label) = &line.label {
            let at = Point::new(line.top.x, line.top.y - 1.0);
            dxf.write_text_entity("SLOPED", colors.sloped, frame.map(at), 2.0, label);
        }
    }
}

/// Render pages stacked downwards into one DXF drawing, in mm.
pub fn render_dxf(pages: &[Page]) -> String {
    let colors = DxfColors::default();
    let layers = [
        ("PAGE", colors.page),
        ("BAR", colors.bar),
        ("PARTS", colors.parts),
        ("SLOPED", colors.sloped),
        ("WASTE", colors.waste),
        ("TEXT", colors.text),
        ("WARNING", colors.warning),
    ];

    let width = pages.first().map_or(0.0, |p| p.width);
    let total_height = pages.iter().map(|p| p.height).sum::<f64>()
        + PAGE_GAP_MM * pages.len().saturating_sub(1) as f64;

    let mut dxf = DxfWriter::new();
    dxf.write_header((0.0, -total_height), (width, 0.0));
    dxf.write_tables(&layers);
    dxf.begin_entities();

    let mut top = 0.0;
    for page in pages {
        let frame = PageFrame { top };
        let sheet = Rect::new(0.0, 0.0, page.width, page.height);
        dxf.write_outline("PAGE", colors.page, &frame.map_all(&sheet.corners()));

        for row in &page.rows {
            dxf.write_text_entity("TEXT", colors.text, frame.map(row.caption_at), 3.5, &row.caption);
            for (i, warning) in row.scene.warnings.iter().enumerate() {
                let at = Point::new(page.width / 2.0, row.caption_at.y - 4.0 * i as f64);
                dxf.write_text_entity("WARNING", colors.warning, frame.map(at), 2.5, warning);
            }
            write_bar(&mut dxf, &row.scene, frame, &colors);
        }

        top -= page.height + PAGE_GAP_MM;
    }

    dxf.end_entities();
    dxf.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::generator::page::{layout_pages, PrintBar};
    use crate::model::{Part, Pattern, RawAngle};
    use crate::resolve::resolve;

    #[test]
    fn test_format_coord_rounds_half_away() {
        assert_eq!(DxfWriter::format_coord(1.0625), "1.063");
        assert_eq!(DxfWriter::format_coord(-1.0625), "-1.063");
        assert_eq!(DxfWriter::format_coord(12.0), "12.000");
    }

    #[test]
    fn test_line_entity() {
        let mut dxf = DxfWriter::new();
        dxf.write_line_entity("PARTS", 5, Point::new(0.0, 0.0), Point::new(10.0, 2.5));
        let out = dxf.into_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0..4], ["  0", "LINE", "  8", "PARTS"]);
        assert!(out.contains(" 11\n10.000\n 21\n2.500\n"));
    }

    #[test]
    fn test_render_dxf_structure() {
        let part = Part::new("B1", 2500.0).with_angles(None, Some(RawAngle::from(45.0)));
        let layout = resolve(
            &Pattern::new(6000.0)
                .with_part(part.clone())
                .with_part(part)
                .with_waste(1000.0),
            &ResolverConfig::default(),
        );
        let pages = layout_pages(&[PrintBar {
            caption: "IPE200",
            layout: &layout,
        }]);
        let dxf = render_dxf(&pages);

        assert!(dxf.contains("ENTITIES"));
        assert!(dxf.trim_end().ends_with("EOF"));
        assert_eq!(dxf.matches("\nSOLID\n").count(), 1);
        assert!(dxf.contains("\nSLOPED\n"));
        assert!(dxf.contains("\nIPE200\n"));
    }

    #[test]
    fn test_page_frame_flips_y() {
        let frame = PageFrame { top: 0.0 };
        assert_eq!(frame.map(Point::new(3.0, 10.0)), Point::new(3.0, -10.0));
    }
}
