//! SVG output for printed pages.

use std::fmt::Write;

use super::page::Page;
use super::scene::{BarScene, Point};

/// Vertical gap between stacked pages, in mm.
const PAGE_GAP_MM: f64 = 10.0;

const PART_FILL: &str = "#d6e4f0";
const COMPLEMENTARY_FILL: &str = "#f3e3c3";
const WASTE_FILL: &str = "#e4e4e4";
const OUTLINE: &str = "#37474f";
const SLOPED_CUT: &str = "#c0392b";
const WARNING_TEXT: &str = "#b71c1c";

/// Escape text for use in SVG content and attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn points(polygon: &[Point]) -> String {
    polygon
        .iter()
        .map(|p| format!("{:.3},{:.3}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_bar(out: &mut String, scene: &BarScene) {
    let bar = scene.bar;
    writeln!(
        out,
        r#"  <rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="none" stroke="{}" stroke-width="0.2" stroke-dasharray="1,1"/>"#,
        bar.x, bar.y, bar.width, bar.height, OUTLINE
    )
    .unwrap();

    if let Some(message) = scene.placeholder {
        let c = bar.center();
        writeln!(
            out,
            r#"  <text x="{:.3}" y="{:.3}" font-size="3.5" text-anchor="middle" fill="{}">{}</text>"#,
            c.x,
            c.y + 1.2,
            OUTLINE,
            escape_xml(message)
        )
        .unwrap();
        return;
    }

    for span in &scene.spans {
        let fill = if span.complementary {
            COMPLEMENTARY_FILL
        } else {
            PART_FILL
        };
        writeln!(
            out,
            r#"  <polygon points="{}" fill="{}" stroke="{}" stroke-width="0.25"/>"#,
            points(&span.polygon),
            fill,
            OUTLINE
        )
        .unwrap();
        writeln!(
            out,
            r#"  <text x="{:.3}" y="{:.3}" font-size="2.8" text-anchor="middle">{}</text>"#,
            span.label_at.x,
            span.label_at.y + 1.0,
            escape_xml(&span.label)
        )
        .unwrap();
    }

    if let Some(waste) = &scene.waste {
        let r = waste.rect;
        writeln!(
            out,
            r#"  <rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}" stroke="{}" stroke-width="0.25"/>"#,
            r.x, r.y, r.width, r.height, WASTE_FILL, OUTLINE
        )
        .unwrap();
        let c = r.center();
        writeln!(
            out,
            r#"  <text x="{:.3}" y="{:.3}" font-size="2.5" text-anchor="middle" fill="{}">{}</text>"#,
            c.x,
            c.y + 0.9,
            OUTLINE,
            escape_xml(&waste.label)
        )
        .unwrap();
    }

    for line in scene.cut_lines.iter().filter(|l| l.sloped) {
        let dash = if line.shared { "" } else { r#" stroke-dasharray="0.8,0.6""# };
        writeln!(
            out,
            r#"  <line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}" stroke-width="0.35"{}/>"#,
            line.top.x, line.top.y, line.bottom.x, line.bottom.y, SLOPED_CUT, dash
        )
        .unwrap();
        if let Some(label) = &line.label {
            writeln!(
                out,
                r#"  <text x="{:.3}" y="{:.3}" font-size="2.2" text-anchor="middle" fill="{}">{}</text>"#,
                line.top.x,
                line.top.y - 0.8,
                SLOPED_CUT,
                escape_xml(label)
            )
            .unwrap();
        }
    }
}

fn write_page(out: &mut String, page: &Page, offset_y: f64) {
    writeln!(
        out,
        r#" <g id="page-{}" transform="translate(0,{:.3})">"#,
        page.number, offset_y
    )
    .unwrap();
    writeln!(
        out,
        r#"  <rect x="0" y="0" width="{:.3}" height="{:.3}" fill="white" stroke="{}" stroke-width="0.3"/>"#,
        page.width, page.height, OUTLINE
    )
    .unwrap();

    for row in &page.rows {
        writeln!(
            out,
            r#"  <text x="{:.3}" y="{:.3}" font-size="3.5" font-weight="bold">{}</text>"#,
            row.caption_at.x,
            row.caption_at.y,
            escape_xml(&row.caption)
        )
        .unwrap();
        if !row.scene.warnings.is_empty() {
            writeln!(
                out,
                r#"  <text x="{:.3}" y="{:.3}" font-size="2.8" text-anchor="end" fill="{}">{}</text>"#,
                page.width - row.caption_at.x,
                row.caption_at.y,
                WARNING_TEXT,
                escape_xml(&row.scene.warnings.join("; "))
            )
            .unwrap();
        }
        write_bar(out, &row.scene);
    }

    writeln!(out, " </g>").unwrap();
}

/// Render pages stacked top to bottom into one SVG document, in mm.
pub fn render_svg(pages: &[Page]) -> String {
    let width = pages.first().map_or(0.0, |p| p.width);
    let height = pages
        .iter()
        .map(|p| p.height)
        .sum::<f64>()
        + PAGE_GAP_MM * pages.len().saturating_sub(1) as f64;

    let mut out = String::new();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.3}mm" height="{h:.3}mm" viewBox="0 0 {w:.3} {h:.3}" font-family="sans-serif">"#,
        w = width,
        h = height
    )
    .unwrap();

    let mut offset_y = 0.0;
    for page in pages {
        write_page(&mut out, page, offset_y);
        offset_y += page.height + PAGE_GAP_MM;
    }

    out.push_str("</svg>\n");
    out
}
