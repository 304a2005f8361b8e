//! Print surface: fixed A4-landscape pages with several bars each.

use serde::Serialize;

use super::scene::{layout_extent, project, BarScene, Point, Rect};
use crate::config::{
    PAGE_BAR_HEIGHT_MM, PAGE_HEIGHT_MM, PAGE_MARGIN_MM, PAGE_ROW_GAP_MM, PAGE_WIDTH_MM,
};
use crate::model::Layout;

/// A bar to print, with the caption shown above it.
#[derive(Debug, Clone, Copy)]
pub struct PrintBar<'a> {
    pub caption: &'a str,
    pub layout: &'a Layout,
}

/// One bar row on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRow {
    pub caption: String,
    pub caption_at: Point,
    pub scene: BarScene,
}

/// One printed page, in mm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub rows: Vec<PageRow>,
}

/// Number of bar rows that fit on one page.
pub fn rows_per_page() -> usize {
    let usable = PAGE_HEIGHT_MM - 2.0 * PAGE_MARGIN_MM;
    ((usable / (PAGE_ROW_GAP_MM + PAGE_BAR_HEIGHT_MM)).floor() as usize).max(1)
}

fn page_row(bar: &PrintBar<'_>, slot: usize) -> PageRow {
    let top = PAGE_MARGIN_MM + slot as f64 * (PAGE_ROW_GAP_MM + PAGE_BAR_HEIGHT_MM);
    let usable_width = PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
    let rect = Rect::new(
        PAGE_MARGIN_MM,
        top + PAGE_ROW_GAP_MM,
        usable_width / layout_extent(bar.layout),
        PAGE_BAR_HEIGHT_MM,
    );

    PageRow {
        caption: bar.caption.to_string(),
        caption_at: Point::new(PAGE_MARGIN_MM, top + PAGE_ROW_GAP_MM - 3.0),
        scene: project(bar.layout, rect),
    }
}

/// Lay out bars onto as many pages as needed, in order.
pub fn layout_pages(bars: &[PrintBar<'_>]) -> Vec<Page> {
    bars.chunks(rows_per_page())
        .enumerate()
        .map(|(idx, chunk)| Page {
            number: idx + 1,
            width: PAGE_WIDTH_MM,
            height: PAGE_HEIGHT_MM,
            rows: chunk
                .iter()
                .enumerate()
                .map(|(slot, bar)| page_row(bar, slot))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::{Part, Pattern};
    use crate::resolve::resolve;

    fn layout() -> Layout {
        resolve(
            &Pattern::new(6000.0)
                .with_part(Part::new("A", 3000.0))
                .with_waste(3000.0),
            &ResolverConfig::default(),
        )
    }

    #[test]
    fn test_rows_per_page() {
        // (210 - 24) / 26
        assert_eq!(rows_per_page(), 7);
    }

    #[test]
    fn test_pagination() {
        let layout = layout();
        let bars: Vec<PrintBar> = (0..9)
            .map(|_| PrintBar {
                caption: "IPE200 #1",
                layout: &layout,
            })
            .collect();
        let pages = layout_pages(&bars);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 7);
        assert_eq!(pages[1].rows.len(), 2);
        assert_eq!(pages[1].number, 2);
        // rows restart at the top of each page
        assert_eq!(pages[1].rows[0].scene.bar.y, pages[0].rows[0].scene.bar.y);
    }

    #[test]
    fn test_rows_stay_on_page() {
        let layout = layout();
        let bars: Vec<PrintBar> = (0..7)
            .map(|_| PrintBar {
                caption: "bar",
                layout: &layout,
            })
            .collect();
        let page = &layout_pages(&bars)[0];
        let last = &page.rows.last().unwrap().scene.bar;
        assert!(last.bottom() <= PAGE_HEIGHT_MM - PAGE_MARGIN_MM);
        assert!(last.right() <= PAGE_WIDTH_MM - PAGE_MARGIN_MM + 1e-9);
    }

    #[test]
    fn test_no_bars_no_pages() {
        assert!(layout_pages(&[]).is_empty());
    }
}
