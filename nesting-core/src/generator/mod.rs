//! Renderer adapters over a resolved layout.
//!
//! [`scene`] is the one projection both surfaces share; [`screen`] fits it
//! into an interactive canvas and [`page`] onto printed pages, which
//! [`svg`] and [`dxf`] serialize.

pub mod dxf;
pub mod page;
pub mod scene;
pub mod screen;
pub mod svg;

pub use dxf::render_dxf;
pub use page::{layout_pages, Page, PageRow, PrintBar};
pub use scene::{project, BarScene, CutLine, Point, Rect, SpanShape, WasteShape};
pub use screen::{screen_scene, SCREEN_PADDING};
pub use svg::render_svg;
