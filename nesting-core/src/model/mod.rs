//! Data model for cutting patterns and resolved layouts.

mod cut_end;
mod layout;
mod part;
mod pattern;

pub use cut_end::{CutEnd, EndCut, PartGeometry, Sign};
pub use layout::{
    Boundary, BoundaryKind, Diagnostic, Layout, LayoutMarker, LayoutWarning, PartSpan, Side,
    WasteSpan,
};
pub use part::{
    Part, PartInfo, PartName, PartRef, RawAngle, RawFlag, RawNumber, SlopeFlags, SlopeInfo,
};
pub use pattern::Pattern;
