//! Secondary report outputs.

mod bom;

pub use bom::{bill_of_materials, pattern_summaries, BomRow, PatternSummary};
