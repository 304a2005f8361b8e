//! Same-name parts share one end geometry.

use std::collections::HashMap;

use super::PlacedPart;
use crate::model::{EndCut, PartName};

/// Force every repeated non-complementary part onto the first occurrence's cuts.
///
/// Parts are scanned in layout order. Complementary-pair parts are neither a
/// source of canonical geometry nor overwritten.
pub fn canonicalize(parts: &[PlacedPart]) -> Vec<PlacedPart> {
    let mut canonical: HashMap<&PartName, (EndCut, EndCut)> = HashMap::new();
    for part in parts.iter().filter(|p| !p.complementary) {
        canonical
            .entry(&part.name)
            .or_insert((part.geometry.start, part.geometry.end));
    }

    parts
        .iter()
        .map(|part| {
            let mut resolved = part.clone();
            if !part.complementary {
                if let Some(&(start, end)) = canonical.get(&part.name) {
                    resolved.geometry.start = start;
                    resolved.geometry.end = end;
                }
            }
            resolved
        })
        .collect()
}
