//! Boundary resolution: one cut descriptor per position along the bar.

use std::collections::BTreeMap;

use tracing::debug;

use super::PlacedPart;
use crate::config::{ResolverConfig, POSITION_QUANTUM_MM};
use crate::model::{Boundary, BoundaryKind, CutEnd, Side, Sign};

/// Check whether two touching ends can be produced by one saw cut.
pub fn can_share(a: &CutEnd, b: &CutEnd, config: &ResolverConfig) -> bool {
    match (a, b) {
        (CutEnd::Straight, CutEnd::Straight) => true,
        (CutEnd::Straight, CutEnd::Miter { deviation_deg, .. })
        | (CutEnd::Miter { deviation_deg, .. }, CutEnd::Straight) => {
            *deviation_deg < config.negligible_miter_deg
        }
        (CutEnd::Miter { deviation_deg: da, .. }, CutEnd::Miter { deviation_deg: db, .. }) => {
            (da - db).abs() <= config.match_tolerance_deg
        }
    }
}

/// A part side asking to own the cut at a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutRequest {
    pub side: Side,
    pub deviation_deg: f64,
    pub sign: Sign,
}

impl CutRequest {
    /// Request from a part end; straight ends do not request.
    pub fn from_end(side: Side, cut: &CutEnd) -> Option<Self> {
        match *cut {
            CutEnd::Straight => None,
            CutEnd::Miter { deviation_deg, sign } => Some(Self {
                side,
                deviation_deg,
                sign,
            }),
        }
    }

    /// Lean of the cut line in layout coordinates.
    ///
    /// A positive miter removes material from the top of the part, so the
    /// line leans toward the owning part.
    fn lean(&self) -> Sign {
        match self.side {
            Side::Left => self.sign.reversed(),
            Side::Right => self.sign,
        }
    }

    fn into_kind(self) -> BoundaryKind {
        BoundaryKind::Sloped {
            deviation_deg: self.deviation_deg,
            owner: self.side,
            lean: self.lean(),
        }
    }
}

/// Resolve zero, one or two requests into one boundary kind.
pub fn resolve_requests(
    left: Option<CutRequest>,
    right: Option<CutRequest>,
    config: &ResolverConfig,
) -> BoundaryKind {
    match (left, right) {
        (None, None) => BoundaryKind::Straight,
        (Some(only), None) | (None, Some(only)) => only.into_kind(),
        (Some(l), Some(r)) => {
            if (l.deviation_deg - r.deviation_deg).abs() <= config.match_tolerance_deg {
                l.into_kind()
            } else if r.deviation_deg > l.deviation_deg {
                r.into_kind()
            } else {
                l.into_kind()
            }
        }
    }
}

/// Resolve the bar-start, internal and bar-end boundaries of oriented parts.
///
/// `edges` holds `parts.len() + 1` fractions of stock length.
pub fn resolve_boundaries(
    parts: &[PlacedPart],
    edges: &[f64],
    stock_length_mm: f64,
    config: &ResolverConfig,
) -> Vec<Boundary> {
    (0..=parts.len())
        .map(|pos| {
            let left = pos.checked_sub(1).map(|i| parts[i].geometry.right().cut);
            let right = parts.get(pos).map(|p| p.geometry.left().cut);

            let kind = resolve_requests(
                left.and_then(|c| CutRequest::from_end(Side::Left, &c)),
                right.and_then(|c| CutRequest::from_end(Side::Right, &c)),
                config,
            );
            let shared = match (left, right) {
                (Some(l), Some(r)) => can_share(&l, &r, config),
                _ => false,
            };

            let fraction = edges.get(pos).copied().unwrap_or(0.0);
            debug!(position = pos, ?kind, shared, "boundary resolved");
            Boundary {
                position_mm: fraction * stock_length_mm,
                fraction,
                kind,
                shared,
            }
        })
        .collect()
}

fn position_key(position_mm: f64) -> i64 {
    (position_mm / POSITION_QUANTUM_MM).round() as i64
}

/// Merge boundaries that fall on the same position.
///
/// A sloped resolution wins over a straight one; otherwise the first one
/// computed is kept. Returns the sorted unique boundaries and, for each input
/// boundary, its index in that list.
pub fn dedup_boundaries(raw: &[Boundary]) -> (Vec<Boundary>, Vec<usize>) {
    let mut by_position: BTreeMap<i64, Boundary> = BTreeMap::new();
    for boundary in raw {
        by_position
            .entry(position_key(boundary.position_mm))
            .and_modify(|existing| {
                if !existing.kind.is_sloped() && boundary.kind.is_sloped() {
                    *existing = *boundary;
                }
            })
            .or_insert(*boundary);
    }

    let keys: Vec<i64> = by_position.keys().copied().collect();
    let index_map = raw
        .iter()
        .map(|b| {
            keys.binary_search(&position_key(b.position_mm))
                .unwrap_or_default()
        })
        .collect();

    (by_position.into_values().collect(), index_map)
}
