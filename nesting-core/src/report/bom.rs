//! Bill of materials and per-bar summaries.
//!
//! Both are derived from the patterns directly; they do not depend on the
//! resolved layout.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ResolverConfig;
use crate::model::{EndCut, Pattern};
use crate::resolve::classify::classify_part;

/// One aggregated line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomRow {
    pub profile: String,
    pub name: String,
    pub quantity: usize,
    /// Length of one piece in mm.
    pub length_mm: f64,
    /// Sum of all piece lengths in mm.
    pub total_length_mm: f64,
    /// Measured start deviation from straight, when the data carried one.
    pub start_deg: Option<f64>,
    /// Measured end deviation from straight, when the data carried one.
    pub end_deg: Option<f64>,
}

/// Summary of one stock bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSummary {
    /// 1-based pattern number.
    pub pattern: usize,
    pub profile: String,
    pub stock_length_mm: Option<f64>,
    pub part_count: usize,
    pub used_length_mm: f64,
    pub waste_mm: f64,
    /// Used length as a percentage of stock length.
    pub utilization_pct: f64,
}

const UNKNOWN_PROFILE: &str = "unknown";

fn measured(end: &EndCut) -> Option<f64> {
    end.measured_deviation_deg
}

/// Aggregate parts by profile and display name.
///
/// Rows are sorted by profile, then name. Length and angles come from the
/// first piece seen for a name.
pub fn bill_of_materials(patterns: &[Pattern], config: &ResolverConfig) -> Vec<BomRow> {
    let mut rows: BTreeMap<(String, String), BomRow> = BTreeMap::new();

    for pattern in patterns {
        let profile = pattern
            .profile_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PROFILE.to_string());

        for (idx, part) in pattern.parts.iter().enumerate() {
            let name = part.display_name(idx).to_string();
            let length = part.length_mm().max(0.0);
            rows.entry((profile.clone(), name.clone()))
                .and_modify(|row| {
                    row.quantity += 1;
                    row.total_length_mm += length;
                })
                .or_insert_with(|| {
                    let geometry = classify_part(part, config).geometry;
                    BomRow {
                        profile: profile.clone(),
                        name,
                        quantity: 1,
                        length_mm: length,
                        total_length_mm: length,
                        start_deg: measured(&geometry.start),
                        end_deg: measured(&geometry.end),
                    }
                });
        }
    }

    rows.into_values().collect()
}

/// Per-pattern usage summary.
pub fn pattern_summaries(patterns: &[Pattern]) -> Vec<PatternSummary> {
    patterns
        .iter()
        .enumerate()
        .map(|(idx, pattern)| PatternSummary {
            pattern: idx + 1,
            profile: pattern
                .profile_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PROFILE.to_string()),
            stock_length_mm: pattern.stock_length_mm(),
            part_count: pattern.parts.len(),
            used_length_mm: pattern.total_part_length(),
            waste_mm: pattern.waste_mm().unwrap_or(0.0),
            utilization_pct: pattern.utilization() * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Part, RawAngle};
    use pretty_assertions::assert_eq;

    fn patterns() -> Vec<Pattern> {
        vec![
            Pattern::new(6000.0)
                .with_profile("IPE200")
                .with_part(Part::new("B1", 2500.0).with_angles(None, Some(RawAngle::from(45.0))))
                .with_part(Part::new("B1", 2500.0).with_angles(None, Some(RawAngle::from(45.0))))
                .with_waste(1000.0),
            Pattern::new(12000.0)
                .with_profile("IPE200")
                .with_part(Part::new("B1", 2500.0))
                .with_part(Part::new("A7", 9000.0).with_angles(Some(RawAngle::from("92.5")), None))
                .with_waste(500.0),
        ]
    }

    // ==================== bom tests ====================

    #[test]
    fn test_bom_aggregates_by_name() {
        let rows = bill_of_materials(&patterns(), &ResolverConfig::default());
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].name, "A7");
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[0].start_deg, Some(2.5));

        assert_eq!(rows[1].name, "B1");
        assert_eq!(rows[1].quantity, 3);
        assert_eq!(rows[1].total_length_mm, 7500.0);
        assert_eq!(rows[1].start_deg, None);
        assert_eq!(rows[1].end_deg, Some(45.0));
    }

    #[test]
    fn test_bom_unknown_profile() {
        let rows = bill_of_materials(
            &[Pattern::new(1000.0).with_part(Part::new("X", 400.0))],
            &ResolverConfig::default(),
        );
        assert_eq!(rows[0].profile, "unknown");
    }

    // ==================== summary tests ====================

    #[test]
    fn test_pattern_summaries() {
        let summaries = pattern_summaries(&patterns());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].pattern, 1);
        assert_eq!(summaries[0].part_count, 2);
        assert_eq!(summaries[0].used_length_mm, 5000.0);
        assert!((summaries[0].utilization_pct - 83.333_333).abs() < 1e-3);
        assert_eq!(summaries[1].waste_mm, 500.0);
    }
}
