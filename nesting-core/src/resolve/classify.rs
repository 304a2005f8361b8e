//! Straight/miter classification of part ends.

use tracing::debug;

use super::angle::{normalize_raw, NormalizedAngle};
use crate::config::ResolverConfig;
use crate::model::{CutEnd, EndCut, Part, PartGeometry};

/// Classified ends of one part, plus any problem found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub geometry: PartGeometry,
    /// Set when the part fell back to defaults or ignored inconsistent data.
    pub diagnostic: Option<String>,
}

/// Classify both ends of a part.
///
/// Explicit slope flags decide straight/miter where present; angles still
/// supply the measured deviation. Without any flags both ends come from the
/// angles and the two-sided correction is applied.
pub fn classify_part(part: &Part, config: &ResolverConfig) -> Classification {
    let mut notes: Vec<String> = Vec::new();
    let geometry = classify_ends(part, config, &mut notes);

    if part.has_malformed_identity() {
        notes.push("malformed part identity, using synthetic name".to_string());
    }
    for field in part.unusable_scalar_fields() {
        notes.push(match field {
            "length" => "unusable length, drawn zero-width".to_string(),
            other => format!("unusable {} field, treated as false", other),
        });
    }

    Classification {
        geometry,
        diagnostic: if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        },
    }
}

fn classify_ends(part: &Part, config: &ResolverConfig, notes: &mut Vec<String>) -> PartGeometry {
    if let Some(field) = part.malformed_field() {
        notes.push(format!("malformed {} field, both ends drawn straight", field));
        return PartGeometry::straight();
    }

    let start_angle = normalize_raw(part.start_angle.as_ref(), config);
    let end_angle = normalize_raw(part.end_angle.as_ref(), config);

    match part.slope_flags() {
        Some(flags) => PartGeometry::new(
            classify_flagged(flags.start_has_slope, start_angle, "start", notes),
            classify_flagged(flags.end_has_slope, end_angle, "end", notes),
        ),
        None => {
            let mut start = from_angle(start_angle);
            let mut end = from_angle(end_angle);
            apply_two_sided_correction(&mut start, &mut end, config);
            PartGeometry::new(start, end)
        }
    }
}

/// End cut from the angle alone.
fn from_angle(angle: Option<NormalizedAngle>) -> EndCut {
    match angle {
        Some(a) => EndCut::new(a.to_cut_end(), Some(a.deviation_deg)),
        None => EndCut::STRAIGHT,
    }
}

/// End cut where an explicit flag may override the angle.
fn classify_flagged(
    flag: Option<bool>,
    angle: Option<NormalizedAngle>,
    end_name: &str,
    notes: &mut Vec<String>,
) -> EndCut {
    match (flag, angle) {
        (Some(true), Some(a)) => EndCut::new(
            CutEnd::miter(a.deviation_deg, a.sign),
            Some(a.deviation_deg),
        ),
        (Some(true), None) => {
            notes.push(format!(
                "{} flagged as sloped without a usable angle, drawn straight",
                end_name
            ));
            EndCut::STRAIGHT
        }
        (Some(false), a) => EndCut::new(CutEnd::Straight, a.map(|a| a.deviation_deg)),
        (None, a) => from_angle(a),
    }
}

/// Square off the smaller of two miters when it is visually negligible
/// and the other one is not.
pub fn apply_two_sided_correction(start: &mut EndCut, end: &mut EndCut, config: &ResolverConfig) {
    let (CutEnd::Miter { deviation_deg: s, .. }, CutEnd::Miter { deviation_deg: e, .. }) =
        (start.cut, end.cut)
    else {
        return;
    };

    let threshold = config.two_sided_min_deg;
    if s < threshold && e >= threshold {
        debug!(start = s, end = e, "two-sided correction: start squared");
        start.cut = CutEnd::Straight;
    } else if e < threshold && s >= threshold {
        debug!(start = s, end = e, "two-sided correction: end squared");
        end.cut = CutEnd::Straight;
    }
}
