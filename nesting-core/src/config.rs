//! Configuration constants and settings for pattern resolution.

use serde::{Deserialize, Serialize};

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Tolerance in mm for comparing the optimizer's own length arithmetic.
pub const LENGTH_TOLERANCE_MM: f64 = 0.01;

/// Lower bound of the absolute angle convention (90° = straight).
pub const ABSOLUTE_CONVENTION_MIN_DEG: f64 = 60.0;

/// Upper bound of the absolute angle convention (90° = straight).
pub const ABSOLUTE_CONVENTION_MAX_DEG: f64 = 120.0;

/// Straight reference angle in the absolute convention.
pub const ABSOLUTE_STRAIGHT_DEG: f64 = 90.0;

/// Deviation below which an end is snapped to straight.
pub const DEFAULT_NEAR_STRAIGHT_DEG: f64 = 0.5;

/// Deviation below which a miter may share a boundary with a straight end.
pub const DEFAULT_NEGLIGIBLE_MITER_DEG: f64 = 1.0;

/// Maximum deviation difference for two miters to form one saw cut.
pub const DEFAULT_MATCH_TOLERANCE_DEG: f64 = 2.0;

/// Smaller-end deviation below which a double miter is corrected to square-then-angled.
pub const DEFAULT_TWO_SIDED_MIN_DEG: f64 = 2.0;

/// Deviation below which an end of the first part counts as "nearly straight" for anchoring.
pub const DEFAULT_ANCHOR_STRAIGHT_DEG: f64 = 5.0;

/// Boundary positions are de-duplicated on this grid (mm).
pub const POSITION_QUANTUM_MM: f64 = 0.001;

/// Largest drawn slant, as a fraction of bar height (tan 60°).
pub const MAX_SLANT_RATIO: f64 = 1.732;

/// A4 landscape page width in mm.
pub const PAGE_WIDTH_MM: f64 = 297.0;

/// A4 landscape page height in mm.
pub const PAGE_HEIGHT_MM: f64 = 210.0;

/// Page margin in mm.
pub const PAGE_MARGIN_MM: f64 = 12.0;

/// Height of one bar row on a printed page in mm.
pub const PAGE_BAR_HEIGHT_MM: f64 = 14.0;

/// Vertical gap reserved for the caption above each bar on a printed page in mm.
pub const PAGE_ROW_GAP_MM: f64 = 12.0;

/// Thresholds used by the resolution pipeline.
///
/// Every field is a named, independently configurable threshold. The source
/// data historically used several different "near-straight" values for what
/// is logically the same decision, so none of them is hard-wired into the
/// pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deviations below this are classified straight (AngleNormalizer).
    pub near_straight_deg: f64,
    /// A miter below this may share a boundary with a straight end.
    pub negligible_miter_deg: f64,
    /// Two miters within this difference form one saw cut.
    pub match_tolerance_deg: f64,
    /// Two-sided sanity correction threshold.
    pub two_sided_min_deg: f64,
    /// Anchor pass threshold for the first part on the bar.
    pub anchor_straight_deg: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            near_straight_deg: DEFAULT_NEAR_STRAIGHT_DEG,
            negligible_miter_deg: DEFAULT_NEGLIGIBLE_MITER_DEG,
            match_tolerance_deg: DEFAULT_MATCH_TOLERANCE_DEG,
            two_sided_min_deg: DEFAULT_TWO_SIDED_MIN_DEG,
            anchor_straight_deg: DEFAULT_ANCHOR_STRAIGHT_DEG,
        }
    }
}

impl ResolverConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the near-straight threshold.
    pub fn with_near_straight(mut self, deg: f64) -> Self {
        self.near_straight_deg = deg;
        self
    }

    /// Sets the negligible-miter threshold.
    pub fn with_negligible_miter(mut self, deg: f64) -> Self {
        self.negligible_miter_deg = deg;
        self
    }

    /// Sets the boundary match tolerance.
    pub fn with_match_tolerance(mut self, deg: f64) -> Self {
        self.match_tolerance_deg = deg;
        self
    }

    /// Sets the two-sided correction threshold.
    pub fn with_two_sided_min(mut self, deg: f64) -> Self {
        self.two_sided_min_deg = deg;
        self
    }

    /// Sets the anchor threshold.
    pub fn with_anchor_straight(mut self, deg: f64) -> Self {
        self.anchor_straight_deg = deg;
        self
    }

    /// Check that every threshold is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        [
            self.near_straight_deg,
            self.negligible_miter_deg,
            self.match_tolerance_deg,
            self.two_sided_min_deg,
            self.anchor_straight_deg,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }

    /// Check if a is in range [min, max] with epsilon tolerance.
    #[inline]
    pub fn in_range(a: f64, min: f64, max: f64) -> bool {
        a >= min - EPS && a <= max + EPS
    }
}

/// Utility functions for angle operations.
pub mod angle {
    use super::MAX_SLANT_RATIO;

    /// Horizontal run of a cut line per unit of bar height.
    ///
    /// Clamped so that near-parallel cuts stay drawable.
    #[inline]
    pub fn slant_ratio(deviation_deg: f64) -> f64 {
        deviation_deg.to_radians().tan().abs().min(MAX_SLANT_RATIO)
    }
}
