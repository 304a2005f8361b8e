//! End cut descriptors derived from raw part metadata.

use serde::{Deserialize, Serialize};

/// Direction of a miter relative to the bar's top face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Non-negative raw angle.
    Positive,
    /// Negative raw angle.
    Negative,
}

impl Sign {
    /// Sign of a raw angle (zero counts as positive).
    pub fn of(value: f64) -> Self {
        if value >= 0.0 || value.is_nan() {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    /// Numeric value, +1.0 or -1.0.
    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }

    /// Opposite sign.
    pub fn reversed(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// Resolved geometry of one part end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CutEnd {
    /// Square cut (90° to the bar axis).
    Straight,
    /// Angled cut.
    Miter {
        /// Angular distance from straight, always >= 0.
        deviation_deg: f64,
        sign: Sign,
    },
}

impl CutEnd {
    /// Create a miter, normalising the deviation to be non-negative.
    pub fn miter(deviation_deg: f64, sign: Sign) -> Self {
        CutEnd::Miter {
            deviation_deg: deviation_deg.abs(),
            sign,
        }
    }

    /// Check if this is a square cut.
    pub fn is_straight(&self) -> bool {
        matches!(self, CutEnd::Straight)
    }

    /// Check if this is an angled cut.
    pub fn is_miter(&self) -> bool {
        matches!(self, CutEnd::Miter { .. })
    }

    /// Deviation from straight (0 for straight cuts).
    pub fn deviation(&self) -> f64 {
        match self {
            CutEnd::Straight => 0.0,
            CutEnd::Miter { deviation_deg, .. } => *deviation_deg,
        }
    }
}

/// A classified end together with the deviation the raw data carried.
///
/// `measured_deviation_deg` is kept even when an explicit flag forced the
/// end to straight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndCut {
    pub cut: CutEnd,
    pub measured_deviation_deg: Option<f64>,
}

impl EndCut {
    /// Square end with no angle data.
    pub const STRAIGHT: EndCut = EndCut {
        cut: CutEnd::Straight,
        measured_deviation_deg: None,
    };

    /// Create an end cut.
    pub fn new(cut: CutEnd, measured_deviation_deg: Option<f64>) -> Self {
        Self {
            cut,
            measured_deviation_deg,
        }
    }

    /// Miter end whose measured deviation equals its resolved deviation.
    pub fn miter(deviation_deg: f64, sign: Sign) -> Self {
        Self::new(CutEnd::miter(deviation_deg, sign), Some(deviation_deg.abs()))
    }
}

impl Default for EndCut {
    fn default() -> Self {
        Self::STRAIGHT
    }
}

/// Start/end cuts of a part plus its drawing orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartGeometry {
    pub start: EndCut,
    pub end: EndCut,
    /// Drawn end-to-end reversed (end faces the bar start).
    pub flipped: bool,
}

impl PartGeometry {
    /// Create an unflipped geometry.
    pub fn new(start: EndCut, end: EndCut) -> Self {
        Self {
            start,
            end,
            flipped: false,
        }
    }

    /// Square at both ends.
    pub fn straight() -> Self {
        Self::default()
    }

    /// End facing the bar start after orientation.
    pub fn left(&self) -> &EndCut {
        if self.flipped {
            &self.end
        } else {
            &self.start
        }
    }

    /// End facing the bar end after orientation.
    pub fn right(&self) -> &EndCut {
        if self.flipped {
            &self.start
        } else {
            &self.end
        }
    }

    /// Same cuts with the opposite orientation.
    pub fn flipped(&self) -> Self {
        Self {
            flipped: !self.flipped,
            ..*self
        }
    }

    /// Check if both ends are square.
    pub fn is_square(&self) -> bool {
        self.start.cut.is_straight() && self.end.cut.is_straight()
    }
}
