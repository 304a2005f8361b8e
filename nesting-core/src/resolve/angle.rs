//! Raw angle parsing and convention normalization.

use crate::config::{
    float_cmp, ResolverConfig, ABSOLUTE_CONVENTION_MAX_DEG, ABSOLUTE_CONVENTION_MIN_DEG,
    ABSOLUTE_STRAIGHT_DEG,
};
use crate::model::{CutEnd, RawAngle, Sign};

/// Which convention a raw angle was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleConvention {
    /// 90° means straight.
    Absolute,
    /// 0° means straight.
    Deviation,
}

/// A parsed raw angle reduced to deviation from straight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedAngle {
    pub raw_deg: f64,
    pub convention: AngleConvention,
    /// Angular distance from straight, always >= 0.
    pub deviation_deg: f64,
    pub sign: Sign,
    /// Deviation is below the near-straight threshold.
    pub near_straight: bool,
}

impl NormalizedAngle {
    /// End cut implied by the angle alone.
    pub fn to_cut_end(&self) -> CutEnd {
        if self.near_straight {
            CutEnd::Straight
        } else {
            CutEnd::miter(self.deviation_deg, self.sign)
        }
    }
}

/// Extract degrees from a raw value.
///
/// Returns `None` for malformed values, non-finite numbers and text
/// without a number in it.
pub fn parse_raw_angle(raw: &RawAngle) -> Option<f64> {
    let value = match raw {
        RawAngle::Number(n) => Some(*n),
        RawAngle::Text(text) => parse_angle_text(text),
        RawAngle::Malformed(_) => None,
    };
    value.filter(|v| v.is_finite())
}

/// Characters read as a minus sign: ASCII hyphen, U+2212 minus, U+2013 en dash.
const MINUS_SIGNS: [char; 3] = ['-', '\u{2212}', '\u{2013}'];

/// Find the first signed decimal number in a string.
///
/// Accepts labels and units around the number, e.g. `"Start: +8.7°"`.
/// Digits glued to a word (the `2` in `"P2 end: 45°"`) are not numbers.
pub fn parse_angle_text(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    for start in 0..len {
        if start > 0 && chars[start - 1].is_alphanumeric() {
            continue;
        }

        let mut j = start;
        let negative = MINUS_SIGNS.contains(&chars[j]);
        if negative || chars[j] == '+' {
            j += 1;
        }

        let int_start = j;
        while j < len && chars[j].is_ascii_digit() {
            j += 1;
        }
        let mut has_digits = j > int_start;

        if j < len && chars[j] == '.' {
            let frac_start = j + 1;
            let mut k = frac_start;
            while k < len && chars[k].is_ascii_digit() {
                k += 1;
            }
            if k > frac_start {
                has_digits = true;
                j = k;
            }
        }

        if has_digits {
            let digits: String = chars[int_start..j].iter().collect();
            let value: f64 = digits.parse().ok()?;
            return Some(if negative { -value } else { value });
        }
    }

    None
}

/// Reduce a raw angle to deviation from straight.
///
/// `|angle|` in [60°, 120°] is read as the absolute convention, anything
/// else as a deviation.
pub fn normalize(raw_deg: f64, config: &ResolverConfig) -> NormalizedAngle {
    let magnitude = raw_deg.abs();
    let (convention, deviation_deg) = if float_cmp::in_range(
        magnitude,
        ABSOLUTE_CONVENTION_MIN_DEG,
        ABSOLUTE_CONVENTION_MAX_DEG,
    ) {
        (
            AngleConvention::Absolute,
            (magnitude - ABSOLUTE_STRAIGHT_DEG).abs(),
        )
    } else {
        (AngleConvention::Deviation, magnitude)
    };

    NormalizedAngle {
        raw_deg,
        convention,
        deviation_deg,
        sign: Sign::of(raw_deg),
        near_straight: deviation_deg < config.near_straight_deg,
    }
}

/// Parse and normalize an optional raw angle in one step.
pub fn normalize_raw(raw: Option<&RawAngle>, config: &ResolverConfig) -> Option<NormalizedAngle> {
    raw.and_then(parse_raw_angle).map(|deg| normalize(deg, config))
}
