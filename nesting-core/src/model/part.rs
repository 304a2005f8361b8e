//! Part definition: one piece cut from a stock bar.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw angle value as delivered by the optimizer.
///
/// Anything that is neither a number nor a string is kept as `Malformed`
/// so that one bad part does not reject the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAngle {
    /// Numeric degrees.
    Number(f64),
    /// Text containing a signed float, e.g. `"Start: +8.7°"`.
    Text(String),
    /// Unusable value (object, array, bool).
    Malformed(Value),
}

impl RawAngle {
    /// Check if the value has an unusable type.
    pub fn is_malformed(&self) -> bool {
        matches!(self, RawAngle::Malformed(_))
    }
}

impl From<f64> for RawAngle {
    fn from(value: f64) -> Self {
        RawAngle::Number(value)
    }
}

impl From<&str> for RawAngle {
    fn from(value: &str) -> Self {
        RawAngle::Text(value.to_string())
    }
}

/// Raw numeric value (length, stock length, waste).
///
/// Numeric strings such as `"2500"` are accepted; anything else is kept so
/// that one bad field does not reject the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Malformed(Value),
}

impl RawNumber {
    /// Finite numeric value, if the raw value has one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(v) => Some(*v),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
            RawNumber::Malformed(_) => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Check if the value can be used as a number.
    pub fn is_usable(&self) -> bool {
        self.value().is_some()
    }
}

impl Default for RawNumber {
    fn default() -> Self {
        RawNumber::Number(0.0)
    }
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawNumber::Number(v) => write!(f, "{}", v),
            RawNumber::Text(s) => write!(f, "{:?}", s),
            RawNumber::Malformed(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

/// Raw boolean flag; `"true"`/`"false"` strings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFlag {
    Flag(bool),
    Text(String),
    Malformed(Value),
}

impl RawFlag {
    /// Boolean value, if the raw value has one.
    pub fn value(&self) -> Option<bool> {
        match self {
            RawFlag::Flag(b) => Some(*b),
            RawFlag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            RawFlag::Malformed(_) => None,
        }
    }
}

impl Default for RawFlag {
    fn default() -> Self {
        RawFlag::Flag(false)
    }
}

impl From<bool> for RawFlag {
    fn from(value: bool) -> Self {
        RawFlag::Flag(value)
    }
}

/// Source element identity of a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartInfo {
    /// Reference code (assembly mark), e.g. "b1".
    #[serde(default)]
    pub reference: Option<String>,
    /// Model element name.
    #[serde(default, alias = "name", alias = "elementName")]
    pub element_name: Option<String>,
    /// Model element id.
    #[serde(default, alias = "expressId")]
    pub express_id: Option<i64>,
}

/// Element identity, or whatever the optimizer sent when it was unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartRef {
    Info(PartInfo),
    Malformed(Value),
}

/// Precomputed per-end slope flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlopeFlags {
    #[serde(default, alias = "startHasSlope")]
    pub start_has_slope: Option<bool>,
    #[serde(default, alias = "endHasSlope")]
    pub end_has_slope: Option<bool>,
}

impl SlopeFlags {
    /// Check if at least one end carries an explicit flag.
    pub fn any(&self) -> bool {
        self.start_has_slope.is_some() || self.end_has_slope.is_some()
    }
}

/// Slope flags, or the unusable value that was sent in their place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlopeInfo {
    Flags(SlopeFlags),
    Malformed(Value),
}

/// Typed display name of a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartName(String);

impl PartName {
    /// Create a name from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Synthetic name for a part without identity (1-based).
    pub fn synthetic(index: usize) -> Self {
        Self(format!("Part {}", index + 1))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single part in a cutting pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Source element identity.
    #[serde(default)]
    pub part: Option<PartRef>,
    /// Part length in mm.
    #[serde(default, deserialize_with = "null_as_default")]
    pub length: RawNumber,
    /// Raw start angle.
    #[serde(default, alias = "startAngle")]
    pub start_angle: Option<RawAngle>,
    /// Raw end angle.
    #[serde(default, alias = "endAngle")]
    pub end_angle: Option<RawAngle>,
    /// Optional precomputed slope flags.
    #[serde(default, alias = "slopeInfo")]
    pub slope_info: Option<SlopeInfo>,
    /// Part of a complementary pair (exempt from canonicalization).
    #[serde(
        default,
        alias = "isComplementaryPair",
        deserialize_with = "null_as_default"
    )]
    pub is_complementary_pair: RawFlag,
}

impl Part {
    /// Create a part with a reference code and length.
    pub fn new(reference: impl Into<String>, length: f64) -> Self {
        Self {
            part: Some(PartRef::Info(PartInfo {
                reference: Some(reference.into()),
                ..Default::default()
            })),
            length: length.into(),
            ..Default::default()
        }
    }

    /// Set raw start and end angles.
    pub fn with_angles(mut self, start: Option<RawAngle>, end: Option<RawAngle>) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Set explicit slope flags.
    pub fn with_slope_flags(mut self, start: Option<bool>, end: Option<bool>) -> Self {
        self.slope_info = Some(SlopeInfo::Flags(SlopeFlags {
            start_has_slope: start,
            end_has_slope: end,
        }));
        self
    }

    /// Mark the part as one half of a complementary pair.
    pub fn complementary(mut self) -> Self {
        self.is_complementary_pair = true.into();
        self
    }

    /// Length in mm; an unusable length counts as zero.
    pub fn length_mm(&self) -> f64 {
        self.length.value().unwrap_or(0.0)
    }

    /// Check if the part belongs to a complementary pair; an unusable flag
    /// counts as false.
    pub fn is_complementary(&self) -> bool {
        self.is_complementary_pair.value().unwrap_or(false)
    }

    /// Element identity, if well-formed.
    pub fn info(&self) -> Option<&PartInfo> {
        match &self.part {
            Some(PartRef::Info(info)) => Some(info),
            _ => None,
        }
    }

    /// Display name with fallback order reference → element name → synthetic.
    ///
    /// `index` is the part's position in the optimizer's list.
    pub fn display_name(&self, index: usize) -> PartName {
        let info = self.info();
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PartName::new)
        };

        info.and_then(|i| non_blank(&i.reference))
            .or_else(|| info.and_then(|i| non_blank(&i.element_name)))
            .unwrap_or_else(|| PartName::synthetic(index))
    }

    /// Explicit slope flags, if well-formed and at least one is set.
    pub fn slope_flags(&self) -> Option<SlopeFlags> {
        match &self.slope_info {
            Some(SlopeInfo::Flags(flags)) if flags.any() => Some(*flags),
            _ => None,
        }
    }

    /// Check if the identity object is present but unusable.
    pub fn has_malformed_identity(&self) -> bool {
        matches!(self.part, Some(PartRef::Malformed(_)))
    }

    /// Describe the first malformed geometry field, if any.
    ///
    /// The identity field is reported separately by [`Part::has_malformed_identity`]
    /// because a bad identity only affects the display name.
    pub fn malformed_field(&self) -> Option<&'static str> {
        if self.start_angle.as_ref().is_some_and(RawAngle::is_malformed) {
            return Some("start_angle");
        }
        if self.end_angle.as_ref().is_some_and(RawAngle::is_malformed) {
            return Some("end_angle");
        }
        if matches!(self.slope_info, Some(SlopeInfo::Malformed(_))) {
            return Some("slope_info");
        }
        None
    }

    /// Scalar fields that were present but unusable.
    ///
    /// These never change the geometry of the ends; the part is still drawn
    /// with the fallback value.
    pub fn unusable_scalar_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !self.length.is_usable() {
            fields.push("length");
        }
        if self.is_complementary_pair.value().is_none() {
            fields.push("is_complementary_pair");
        }
        fields
    }
}

/// Deserialize `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
