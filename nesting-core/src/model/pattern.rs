//! Cutting pattern: the parts assigned to one stock bar.

use serde::{Deserialize, Serialize};

use super::part::{null_as_default, Part, RawNumber};
use crate::config::LENGTH_TOLERANCE_MM;

/// One stock bar and the parts the optimizer assigned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Profile of the stock bar, e.g. "IPE200".
    #[serde(default, alias = "profileName", alias = "profile")]
    pub profile_name: Option<String>,
    /// Stock bar length in mm.
    #[serde(default, alias = "stockLength")]
    pub stock_length: Option<RawNumber>,
    /// Parts in cutting order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
    /// Leftover length in mm.
    #[serde(
        default,
        alias = "waste_length",
        alias = "wasteLength",
        deserialize_with = "null_as_default"
    )]
    pub waste: RawNumber,
}

impl Pattern {
    /// Create a pattern for a stock length.
    pub fn new(stock_length: f64) -> Self {
        Self {
            stock_length: Some(stock_length.into()),
            ..Default::default()
        }
    }

    /// Add a part.
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Set the waste length.
    pub fn with_waste(mut self, waste: f64) -> Self {
        self.waste = waste.into();
        self
    }

    /// Set the profile name.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile_name = Some(profile.into());
        self
    }

    /// Stock length as sent, if it is a finite number.
    pub fn stock_length_mm(&self) -> Option<f64> {
        self.stock_length.as_ref().and_then(RawNumber::value)
    }

    /// Stock length if it is usable (finite and positive).
    pub fn valid_stock_length(&self) -> Option<f64> {
        self.stock_length_mm().filter(|s| *s > 0.0)
    }

    /// Waste length as sent, if it is a finite number.
    pub fn waste_mm(&self) -> Option<f64> {
        self.waste.value()
    }

    /// Part indices in layout order: descending length, stable.
    pub fn layout_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.parts.len()).collect();
        order.sort_by(|&a, &b| self.parts[b].length_mm().total_cmp(&self.parts[a].length_mm()));
        order
    }

    /// Check if any single part is longer than the stock bar.
    pub fn exceeds_stock(&self) -> bool {
        match self.valid_stock_length() {
            Some(stock) => self
                .parts
                .iter()
                .any(|p| p.length_mm() > stock + LENGTH_TOLERANCE_MM),
            None => false,
        }
    }

    /// Sum of all part lengths in mm.
    pub fn total_part_length(&self) -> f64 {
        self.parts.iter().map(Part::length_mm).sum()
    }

    /// Fraction of the stock bar used by parts (0.0 when stock is invalid).
    pub fn utilization(&self) -> f64 {
        match self.valid_stock_length() {
            Some(stock) => self.total_part_length() / stock,
            None => 0.0,
        }
    }

    /// Check if the parts plus waste add up to the stock length.
    pub fn lengths_balance(&self) -> bool {
        match self.valid_stock_length() {
            Some(stock) => match self.waste_mm() {
                Some(waste) => {
                    (self.total_part_length() + waste - stock).abs() <= LENGTH_TOLERANCE_MM
                }
                None => false,
            },
            None => false,
        }
    }
}
