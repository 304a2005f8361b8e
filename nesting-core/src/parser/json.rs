//! Optimizer response loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NestingError, Result};
use crate::model::Pattern;

/// Patterns of one steel profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    #[serde(default, alias = "profileName", alias = "profile")]
    pub profile_name: Option<String>,
    /// Stock lengths the optimizer was allowed to use, in mm.
    #[serde(default, alias = "stockLengths")]
    pub stock_lengths: Vec<f64>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

/// A saved optimizer response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestingReport {
    #[serde(default, alias = "fileId")]
    pub file_id: Option<String>,
    pub profiles: Vec<ProfileReport>,
}

impl NestingReport {
    /// Wrap bare patterns in a report.
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        Self {
            file_id: None,
            profiles: vec![ProfileReport {
                patterns,
                ..Default::default()
            }],
        }
    }

    /// All patterns, in report order, with the owning profile name filled in.
    pub fn patterns(&self) -> Vec<Pattern> {
        self.profiles
            .iter()
            .flat_map(|profile| {
                profile.patterns.iter().map(move |pattern| {
                    let mut pattern = pattern.clone();
                    if pattern.profile_name.is_none() {
                        pattern.profile_name = profile.profile_name.clone();
                    }
                    pattern
                })
            })
            .collect()
    }

    /// Number of patterns across all profiles.
    pub fn pattern_count(&self) -> usize {
        self.profiles.iter().map(|p| p.patterns.len()).sum()
    }
}

/// Keys that mark an object as a single pattern.
const PATTERN_KEYS: &[&str] = &["stock_length", "stockLength", "parts"];

/// Accepted top-level shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentShape {
    Response,
    Patterns,
    Single,
}

impl DocumentShape {
    /// Pick the shape from the top-level value, before any typed decoding.
    fn detect(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.contains_key("profiles") => Some(Self::Response),
            Value::Object(map) if is_pattern_like(map) => Some(Self::Single),
            Value::Array(_) => Some(Self::Patterns),
            _ => None,
        }
    }
}

fn is_pattern_like(map: &Map<String, Value>) -> bool {
    PATTERN_KEYS.iter().any(|key| map.contains_key(*key))
}

/// Parse a report from JSON text.
///
/// The shape is chosen from the top-level keys, so a type error inside a
/// recognised document surfaces as a parse error naming the problem.
pub fn parse_report_str(content: &str) -> Result<NestingReport> {
    let value: Value = serde_json::from_str(content)?;
    let shape = DocumentShape::detect(&value).ok_or(NestingError::UnrecognisedLayout)?;

    let report = match shape {
        DocumentShape::Response => {
            let report: NestingReport = serde_json::from_value(value)?;
            debug!(profiles = report.profiles.len(), "parsed optimizer response");
            report
        }
        DocumentShape::Patterns => {
            let patterns: Vec<Pattern> = serde_json::from_value(value)?;
            debug!(patterns = patterns.len(), "parsed pattern list");
            NestingReport::from_patterns(patterns)
        }
        DocumentShape::Single => {
            let pattern: Pattern = serde_json::from_value(value)?;
            debug!("parsed single pattern");
            NestingReport::from_patterns(vec![pattern])
        }
    };

    if report.pattern_count() == 0 {
        return Err(NestingError::NoPatterns);
    }
    Ok(report)
}

/// Parse a report file.
pub fn parse_report_file(path: &Path) -> Result<NestingReport> {
    use std::fs;

    if !path.exists() {
        return Err(NestingError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(NestingError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    parse_report_str(&content)
}
