//! Sanity checks on optimizer output.
//!
//! Validation only reports; the resolver degrades gracefully on its own.

use crate::config::LENGTH_TOLERANCE_MM;
use crate::error::{NestingError, Result};
use crate::model::Pattern;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate all patterns of a report.
pub fn validate_patterns(patterns: &[Pattern]) -> Result<ValidationResult> {
    if patterns.is_empty() {
        return Err(NestingError::NoPatterns);
    }

    let mut result = ValidationResult::ok();
    for (idx, pattern) in patterns.iter().enumerate() {
        result.merge(validate_pattern(pattern, idx + 1));
    }
    Ok(result)
}

/// Validate a single pattern.
pub fn validate_pattern(pattern: &Pattern, pattern_num: usize) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let Some(stock) = pattern.valid_stock_length() else {
        result.add_error(format!(
            "Pattern {}: Invalid stock length ({})",
            pattern_num,
            pattern
                .stock_length
                .as_ref()
                .map_or_else(|| "missing".to_string(), |s| s.to_string())
        ));
        return result;
    };

    if pattern.parts.is_empty() {
        result.add_warning(format!("Pattern {}: No parts", pattern_num));
    }

    for (part_idx, part) in pattern.parts.iter().enumerate() {
        match part.length.value() {
            Some(length) if length >= 0.0 => {
                if length > stock + LENGTH_TOLERANCE_MM {
                    result.add_error(format!(
                        "Pattern {}, Part {}: Length {} exceeds stock length {}",
                        pattern_num,
                        part_idx + 1,
                        length,
                        stock
                    ));
                }
            }
            _ => result.add_error(format!(
                "Pattern {}, Part {}: Invalid length ({})",
                pattern_num,
                part_idx + 1,
                part.length
            )),
        }

        let named = part.info().is_some_and(|info| {
            [&info.reference, &info.element_name]
                .iter()
                .any(|s| s.as_deref().is_some_and(|s| !s.trim().is_empty()))
        });
        if !named {
            result.add_warning(format!(
                "Pattern {}, Part {}: No reference or element name",
                pattern_num,
                part_idx + 1
            ));
        }

        if let Some(field) = part.malformed_field() {
            result.add_warning(format!(
                "Pattern {}, Part {}: Malformed {} field",
                pattern_num,
                part_idx + 1,
                field
            ));
        }
        if part.is_complementary_pair.value().is_none() {
            result.add_warning(format!(
                "Pattern {}, Part {}: Malformed is_complementary_pair field",
                pattern_num,
                part_idx + 1
            ));
        }
    }

    match pattern.waste_mm() {
        Some(waste) if waste < 0.0 || waste > stock => result.add_warning(format!(
            "Pattern {}: Waste {} is outside the stock bar",
            pattern_num, waste
        )),
        Some(_) => {}
        None => result.add_warning(format!(
            "Pattern {}: Invalid waste ({})",
            pattern_num, pattern.waste
        )),
    }

    if !pattern.parts.is_empty() && !pattern.lengths_balance() {
        result.add_warning(format!(
            "Pattern {}: Parts ({}) plus waste ({}) do not add up to stock length ({})",
            pattern_num,
            pattern.total_part_length(),
            pattern.waste,
            stock
        ));
    }

    result
}

/// Quick validation check for the command-line --validate flag.
pub fn quick_validate(patterns: &[Pattern]) -> Result<()> {
    let result = validate_patterns(patterns)?;

    if !result.passed {
        return Err(NestingError::InvalidValue {
            field: "patterns".to_string(),
            expected: "valid cutting patterns".to_string(),
            value: result.errors.join("; "),
        });
    }

    Ok(())
}
