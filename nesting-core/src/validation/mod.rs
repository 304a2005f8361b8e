//! Report validation module.

mod validate;

pub use validate::{quick_validate, validate_pattern, validate_patterns, ValidationResult};
