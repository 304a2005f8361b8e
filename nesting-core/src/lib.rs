//! nesting-core - Cutting-pattern geometry for steel bar nesting reports.
//!
//! This library loads saved bar-nesting optimizer output and resolves each
//! cutting pattern into a renderer-independent [`Layout`]: which part ends are
//! mitered, which touching ends are one saw cut, and which way round each part
//! is drawn. The screen and print renderers only scale that layout.
//!
//! # Example
//!
//! ```no_run
//! use nesting_core::{parse_report_file, resolve, ResolverConfig};
//! use std::path::Path;
//!
//! let report = parse_report_file(Path::new("nesting.json")).unwrap();
//! let config = ResolverConfig::default();
//! for pattern in report.patterns() {
//!     let layout = resolve(&pattern, &config);
//!     println!("{} spans, {} sloped cuts", layout.spans.len(), layout.sloped_count());
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod report;
pub mod resolve;
pub mod validation;

// Re-exports for convenience
pub use config::ResolverConfig;
pub use error::{NestingError, Result};
pub use model::{Boundary, BoundaryKind, CutEnd, Layout, LayoutMarker, Part, PartName, Pattern};
pub use parser::{parse_report_file, parse_report_str, NestingReport};
pub use resolve::{resolve, LayoutCache};
pub use validation::{validate_patterns, ValidationResult};

/// Load a report and resolve every pattern in it.
///
/// Validation problems are logged but do not stop resolution; the resolver
/// degrades on bad data by itself.
pub fn resolve_report_file(
    input_path: &std::path::Path,
    config: &ResolverConfig,
) -> Result<Vec<(Pattern, Layout)>> {
    if !config.is_valid() {
        return Err(NestingError::InvalidValue {
            field: "config".to_string(),
            expected: "finite, non-negative thresholds".to_string(),
            value: format!("{:?}", config),
        });
    }

    let patterns = parse_report_file(input_path)?.patterns();

    let validation = validate_patterns(&patterns)?;
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    for error in &validation.errors {
        tracing::warn!("{}", error);
    }

    Ok(patterns
        .into_iter()
        .map(|pattern| {
            let layout = resolve(&pattern, config);
            (pattern, layout)
        })
        .collect())
}
