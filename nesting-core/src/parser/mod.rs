//! Nesting report loader module.

mod json;

pub use json::{parse_report_file, parse_report_str, NestingReport, ProfileReport};
