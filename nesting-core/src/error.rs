//! Error types for loading and exporting nesting reports.
//!
//! The resolution pipeline itself never fails; it degrades to markers and
//! warnings on the `Layout`. These errors cover the surrounding shell.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for report processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// No patterns in the report (-11)
    NoPatterns = -11,
    /// Invalid resolver threshold (E100)
    InvalidConfig = 100,
    /// Export failed (E300)
    ExportFailed = 300,
}

/// Main error type for the nesting report.
#[derive(Debug, Error)]
pub enum NestingError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unrecognised report layout: expected a response object, a pattern list or a single pattern")]
    UnrecognisedLayout,

    #[error("No cutting patterns found in report")]
    NoPatterns,

    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        expected: String,
        value: String,
    },

    #[error("Export failed: {message}")]
    ExportFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NestingError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            NestingError::FileNotFound { .. } => ErrorCode::FileNotFound,
            NestingError::EmptyFile { .. } => ErrorCode::EmptyFile,
            NestingError::ParseError { .. } => ErrorCode::ParseError,
            NestingError::UnrecognisedLayout => ErrorCode::ParseError,
            NestingError::NoPatterns => ErrorCode::NoPatterns,
            NestingError::InvalidValue { .. } => ErrorCode::InvalidConfig,
            NestingError::ExportFailed { .. } => ErrorCode::ExportFailed,
            NestingError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

impl From<serde_json::Error> for NestingError {
    fn from(err: serde_json::Error) -> Self {
        NestingError::ParseError {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, NestingError>;
