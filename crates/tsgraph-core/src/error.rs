// File: crates/tsgraph-core/src/error.rs
// Summary: Error type shared by every render stage.

use thiserror::Error;

/// Failures that abort a render. Degenerate numeric input is not an error;
/// it surfaces as a "no grid" signal and a placeholder in the image.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("failed to reserve {columns} columns for per-pixel data")]
    Alloc { columns: usize },

    #[error("unknown control code '\\{code}' in legend of element {element}")]
    UnknownControlCode { element: usize, code: char },

    #[error("bad format '{format}': {reason}")]
    BadFormat { format: String, reason: String },

    #[error("bad duration format '{format}': {reason}")]
    DurationFormat { format: String, reason: String },

    #[error("element {element} references a source without data")]
    MissingSource { element: usize },

    #[error("print element {element} produced an empty string")]
    EmptyFormat { element: usize },

    #[error("backend: {0}")]
    Backend(String),
}

impl GraphError {
    pub(crate) fn bad_format(format: &str, reason: impl Into<String>) -> Self {
        Self::BadFormat { format: format.to_string(), reason: reason.into() }
    }

    pub(crate) fn duration(format: &str, reason: impl Into<String>) -> Self {
        Self::DurationFormat { format: format.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
