//! Error types for the crosstab split pipeline.
//!
//! - [`ReshapeError`] - the table cannot be reshaped
//! - [`CsvError`] - CSV reading/decoding errors
//! - [`PipelineError`] - top-level file adapter errors
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! layers.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Reshape Errors
// =============================================================================

/// Errors raised by the reshaper.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReshapeError {
    /// Header row missing or structurally unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An expected `"<time> <metric>"` header does not exist
    /// (only under [`crate::MissingColumnPolicy::Fail`]).
    #[error("Missing column: '{label}'")]
    MissingColumn { label: String },
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading CSV input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode content.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// Delimiter is not a single-byte ASCII character.
    #[error("Delimiter must be an ASCII character, got '{0}'")]
    InvalidDelimiter(char),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::split_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be read or parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Table could not be reshaped.
    #[error("Reshape error: {0}")]
    Reshape(#[from] ReshapeError),

    /// Output could not be created or written.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON dump failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two main-dimension keys map to the same output file.
    #[error("Keys '{first}' and '{second}' both map to output file '{file}'")]
    FileNameCollision {
        first: String,
        second: String,
        file: String,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reshape operations.
pub type ReshapeOutcome<T> = Result<T, ReshapeError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
