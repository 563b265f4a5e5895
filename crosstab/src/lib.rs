//! # Crosstab - split wide time × metric tables into per-entity files
//!
//! Takes a table whose columns cross a time dimension with one or more
//! metrics (`"1990 Red"`, `"1990 Blue"`, `"1991 Red"`, ...) and writes one
//! long-format CSV per main-dimension key, indexed by time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Reshape   │────▶│ <key>.csv   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (time×metric│     │  per entity │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crosstab::{split_file, SplitOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = split_file(&SplitOptions::new("data.csv", "output")).await.unwrap();
//!     println!("Wrote {} files", report.files.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (HeaderLayout, ReshapeResult, OrderedMap)
//! - [`parser`] - CSV reading/writing with auto-detection
//! - [`transform`] - Header decomposition, reshape, output view, pipeline
//! - [`logs`] - Pipeline log sink

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, PipelineError, ReshapeError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell,
    HeaderLayout,
    MetricKey,
    OrderedMap,
    ReshapeResult,
    ReshapedEntry,
    TimeKey,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    encode_table,
    parse_bytes_auto,
    parse_table,
    ParseResult,
};

// =============================================================================
// Re-exports - Reshape
// =============================================================================

pub use transform::{
    decompose_headers,
    reshape,
    reshape_with,
    to_tables,
    KeyTable,
    MissingColumnPolicy,
    ReshapeOptions,
    DEFAULT_TIME_LABEL,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    output_file_name,
    split_bytes,
    split_file,
    write_outputs,
    SplitOptions,
    SplitReport,
};
