//! Transformation module.
//!
//! - Header: composite label decomposition
//! - Reshape: wide rows to per-key time → metric structures
//! - View: per-key output tables
//! - Pipeline: file in, files out

pub mod header;
pub mod pipeline;
pub mod reshape;
pub mod view;

pub use header::{decompose_headers, parse_time, split_label};
pub use pipeline::*;
pub use reshape::{reshape, reshape_with, MissingColumnPolicy, ReshapeOptions};
pub use view::{to_tables, KeyTable, DEFAULT_TIME_LABEL};
