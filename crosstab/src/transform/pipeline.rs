//! File adapter: CSV file in, one CSV file per main-dimension key out.
//!
//! # Example
//!
//! ```rust,ignore
//! use crosstab::{split_file, SplitOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = split_file(&SplitOptions::new("data.csv", "output")).await?;
//!     println!("Wrote {} files", report.files.len());
//!     Ok(())
//! }
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::reshape::{reshape_with, ReshapeOptions};
use super::view::{to_tables, DEFAULT_TIME_LABEL};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_success_indent, log_warning};
use crate::models::ReshapeResult;
use crate::parser::{encode_table, parse_bytes_auto};

/// Default input file when none is given.
pub const DEFAULT_INPUT: &str = "data.csv";

/// Default output directory when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Characters that cannot appear in an output file name.
static UNSAFE_FILE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("file name pattern is a valid regex")
});

/// Options for a split run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Input CSV file
    pub input: PathBuf,

    /// Directory receiving one CSV per key (created if absent)
    pub output_dir: PathBuf,

    /// Force a delimiter instead of detecting it
    pub delimiter: Option<char>,

    /// Reshape behaviour
    pub reshape: ReshapeOptions,

    /// First header of every output file
    pub time_label: String,

    /// Also write the full reshape result as JSON here
    pub json_dump: Option<PathBuf>,
}

impl SplitOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            delimiter: None,
            reshape: ReshapeOptions::default(),
            time_label: DEFAULT_TIME_LABEL.to_string(),
            json_dump: None,
        }
    }
}

/// Summary of a split run
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    /// Written files, in key order
    pub files: Vec<PathBuf>,
    pub keys: usize,
    pub times: usize,
    pub metrics: usize,
    pub encoding: String,
    pub delimiter: char,
    pub skipped_rows: usize,
}

/// Split a crosstab CSV file into one file per main-dimension key.
///
/// 1. Reads and parses the input (encoding and delimiter auto-detected)
/// 2. Reshapes the table
/// 3. Writes `<key>.csv` for every key into the output directory
/// 4. Optionally dumps the reshape result as JSON
pub async fn split_file(options: &SplitOptions) -> PipelineResult<SplitReport> {
    log_info(format!("Reading {}", options.input.display()));

    let bytes = tokio::fs::read(&options.input)
        .await
        .map_err(|e| PipelineError::io(&options.input, e))?;

    split_bytes(&bytes, options).await
}

/// Same as [`split_file`], from raw CSV bytes. `options.input` is ignored.
pub async fn split_bytes(bytes: &[u8], options: &SplitOptions) -> PipelineResult<SplitReport> {
    let parsed = parse_bytes_auto(bytes, options.delimiter)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} data rows", parsed.data_row_count()));

    let result = reshape_with(&parsed.rows, &options.reshape)?;
    print_layout(&result);

    for row in &result.skipped_rows {
        log_warning(format!("Skipped empty row {}", row));
    }

    let missing = result.layout.missing_columns();
    if !missing.is_empty() {
        log_warning(format!(
            "{} expected column(s) missing, written as blank: {}",
            missing.len(),
            missing.join(", ")
        ));
    }

    let files = write_outputs(&result, &options.output_dir, &options.time_label).await?;

    if let Some(ref path) = options.json_dump {
        write_json(&result, path).await?;
        log_success(format!("JSON written to {}", path.display()));
    }

    Ok(SplitReport {
        files,
        keys: result.len(),
        times: result.layout.times.len(),
        metrics: result.layout.metrics.len(),
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        skipped_rows: result.skipped_rows.len(),
    })
}

/// Write one CSV per key into `dir`, concurrently. Returns the paths in key order.
///
/// Two keys whose file names differ only by case collide, since they would
/// overwrite each other on case-insensitive filesystems.
pub async fn write_outputs(
    result: &ReshapeResult,
    dir: &Path,
    time_label: &str,
) -> PipelineResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PipelineError::io(dir, e))?;

    let mut claimed: HashMap<String, String> = HashMap::new();
    let mut writes = Vec::with_capacity(result.len());

    for table in to_tables(result, time_label) {
        let file = output_file_name(&table.key);
        if let Some(first) = claimed.insert(file.to_lowercase(), table.key.clone()) {
            return Err(PipelineError::FileNameCollision {
                first,
                second: table.key,
                file,
            });
        }

        let bytes = encode_table(&table.rows)?;
        let path = dir.join(&file);
        writes.push(async move {
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| PipelineError::io(&path, e))?;
            Ok::<_, PipelineError>(path)
        });
    }

    let files = futures::future::try_join_all(writes).await?;

    for path in &files {
        if let Some(name) = path.file_name() {
            log_success_indent(format!("Exported {}", name.to_string_lossy()), 1);
        }
    }

    Ok(files)
}

/// File name for a key: unsafe characters become `_`, plus `.csv`.
pub fn output_file_name(key: &str) -> String {
    let stem = UNSAFE_FILE_CHARS.replace_all(key, "_");

    if stem.is_empty() {
        "_.csv".to_string()
    } else {
        format!("{}.csv", stem)
    }
}

async fn write_json(result: &ReshapeResult, path: &Path) -> PipelineResult<()> {
    let json = serde_json::to_vec_pretty(result)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| PipelineError::io(path, e))
}

fn print_layout(result: &ReshapeResult) {
    let layout = &result.layout;
    log_info(format!("Main dimension: {}", layout.dimension));
    log_info(format!("{} time(s):", layout.times.len()));
    let times: Vec<String> = layout.times.iter().map(|t| t.to_string()).collect();
    log_info_indent(times.join(", "), 1);
    log_info(format!("{} metric(s):", layout.metrics.len()));
    for metric in &layout.metrics {
        log_info_indent(metric, 1);
    }
    log_success(format!("{} key(s)", result.len()));
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
