//! Crosstab reshaper.
//!
//! Regroups a wide table (one column per `"<time> <metric>"`) into one
//! time → metric → value structure per main-dimension key.
//!
//! ```text
//! Name  1990 Red  1990 Blue  1991 Red  1991 Blue        Alex
//! Alex  12        34         56        78          →    ├─ 1990 { Red: 12, Blue: 34 }
//!                                                       └─ 1991 { Red: 56, Blue: 78 }
//! ```
//!
//! Pure: no I/O, no shared state. Every call owns its output.

use serde::{Deserialize, Serialize};

use super::header::decompose_headers;
use crate::error::{ReshapeError, ReshapeOutcome};
use crate::models::{
    HeaderLayout, MetricValues, OrderedMap, ReshapeResult, ReshapedEntry, TimeKey,
};

/// What to do when an expected `"<time> <metric>"` header does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Emit a missing cell (`None`), written as empty text.
    #[default]
    Blank,
    /// Fail with [`ReshapeError::MissingColumn`] before reading any row.
    Fail,
}

/// Reshape options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeOptions {
    #[serde(default)]
    pub missing: MissingColumnPolicy,
}

impl ReshapeOptions {
    pub fn strict() -> Self {
        Self {
            missing: MissingColumnPolicy::Fail,
        }
    }
}

/// Reshape with default options (missing columns become blank cells).
///
/// # Example
/// ```
/// use crosstab::reshape;
///
/// let table = vec![
///     vec!["Name".to_string(), "1990 Red".to_string(), "1991 Red".to_string()],
///     vec!["Alex".to_string(), "12".to_string(), "56".to_string()],
/// ];
/// let result = reshape(&table).unwrap();
/// assert_eq!(result.value("Alex", 1991, "Red"), Some("56"));
/// ```
pub fn reshape(table: &[Vec<String>]) -> ReshapeOutcome<ReshapeResult> {
    reshape_with(table, &ReshapeOptions::default())
}

/// Reshape a table whose row 0 is the header.
///
/// Rows sharing a main-dimension key keep the key's first position; a later
/// row replaces every time slot it covers. Rows with no cells are skipped
/// and their table indices recorded in [`ReshapeResult::skipped_rows`].
pub fn reshape_with(
    table: &[Vec<String>],
    options: &ReshapeOptions,
) -> ReshapeOutcome<ReshapeResult> {
    let (headers, data_rows) = table
        .split_first()
        .ok_or_else(|| ReshapeError::InvalidInput("header row missing".into()))?;

    if headers.is_empty() {
        return Err(ReshapeError::InvalidInput("header row has no columns".into()));
    }

    let layout = decompose_headers(headers);

    if options.missing == MissingColumnPolicy::Fail {
        if let Some(label) = layout.missing_columns().into_iter().next() {
            return Err(ReshapeError::MissingColumn { label });
        }
    }

    let plan = column_plan(&layout);
    let mut entries: OrderedMap<String, ReshapedEntry> = OrderedMap::new();
    let mut skipped_rows = Vec::new();

    for (offset, row) in data_rows.iter().enumerate() {
        let Some(main_key) = row.first() else {
            skipped_rows.push(offset + 1);
            continue;
        };

        let entry = entries.entry_or_default(main_key.clone());
        for (time, columns) in &plan {
            let values: MetricValues = layout
                .metrics
                .iter()
                .zip(columns)
                .map(|(metric, column)| {
                    let cell = column.and_then(|idx| row.get(idx)).cloned();
                    (metric.clone(), cell)
                })
                .collect();
            entry.insert(*time, values);
        }
    }

    Ok(ReshapeResult {
        layout,
        entries,
        skipped_rows,
    })
}

/// Column index of every metric, per time, in metric order.
fn column_plan(layout: &HeaderLayout) -> Vec<(TimeKey, Vec<Option<usize>>)> {
    layout
        .times
        .iter()
        .map(|&time| {
            let columns = layout
                .metrics
                .iter()
                .map(|metric| layout.column(time, metric))
                .collect();
            (time, columns)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn alex_table() -> Vec<Vec<String>> {
        table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red", "1991 Blue"],
            &["Alex", "12", "34", "56", "78"],
        ])
    }

    #[test]
    fn test_single_entity() {
        let result = reshape(&alex_table()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.value("Alex", 1990, "Red"), Some("12"));
        assert_eq!(result.value("Alex", 1990, "Blue"), Some("34"));
        assert_eq!(result.value("Alex", 1991, "Red"), Some("56"));
        assert_eq!(result.value("Alex", 1991, "Blue"), Some("78"));

        let entry = result.get("Alex").unwrap();
        let times: Vec<_> = entry.keys().copied().collect();
        assert_eq!(times, vec![1990, 1991]);
        let metrics: Vec<_> = entry.get(&1990).unwrap().keys().cloned().collect();
        assert_eq!(metrics, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_entry_matches_hand_built() {
        let result = reshape(&alex_table()).unwrap();

        let cells = |red: &str, blue: &str| -> MetricValues {
            [
                ("Red".to_string(), Some(red.to_string())),
                ("Blue".to_string(), Some(blue.to_string())),
            ]
            .into_iter()
            .collect()
        };
        let expected: ReshapedEntry =
            [(1990, cells("12", "34")), (1991, cells("56", "78"))].into_iter().collect();

        assert_eq!(result.get("Alex"), Some(&expected));
    }

    #[test]
    fn test_row_of_empty_cells_is_an_entry() {
        let rows = table(&[&["Name", "1990 Red"], &["", ""], &["Alex", "12"]]);
        let result = reshape(&rows).unwrap();

        assert!(result.skipped_rows.is_empty());
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["", "Alex"]);
        assert_eq!(result.value("", 1990, "Red"), Some(""));
    }

    #[test]
    fn test_entities_are_independent() {
        let mut rows = alex_table();
        let alone = reshape(&rows).unwrap();

        rows.extend(table(&[&["Beth", "1", "2", "3", "4"]]));
        let both = reshape(&rows).unwrap();

        assert_eq!(both.get("Alex"), alone.get("Alex"));
        assert_eq!(both.keys().collect::<Vec<_>>(), vec!["Alex", "Beth"]);
        assert_eq!(both.value("Beth", 1991, "Blue"), Some("4"));
    }

    #[test]
    fn test_duplicate_key_overwrites_per_time() {
        let rows = table(&[
            &["Name", "1990 Red", "1991 Red"],
            &["Alex", "1", "2"],
            &["Beth", "5", "6"],
            &["Alex", "3", "4"],
        ]);
        let result = reshape(&rows).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["Alex", "Beth"]);
        assert_eq!(result.value("Alex", 1990, "Red"), Some("3"));
        assert_eq!(result.value("Alex", 1991, "Red"), Some("4"));
        assert_eq!(result.get("Alex").unwrap().len(), 2);
    }

    #[test]
    fn test_non_numeric_lead_token_ignored() {
        let rows = table(&[
            &["Name", "1990 Red", "Total Red"],
            &["Alex", "12", "99"],
        ]);
        let result = reshape(&rows).unwrap();

        assert_eq!(result.layout.times, vec![1990]);
        let entry = result.get("Alex").unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(result.value("Alex", 1990, "Red"), Some("12"));
    }

    #[test]
    fn test_missing_column_blank() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red"],
            &["Alex", "12", "34", "56"],
        ]);
        let result = reshape(&rows).unwrap();

        let slot = result.get("Alex").unwrap().get(&1991).unwrap();
        assert_eq!(slot.get("Red"), Some(&Some("56".to_string())));
        // Every metric is present in every slot, even without a column.
        assert_eq!(slot.get("Blue"), Some(&None));
    }

    #[test]
    fn test_missing_column_fail() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red"],
            &["Alex", "12", "34", "56"],
        ]);
        let err = reshape_with(&rows, &ReshapeOptions::strict()).unwrap_err();

        assert_eq!(
            err,
            ReshapeError::MissingColumn {
                label: "1991 Blue".into()
            }
        );
    }

    #[test]
    fn test_missing_column_fail_without_rows() {
        let rows = table(&[&["Name", "1990 Red", "1991 Blue"]]);
        assert!(reshape_with(&rows, &ReshapeOptions::strict()).is_err());
    }

    #[test]
    fn test_strict_accepts_complete_header() {
        assert!(reshape_with(&alex_table(), &ReshapeOptions::strict()).is_ok());
    }

    #[test]
    fn test_short_row_yields_missing_cells() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue"],
            &["Alex", "12"],
        ]);
        let result = reshape(&rows).unwrap();

        assert_eq!(result.value("Alex", 1990, "Red"), Some("12"));
        assert_eq!(result.value("Alex", 1990, "Blue"), None);
    }

    #[test]
    fn test_empty_row_skipped() {
        let mut rows = alex_table();
        rows.push(Vec::new());
        let result = reshape(&rows).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.skipped_rows, vec![2]);
    }

    #[test]
    fn test_empty_table() {
        let err = reshape(&[]).unwrap_err();
        assert_eq!(err, ReshapeError::InvalidInput("header row missing".into()));
    }

    #[test]
    fn test_header_without_columns() {
        let rows = vec![Vec::new()];
        assert!(matches!(
            reshape(&rows),
            Err(ReshapeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_header_only() {
        let rows = table(&[&["Name", "1990 Red"]]);
        let result = reshape(&rows).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.layout.metrics, vec!["Red"]);
    }

    #[test]
    fn test_four_entities() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red", "1991 Blue", "1993 Red", "1993 Blue"],
            &["Alex", "12", "34", "56", "78", "90", "23"],
            &["Beth", "45", "67", "89", "12", "34", "56"],
            &["Cara", "78", "90", "23", "45", "67", "89"],
            &["Dave", "12", "34", "56", "78", "90", "23"],
        ]);
        let result = reshape(&rows).unwrap();

        assert_eq!(
            result.keys().collect::<Vec<_>>(),
            vec!["Alex", "Beth", "Cara", "Dave"]
        );
        assert_eq!(result.layout.times, vec![1990, 1991, 1993]);
        assert_eq!(result.value("Beth", 1993, "Blue"), Some("56"));
        assert_eq!(result.value("Cara", 1991, "Red"), Some("23"));
        assert_eq!(result.get("Alex"), result.get("Dave"));
    }

    #[test]
    fn test_result_serializes_nested_json() {
        let result = reshape(&alex_table()).unwrap();
        let json = serde_json::to_value(&result.entries).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "Alex": {
                    "1990": { "Red": "12", "Blue": "34" },
                    "1991": { "Red": "56", "Blue": "78" }
                }
            })
        );
    }
}
