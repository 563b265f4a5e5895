//! Serialization view: one long-format table per main-dimension key.
//!
//! Header `[time_label, metrics...]`, then one row per time in first-seen
//! order. Missing cells are written as empty text.

use crate::models::{HeaderLayout, ReshapeResult, ReshapedEntry};

/// Default label of the first output column.
pub const DEFAULT_TIME_LABEL: &str = "Year";

/// The output table for a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    pub key: String,
    /// Header row first.
    pub rows: Vec<Vec<String>>,
}

impl KeyTable {
    /// Project one entry, in the layout's time and metric order.
    pub fn from_entry(
        key: &str,
        entry: &ReshapedEntry,
        layout: &HeaderLayout,
        time_label: &str,
    ) -> Self {
        let mut rows = Vec::with_capacity(layout.times.len() + 1);

        let mut header = Vec::with_capacity(layout.metrics.len() + 1);
        header.push(time_label.to_string());
        header.extend(layout.metrics.iter().cloned());
        rows.push(header);

        for time in &layout.times {
            let values = entry.get(time);
            let mut row = Vec::with_capacity(layout.metrics.len() + 1);
            row.push(time.to_string());
            row.extend(layout.metrics.iter().map(|metric| {
                values
                    .and_then(|v| v.get(metric.as_str()))
                    .and_then(|cell| cell.clone())
                    .unwrap_or_default()
            }));
            rows.push(row);
        }

        Self {
            key: key.to_string(),
            rows,
        }
    }
}

/// Project every entry of a reshape result, in key order.
pub fn to_tables(result: &ReshapeResult, time_label: &str) -> Vec<KeyTable> {
    result
        .entries
        .iter()
        .map(|(key, entry)| KeyTable::from_entry(key, entry, &result.layout, time_label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::reshape;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_projection_order() {
        let rows = table(&[
            &["Name", "1991 Red", "1991 Blue", "1990 Red", "1990 Blue"],
            &["Alex", "56", "78", "12", "34"],
            &["Beth", "3", "4", "1", "2"],
        ]);
        let result = reshape(&rows).unwrap();
        let tables = to_tables(&result, DEFAULT_TIME_LABEL);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].key, "Alex");
        assert_eq!(
            tables[0].rows,
            table(&[
                &["Year", "Red", "Blue"],
                &["1991", "56", "78"],
                &["1990", "12", "34"],
            ])
        );
        assert_eq!(tables[1].key, "Beth");
        assert_eq!(tables[1].rows[2], vec!["1990", "1", "2"]);
    }

    #[test]
    fn test_missing_cells_are_blank() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red"],
            &["Alex", "12", "34", "56"],
        ]);
        let result = reshape(&rows).unwrap();
        let tables = to_tables(&result, DEFAULT_TIME_LABEL);

        assert_eq!(tables[0].rows[2], vec!["1991", "56", ""]);
    }

    #[test]
    fn test_custom_time_label() {
        let rows = table(&[&["Name", "2020 Q1"], &["Alex", "7"]]);
        let result = reshape(&rows).unwrap();
        let tables = to_tables(&result, "Period");

        assert_eq!(tables[0].rows[0], vec!["Period", "Q1"]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let rows = table(&[
            &["Name", "1990 Red", "1990 Blue", "1991 Red", "1991 Blue"],
            &["Alex", "12", "34", "56", "78"],
            &["Beth", "1", "2", "3", "4"],
        ]);
        let result = reshape(&rows).unwrap();

        let first = to_tables(&result, DEFAULT_TIME_LABEL);
        let second = to_tables(&result, DEFAULT_TIME_LABEL);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_times_gives_header_only() {
        let rows = table(&[&["Name", "Total Red"], &["Alex", "9"]]);
        let result = reshape(&rows).unwrap();
        let tables = to_tables(&result, DEFAULT_TIME_LABEL);

        assert_eq!(tables[0].rows, table(&[&["Year", "Red"]]));
    }
}
