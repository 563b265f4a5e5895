//! Header decomposition.
//!
//! Splits each composite label `"<time> <metric...>"` at its first space and
//! collects the distinct metrics and times in first-seen order.

use std::collections::HashMap;

use crate::models::{expected_label, HeaderLayout, MetricKey, TimeKey};

/// Split a composite label into its leading token and the rest.
///
/// A label without a space is all lead token; its metric is `""`.
pub fn split_label(label: &str) -> (&str, &str) {
    label.split_once(' ').unwrap_or((label, ""))
}

/// Parse a leading token as a time, if it is an integer.
pub fn parse_time(token: &str) -> Option<TimeKey> {
    token.trim().parse().ok()
}

/// Decompose a header row. Cell 0 is the main-dimension label.
pub fn decompose_headers(headers: &[String]) -> HeaderLayout {
    let dimension = headers.first().cloned().unwrap_or_default();

    let mut metrics: Vec<MetricKey> = Vec::new();
    let mut times: Vec<TimeKey> = Vec::new();
    let mut columns = HashMap::new();

    for (idx, label) in headers.iter().enumerate().skip(1) {
        let (lead, rest) = split_label(label);

        if !metrics.iter().any(|m| m == rest) {
            metrics.push(rest.to_string());
        }

        let Some(time) = parse_time(lead) else {
            continue;
        };
        if !times.contains(&time) {
            times.push(time);
        }

        // Only an exact "<time> <metric>" label is addressable; first one wins.
        if expected_label(time, rest) == *label {
            columns.entry((time, rest.to_string())).or_insert(idx);
        }
    }

    HeaderLayout {
        dimension,
        metrics,
        times,
        columns,
    }
}
