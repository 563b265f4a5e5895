//! Domain models for reshaped crosstab data.
//!
//! - [`HeaderLayout`] - decomposed header row (metrics, times, column lookup)
//! - [`OrderedMap`] - insertion-ordered map used for every level of nesting
//! - [`ReshapedEntry`] - time → metric → value for one main-dimension key
//! - [`ReshapeResult`] - every entry, in first-seen key order

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Integer taken from the leading token of a composite header label.
pub type TimeKey = i64;

/// Remainder of a composite header label after the time token.
pub type MetricKey = String;

/// A reshaped value. `None` marks a missing `"<time> <metric>"` column
/// or a row too short to hold it.
pub type Cell = Option<String>;

/// Metric → value for a single time slot.
pub type MetricValues = OrderedMap<MetricKey, Cell>;

/// Time → metric values for a single main-dimension key.
pub type ReshapedEntry = OrderedMap<TimeKey, MetricValues>;

// =============================================================================
// OrderedMap
// =============================================================================

/// Map that iterates in insertion order.
///
/// Keys live in a `Vec`, a `HashMap` holds their positions. Re-inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or replace. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get a mutable reference to the value for `key`, inserting
    /// `V::default()` at the end if it is new.
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key, V::default()));
                pos
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality includes order.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// =============================================================================
// Header layout
// =============================================================================

/// The header row, decomposed into metrics, times and a column lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLayout {
    /// Label of the main-dimension column (header cell 0).
    pub dimension: String,
    /// Distinct metrics, first-seen order. Defines output column order.
    pub metrics: Vec<MetricKey>,
    /// Distinct times, first-seen order (not sorted).
    pub times: Vec<TimeKey>,
    /// `(time, metric)` → index of the first header labelled `"<time> <metric>"`.
    #[serde(skip)]
    pub columns: HashMap<(TimeKey, MetricKey), usize>,
}

impl HeaderLayout {
    /// Column holding `metric` for `time`, if the header has one.
    pub fn column(&self, time: TimeKey, metric: &str) -> Option<usize> {
        self.columns.get(&(time, metric.to_string())).copied()
    }

    /// Every `(time, metric)` pair with no matching header, in output order.
    pub fn missing_columns(&self) -> Vec<String> {
        self.times
            .iter()
            .flat_map(|&t| self.metrics.iter().map(move |m| (t, m)))
            .filter(|(t, m)| self.column(*t, m).is_none())
            .map(|(t, m)| expected_label(t, m))
            .collect()
    }
}

/// The header label expected for `metric` at `time`.
///
/// A header without a metric is just the time token.
pub fn expected_label(time: TimeKey, metric: &str) -> String {
    if metric.is_empty() {
        time.to_string()
    } else {
        format!("{} {}", time, metric)
    }
}

// =============================================================================
// Reshape result
// =============================================================================

/// Every reshaped entry, keyed by main-dimension value in first-seen order.
///
/// Carries the header layout so the time and metric order travels with
/// the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReshapeResult {
    pub layout: HeaderLayout,
    pub entries: OrderedMap<String, ReshapedEntry>,
    /// Table indices of data rows dropped for having no cells.
    #[serde(skip)]
    pub skipped_rows: Vec<usize>,
}

impl ReshapeResult {
    pub fn get(&self, key: &str) -> Option<&ReshapedEntry> {
        self.entries.get(key)
    }

    /// Main-dimension keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of `metric` at `time` for `key`, flattened.
    pub fn value(&self, key: &str, time: TimeKey, metric: &str) -> Option<&str> {
        self.entries
            .get(key)?
            .get(&time)?
            .get(metric)?
            .as_deref()
    }
}
