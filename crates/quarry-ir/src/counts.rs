//! Measurement count histograms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A histogram of measurement outcomes: bitstring label → frequency.
///
/// Backed by an ordered map so that serialization is deterministic —
/// callers that poll the counts as a JSON string get the same string
/// for the same histogram, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from label/frequency pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u64)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(label, count)| (label.into(), count))
                .collect(),
        )
    }

    /// Add `count` observations of `label`, accumulating with any
    /// previous observations of the same label.
    pub fn add(&mut self, label: impl Into<String>, count: u64) {
        *self.0.entry(label.into()).or_insert(0) += count;
    }

    /// Total number of shots recorded across all labels.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// The most frequent outcome, if any.
    ///
    /// Ties resolve to the lexicographically smallest label.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(label, &count)| (label.as_str(), count))
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the histogram is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over label/frequency pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, &count)| (label.as_str(), count))
    }

    /// Serialize to the JSON object form (`{"00":512,"11":488}`).
    ///
    /// An empty histogram serializes to `"{}"`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Discard all recorded outcomes.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
