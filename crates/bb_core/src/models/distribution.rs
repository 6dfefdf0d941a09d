//! Categorical distributions over outcome labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance used when checking that a distribution is normalized.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-5;

/// Ordered `(label, probability)` pairs.
///
/// Entry order is part of the value: sampling walks the entries in order, so
/// two distributions with the same weights in a different order draw
/// different labels from the same random stream. Constructors built from
/// tallies use the label's `Ord` ordering.
///
/// Deserialized values are checked the same way `is_normalized` checks them,
/// so a stored or configured distribution can always be sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution<K>")]
pub struct Distribution<K> {
    entries: Vec<(K, f64)>,
}

/// Wire form of a `Distribution`, before its weights are checked.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDistribution<K> {
    entries: Vec<(K, f64)>,
}

impl<K> TryFrom<RawDistribution<K>> for Distribution<K> {
    type Error = String;

    fn try_from(raw: RawDistribution<K>) -> Result<Self, Self::Error> {
        let dist = Self { entries: raw.entries };
        if dist.is_empty() {
            return Err("distribution has no entries".to_string());
        }
        if let Some(weight) = dist.weights().find(|w| !valid_weight(*w)) {
            return Err(format!("distribution weight {weight} is outside [0, 1]"));
        }
        if !dist.is_normalized() {
            return Err(format!("distribution weights sum to {}, not 1", dist.total()));
        }
        Ok(dist)
    }
}

fn valid_weight(weight: f64) -> bool {
    weight.is_finite() && (0.0..=1.0).contains(&weight)
}

impl<K> Distribution<K> {
    /// Normalize non-negative weights. Returns `None` when nothing positive
    /// remains or a weight is negative or non-finite. Zero-weight entries are
    /// dropped.
    pub fn from_weights(weights: impl IntoIterator<Item = (K, f64)>) -> Option<Self> {
        let mut entries = Vec::new();
        let mut total = 0.0;
        for (label, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return None;
            }
            if weight > 0.0 {
                total += weight;
                entries.push((label, weight));
            }
        }
        if entries.is_empty() || total <= 0.0 {
            return None;
        }
        for (_, weight) in entries.iter_mut() {
            *weight /= total;
        }
        Some(Self { entries })
    }

    /// Normalize raw counts; `None` when every count is zero.
    pub fn from_counts(counts: impl IntoIterator<Item = (K, u64)>) -> Option<Self> {
        Self::from_weights(counts.into_iter().map(|(label, n)| (label, n as f64)))
    }

    /// A distribution with no entries. Only useful to exercise fallbacks;
    /// sampling it fails.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[(K, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(label, _)| label)
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, weight)| *weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights().sum()
    }

    /// Non-empty, every weight in `[0, 1]`, and the weights sum to one.
    pub fn is_normalized(&self) -> bool {
        !self.is_empty()
            && self.weights().all(valid_weight)
            && (self.total() - 1.0).abs() <= NORMALIZATION_TOLERANCE
    }
}

impl<K: PartialEq> Distribution<K> {
    /// Probability assigned to `label` (0.0 when absent).
    pub fn probability(&self, label: &K) -> f64 {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Tally
// ============================================================================

/// Frequency counter that turns into a `Distribution` ordered by label.
#[derive(Debug, Clone)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self { counts: BTreeMap::new() }
    }
}

impl<K: Ord> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: K) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn into_distribution(self) -> Option<Distribution<K>> {
        Distribution::from_counts(self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_counts_normalizes() {
        let dist = Distribution::from_counts(vec![("a", 1), ("b", 3)]).unwrap();
        assert!((dist.probability(&"a") - 0.25).abs() < 1e-12);
        assert!((dist.probability(&"b") - 0.75).abs() < 1e-12);
        assert_eq!(dist.probability(&"c"), 0.0);
        assert!(dist.is_normalized());
    }

    #[test]
    fn test_zero_weights_dropped_and_all_zero_rejected() {
        let dist = Distribution::from_counts(vec![("a", 0), ("b", 2)]).unwrap();
        assert_eq!(dist.len(), 1);
        assert!(Distribution::<&str>::from_counts(vec![("a", 0)]).is_none());
        assert!(Distribution::<&str>::from_counts(Vec::new()).is_none());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        assert!(Distribution::from_weights(vec![("a", -0.1), ("b", 1.0)]).is_none());
        assert!(Distribution::from_weights(vec![("a", f64::NAN)]).is_none());
        assert!(Distribution::from_weights(vec![("a", f64::INFINITY)]).is_none());
    }

    #[test]
    fn test_deserialize_checks_weights() {
        let ok: Distribution<String> = serde_json::from_str(r#"{"entries":[["a",0.25],["b",0.75]]}"#).unwrap();
        assert!(ok.is_normalized());
        assert_eq!(ok.probability(&"b".to_string()), 0.75);

        // Sums to one but carries weights outside [0, 1].
        let err = serde_json::from_str::<Distribution<String>>(r#"{"entries":[["a",1.5],["b",-0.5]]}"#).unwrap_err();
        assert!(err.to_string().contains("outside [0, 1]"));

        assert!(serde_json::from_str::<Distribution<String>>(r#"{"entries":[["a",0.5],["b",0.2]]}"#).is_err());
        assert!(serde_json::from_str::<Distribution<String>>(r#"{"entries":[]}"#).is_err());
    }

    #[test]
    fn test_tally_orders_by_label() {
        let mut tally = Tally::new();
        for label in ["c", "a", "b", "a"] {
            tally.add(label);
        }
        assert_eq!(tally.total(), 4);
        let dist = tally.into_distribution().unwrap();
        let labels: Vec<_> = dist.labels().copied().collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_counts_always_normalize(counts in prop::collection::vec(0u64..10_000, 1..12)) {
            let labelled: Vec<(usize, u64)> = counts.iter().copied().enumerate().collect();
            match Distribution::from_counts(labelled) {
                Some(dist) => prop_assert!((dist.total() - 1.0).abs() <= NORMALIZATION_TOLERANCE),
                None => prop_assert!(counts.iter().all(|&n| n == 0)),
            }
        }

        #[test]
        fn prop_weights_always_normalize(weights in prop::collection::vec(0.0f64..1e6, 1..12)) {
            let labelled: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
            if let Some(dist) = Distribution::from_weights(labelled) {
                prop_assert!(dist.is_normalized());
                prop_assert!(dist.weights().all(|w| (0.0..=1.0).contains(&w)));
            }
        }
    }
}
