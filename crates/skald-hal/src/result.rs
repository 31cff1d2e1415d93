//! Measurement counts and labeled result sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skald_ir::Observable;

/// Histogram of measured bitstrings.
///
/// Bitstrings are written clbit 0 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from `(bitstring, count)` pairs; repeated bitstrings add up.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (bits, n) in pairs {
            counts.insert(bits, n);
        }
        counts
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Observations of one bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent bitstring; ties go to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (bits, &n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((bits.as_str(), n)),
            })
    }

    /// Iterate over `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Average of `(-1)^(number of ones)` over all shots.
    ///
    /// For counts produced by measuring exactly the support of a Pauli word
    /// after basis rotation, this is the word's expectation value.
    pub fn parity_expectation(&self) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        let signed: i64 = self
            .counts
            .iter()
            .map(|(bits, &n)| {
                let ones = bits.chars().filter(|&c| c == '1').count();
                let n = i64::try_from(n).unwrap_or(i64::MAX);
                if ones % 2 == 0 { n } else { -n }
            })
            .sum();
        signed as f64 / total as f64
    }
}

/// Results for one labeled artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Artifact label (kernel name or Pauli word).
    pub label: String,
    /// Measurement histogram.
    pub counts: Counts,
    /// Expectation value reported directly by the backend, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expectation: Option<f64>,
}

impl ExecutionResult {
    /// Create a result from counts.
    pub fn new(label: impl Into<String>, counts: Counts) -> Self {
        Self {
            label: label.into(),
            counts,
            expectation: None,
        }
    }

    /// Attach a backend-reported expectation value.
    #[must_use]
    pub fn with_expectation(mut self, value: f64) -> Self {
        self.expectation = Some(value);
        self
    }

    /// The backend value when present, otherwise the parity of the counts.
    pub fn expectation(&self) -> f64 {
        self.expectation
            .unwrap_or_else(|| self.counts.parity_expectation())
    }
}

/// Everything a job produced, keyed by artifact label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    results: Vec<ExecutionResult>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labeled result.
    pub fn push(&mut self, result: ExecutionResult) {
        self.results.push(result);
    }

    /// Result for `label`, the first one if repeated.
    pub fn get(&self, label: &str) -> Option<&ExecutionResult> {
        self.results.iter().find(|r| r.label == label)
    }

    /// Labels in submission order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.label.as_str())
    }

    /// All results in submission order.
    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    /// Number of labeled results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing was returned.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Combine per-term results into `Σ re(coeff) · ⟨term⟩`.
    ///
    /// Identity terms contribute their coefficient directly. Returns `None`
    /// if any non-identity term has no result under its Pauli word label.
    pub fn expectation(&self, observable: &Observable) -> Option<f64> {
        let mut total = observable.identity_coefficient();
        for term in observable.non_identity_terms() {
            let result = self.get(&term.label())?;
            total += term.coefficient.re * result.expectation();
        }
        Some(total)
    }
}

impl FromIterator<ExecutionResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ExecutionResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let counts = Counts::from_pairs([("00", 10), ("11", 5), ("00", 5)]);
        assert_eq!(counts.get("00"), 15);
        assert_eq!(counts.total_shots(), 20);
        assert_eq!(counts.most_frequent(), Some(("00", 15)));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_parity_expectation() {
        let counts = Counts::from_pairs([("00", 50), ("01", 25), ("11", 25)]);
        assert!((counts.parity_expectation() - 0.5).abs() < 1e-12);
        assert_eq!(Counts::new().parity_expectation(), 0.0);
    }

    #[test]
    fn test_expectation_combines_terms() {
        let obs: Observable = "2.0 II + 0.5 ZI + -1.0 XX".parse().unwrap();
        let results: ResultSet = [
            ExecutionResult::new("ZI", Counts::from_pairs([("0", 100)])),
            ExecutionResult::new("XX", Counts::from_pairs([("01", 100)])),
        ]
        .into_iter()
        .collect();

        // 2.0 + 0.5 * 1 + -1.0 * -1
        let value = results.expectation(&obs).unwrap();
        assert!((value - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_expectation_missing_term() {
        let obs: Observable = "1.0 ZZ".parse().unwrap();
        assert!(ResultSet::new().expectation(&obs).is_none());
    }

    #[test]
    fn test_backend_reported_expectation_wins() {
        let result = ExecutionResult::new("Z", Counts::from_pairs([("1", 1)])).with_expectation(0.25);
        assert_eq!(result.expectation(), 0.25);
    }
}
