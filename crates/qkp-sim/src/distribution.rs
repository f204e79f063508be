//! Exact outcome distributions extracted from a statevector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use qkp_ir::QubitId;

use crate::statevector::Statevector;

/// Probabilities below this are dropped when a distribution is built.
const PROBABILITY_FLOOR: f64 = 1e-16;

/// Render an outcome index as a bitstring, qubit 0 first.
pub fn outcome_to_bitstring(outcome: usize, num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|q| if outcome >> q & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// A mapping from outcome index to probability.
///
/// Outcome bit `k` is the value of the `k`-th tracked qubit. Zero-probability
/// outcomes are not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityDistribution {
    num_qubits: usize,
    probabilities: BTreeMap<usize, f64>,
}

impl ProbabilityDistribution {
    /// Distribution over every qubit of `state`.
    pub fn from_statevector(state: &Statevector) -> Self {
        Self::from_probabilities(state.num_qubits(), state.probabilities())
    }

    /// Distribution from a dense probability vector.
    pub fn from_probabilities(num_qubits: usize, probabilities: Vec<f64>) -> Self {
        let probabilities = probabilities
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p > PROBABILITY_FLOOR)
            .collect();
        Self {
            num_qubits,
            probabilities,
        }
    }

    /// Marginal over `qubits`, summing the traced-out bits.
    ///
    /// Qubit `qubits[k]` becomes bit `k` of the marginal outcome.
    #[must_use]
    pub fn marginal(&self, qubits: &[QubitId]) -> Self {
        let mut out: BTreeMap<usize, f64> = BTreeMap::new();
        for (&outcome, &p) in &self.probabilities {
            let reduced = qubits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (k, q)| acc | ((outcome >> q.index() & 1) << k));
            *out.entry(reduced).or_insert(0.0) += p;
        }
        Self {
            num_qubits: qubits.len(),
            probabilities: out,
        }
    }

    /// Number of tracked qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of `outcome` (0 when absent).
    pub fn probability(&self, outcome: usize) -> f64 {
        self.probabilities.get(&outcome).copied().unwrap_or(0.0)
    }

    /// Sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// Outcomes with non-zero probability, in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probabilities.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of outcomes with non-zero probability.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether no outcome has non-zero probability.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Expectation of `f` over the outcomes.
    pub fn expectation(&self, f: impl Fn(usize) -> f64) -> f64 {
        self.iter().map(|(outcome, p)| f(outcome) * p).sum()
    }

    /// The most likely outcome; ties go to the smaller index.
    pub fn most_likely(&self) -> Option<(usize, f64)> {
        self.iter()
            .fold(None, |best: Option<(usize, f64)>, (k, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((k, p)),
            })
    }

    /// Bitstring keyed view, qubit 0 first.
    pub fn to_bitstrings(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(k, p)| (outcome_to_bitstring(k, self.num_qubits), p))
            .collect()
    }
}
