//! 0-1 knapsack problem instances.
//!
//! A choice is a bitmask over the items: bit `i` set means item `i` is
//! packed. The same convention is used for the choice register of every
//! circuit, where qubit `i` holds item `i`.

use serde::{Deserialize, Serialize};

use crate::error::{QaoaError, QaoaResult};

/// Largest instance accepted; choices are enumerated exhaustively.
pub const MAX_ITEMS: usize = 32;

/// Largest accepted sum of all weights. The feasibility oracle adds an
/// offset below the total to it, which must stay representable.
pub const MAX_TOTAL_WEIGHT: u64 = u64::MAX >> 1;

/// An immutable 0-1 knapsack instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKnapsack")]
pub struct KnapsackProblem {
    values: Vec<u64>,
    weights: Vec<u64>,
    max_weight: u64,
}

#[derive(Deserialize)]
struct RawKnapsack {
    values: Vec<u64>,
    weights: Vec<u64>,
    max_weight: u64,
}

impl TryFrom<RawKnapsack> for KnapsackProblem {
    type Error = QaoaError;

    fn try_from(raw: RawKnapsack) -> QaoaResult<Self> {
        Self::new(raw.values, raw.weights, raw.max_weight)
    }
}

/// Instances used throughout the numerical experiments, keyed by name.
const TOY_PROBLEMS: [(&str, &[u64], &[u64], u64); 7] = [
    ("A", &[1, 2], &[1, 1], 1),
    ("B", &[2, 1], &[1, 1], 1),
    ("C", &[1, 2], &[1, 1], 2),
    ("D", &[1, 1, 2], &[1, 1, 1], 2),
    ("E", &[1, 2, 4], &[1, 2, 3], 3),
    ("F", &[2, 3, 5], &[2, 2, 2], 3),
    ("G", &[1, 2, 1, 3], &[1, 2, 2, 1], 4),
];

impl KnapsackProblem {
    /// Create a validated instance.
    ///
    /// Rejects empty instances, mismatched lengths, zero weights, more
    /// than [`MAX_ITEMS`] items, values that do not sum within `u64` and
    /// weights summing past [`MAX_TOTAL_WEIGHT`].
    pub fn new(values: Vec<u64>, weights: Vec<u64>, max_weight: u64) -> QaoaResult<Self> {
        if values.is_empty() {
            return Err(QaoaError::MalformedProblem("no items".into()));
        }
        if values.len() != weights.len() {
            return Err(QaoaError::MalformedProblem(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        if values.len() > MAX_ITEMS {
            return Err(QaoaError::MalformedProblem(format!(
                "{} items exceeds the limit of {MAX_ITEMS}",
                values.len()
            )));
        }
        if let Some(i) = weights.iter().position(|&w| w == 0) {
            return Err(QaoaError::MalformedProblem(format!(
                "weight of item {i} must be positive"
            )));
        }
        let total_weight = checked_sum(&weights).filter(|&total| total <= MAX_TOTAL_WEIGHT);
        if total_weight.is_none() {
            return Err(QaoaError::MalformedProblem(format!(
                "total weight exceeds the limit of {MAX_TOTAL_WEIGHT}"
            )));
        }
        if checked_sum(&values).is_none() {
            return Err(QaoaError::MalformedProblem("total value overflows u64".into()));
        }
        Ok(Self {
            values,
            weights,
            max_weight,
        })
    }

    /// A predefined instance by name (`"A"` to `"G"`).
    pub fn toy(name: &str) -> Option<Self> {
        TOY_PROBLEMS
            .iter()
            .find(|(n, ..)| *n == name)
            .map(|&(_, values, weights, max_weight)| Self {
                values: values.to_vec(),
                weights: weights.to_vec(),
                max_weight,
            })
    }

    /// All predefined instances in name order.
    pub fn toy_problems() -> Vec<(&'static str, Self)> {
        TOY_PROBLEMS
            .iter()
            .filter_map(|&(name, ..)| Self::toy(name).map(|p| (name, p)))
            .collect()
    }

    /// Item values.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Item weights.
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Capacity of the knapsack.
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    /// Number of items.
    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Largest item value.
    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Bitmask covering every item.
    pub fn choice_mask(&self) -> usize {
        mask(self.num_items())
    }

    /// Number of distinct choices, `2^N`.
    pub fn num_choices(&self) -> usize {
        1usize << self.num_items()
    }

    /// Total value of a choice.
    pub fn value(&self, choice: usize) -> u64 {
        Self::masked_sum(&self.values, choice)
    }

    /// Total weight of a choice.
    pub fn weight(&self, choice: usize) -> u64 {
        Self::masked_sum(&self.weights, choice)
    }

    /// Whether a choice fits the knapsack.
    pub fn is_feasible(&self, choice: usize) -> bool {
        self.weight(choice) <= self.max_weight
    }

    fn masked_sum(items: &[u64], choice: usize) -> u64 {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| choice >> i & 1 == 1)
            .map(|(_, &x)| x)
            .sum()
    }

    /// Every feasible choice of maximal value, in increasing bitmask order.
    ///
    /// The empty choice is always feasible, so the result is never empty.
    pub fn best_known_solutions(&self) -> Vec<usize> {
        let mut best = 0;
        let mut solutions = Vec::new();
        for choice in 0..self.num_choices() {
            if !self.is_feasible(choice) {
                continue;
            }
            let value = self.value(choice);
            if value > best {
                best = value;
                solutions.clear();
            }
            if value == best {
                solutions.push(choice);
            }
        }
        solutions
    }

    /// Value of the optimal choice.
    pub fn optimum_value(&self) -> u64 {
        self.best_known_solutions()
            .first()
            .map_or(0, |&choice| self.value(choice))
    }
}

fn checked_sum(items: &[u64]) -> Option<u64> {
    items.iter().try_fold(0u64, |acc, &x| acc.checked_add(x))
}

/// Bitmask of the lowest `bits` bits.
pub(crate) fn mask(bits: usize) -> usize {
    if bits >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << bits) - 1
    }
}
