//! Objective functions over measurement outcomes.
//!
//! Outcomes are basis indices of the full circuit (or of the choice
//! register alone), so the choice occupies the lowest `N` bits and the
//! quadratic encoding's one-hot weight bits follow.

use qkp_sim::ProbabilityDistribution;

use crate::problems::KnapsackProblem;
use crate::problems::knapsack::mask;

/// `Σ objective(outcome) · probability(outcome)`.
pub fn average_value(distribution: &ProbabilityDistribution, objective: impl Fn(usize) -> f64) -> f64 {
    distribution.expectation(objective)
}

/// The choice encoded in the lowest `N` bits of `outcome`.
pub fn choice_of(outcome: usize, num_items: usize) -> usize {
    outcome & mask(num_items)
}

/// The one-hot weight bits `y_1..y_W` of a quadratic-encoding outcome.
pub fn weight_bits_of(outcome: usize, problem: &KnapsackProblem) -> usize {
    let width = usize::try_from(problem.max_weight()).unwrap_or(usize::MAX);
    outcome
        .checked_shr(problem.num_items() as u32)
        .map_or(0, |bits| bits & mask(width))
}

/// `value − a·max(0, weight − max_weight)`.
pub fn linear_objective(problem: &KnapsackProblem, a: f64, outcome: usize) -> f64 {
    let choice = choice_of(outcome, problem.num_items());
    let excess = problem.weight(choice).saturating_sub(problem.max_weight());
    problem.value(choice) as f64 - a * excess as f64
}

/// `a·value − b·[(1 − Σ y_j)² + (Σ j·y_j − weight)²]`.
pub fn quadratic_objective(problem: &KnapsackProblem, a: f64, b: f64, outcome: usize) -> f64 {
    let choice = choice_of(outcome, problem.num_items());
    let y = weight_bits_of(outcome, problem);
    let ones = y.count_ones() as f64;
    let encoded: f64 = (0..usize::BITS)
        .filter(|&j| y >> j & 1 == 1)
        .map(|j| f64::from(j + 1))
        .sum();
    let mismatch = encoded - problem.weight(choice) as f64;
    let penalty = (1.0 - ones).powi(2) + mismatch.powi(2);
    a * problem.value(choice) as f64 - b * penalty
}

/// Plain value; the walk ansatz never leaves the feasible subspace.
pub fn walk_objective(problem: &KnapsackProblem, outcome: usize) -> f64 {
    problem.value(choice_of(outcome, problem.num_items())) as f64
}

/// Strategy-independent score: value if feasible, else 0.
pub fn comparable_objective(problem: &KnapsackProblem, outcome: usize) -> f64 {
    let choice = choice_of(outcome, problem.num_items());
    if problem.is_feasible(choice) {
        problem.value(choice) as f64
    } else {
        0.0
    }
}

/// `expectation / optimum`, where the optimum is the value of the first
/// best known solution. A zero optimum gives 1.
pub fn approximation_ratio(expectation: f64, problem: &KnapsackProblem) -> f64 {
    let best = problem.optimum_value();
    if best == 0 {
        return 1.0;
    }
    expectation / best as f64
}
