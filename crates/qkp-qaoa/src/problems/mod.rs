//! Knapsack problem instances and penalty factors.

pub mod knapsack;
pub mod penalty;

pub use knapsack::{KnapsackProblem, MAX_ITEMS, MAX_TOTAL_WEIGHT};
pub use penalty::{
    Rational, a_min, b_min, gcd, lcm, linear_gamma_period, quadratic_gamma_period,
};
