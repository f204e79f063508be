//! Variational quantum solvers for the 0-1 knapsack problem.
//!
//! Three encodings are provided, each as a [`Strategy`]:
//!
//! - **Linear penalty** ([`LinearStrategy`]): a feasibility oracle over a
//!   Fourier-domain weight register dephases infeasible choices in
//!   proportion to their excess weight
//! - **Quadratic penalty** ([`QuadraticStrategy`]): a one-hot weight
//!   register and an algebraic QUBO penalty built from Z and ZZ rotations
//! - **Quantum walk** ([`QuantumWalkStrategy`]): a Trotterized mixer that
//!   only moves amplitude between feasible neighbors
//!
//! A [`QaoaRunner`] binds angle vectors into the strategy's ansatz,
//! simulates it exactly and maximizes the expected objective with a seeded
//! [`GlobalSearch`].
//!
//! # Example
//!
//! ```rust
//! use qkp_qaoa::{KnapsackProblem, LinearStrategy, QaoaRunner};
//!
//! let problem = KnapsackProblem::toy("A").unwrap();
//! let strategy = LinearStrategy::with_minimal_penalty(&problem, 1).unwrap();
//! let runner = QaoaRunner::new(problem, strategy).unwrap();
//!
//! let ratio = runner.approximation_ratio(&[0.4, 0.2]).unwrap();
//! assert!((0.0..=1.0).contains(&ratio));
//! ```

pub mod circuits;
pub mod config;
pub mod error;
pub mod objective;
pub mod optimizers;
pub mod problems;
pub mod runners;

pub use circuits::Ansatz;
pub use config::{ConfigError, GlobalSearchConfig, QaoaConfig, SimulatorConfig};
pub use error::{QaoaError, QaoaResult};
pub use optimizers::{Bounds, GlobalSearch, NelderMead, OptimizationResult, Optimizer};
pub use problems::{KnapsackProblem, Rational};
pub use runners::{
    LinearStrategy, OptimalAngles, QaoaReport, QaoaRunner, QuadraticStrategy,
    QuantumWalkStrategy, Strategy,
};
