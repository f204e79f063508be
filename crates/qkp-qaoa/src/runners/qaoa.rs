//! Generic QAOA runner.
//!
//! The runner owns a problem, a strategy and the ansatz built from them,
//! and drives the bind / simulate / score loop for the optimizer.

use std::sync::OnceLock;

use qkp_ir::ParameterBindings;
use qkp_sim::{ProbabilityDistribution, SimulationContext};
use tracing::{debug, instrument};

use super::report::QaoaReport;
use super::strategy::Strategy;
use crate::circuits::{Ansatz, CHOICE};
use crate::config::QaoaConfig;
use crate::error::{QaoaError, QaoaResult};
use crate::objective::{approximation_ratio, average_value, comparable_objective};
use crate::optimizers::{Bounds, GlobalSearch, OptimizationResult, Optimizer};
use crate::problems::KnapsackProblem;

/// Angles found by [`QaoaRunner::find_optimal_angles`].
#[derive(Debug, Clone)]
pub struct OptimalAngles {
    /// Angle vector `[gamma_0, beta_0, gamma_1, beta_1, ...]`.
    pub angles: Vec<f64>,
    /// Strategy objective at `angles`.
    pub objective_value: f64,
    /// Raw optimizer output (values are negated objectives).
    pub optimization: OptimizationResult,
}

/// QAOA runner for one problem under one strategy.
#[derive(Debug)]
pub struct QaoaRunner<S: Strategy> {
    problem: KnapsackProblem,
    strategy: S,
    ansatz: Ansatz,
    context: SimulationContext,
    optimizer: GlobalSearch,
}

impl<S: Strategy> QaoaRunner<S> {
    /// Build the ansatz for `problem` with default simulator and optimizer.
    pub fn new(problem: KnapsackProblem, strategy: S) -> QaoaResult<Self> {
        let ansatz = strategy.build(&problem)?;
        Ok(Self {
            problem,
            strategy,
            ansatz,
            context: SimulationContext::default(),
            optimizer: GlobalSearch::default(),
        })
    }

    /// Use an explicit simulation context.
    #[must_use]
    pub fn with_context(mut self, context: SimulationContext) -> Self {
        self.context = context;
        self
    }

    /// Use an explicit optimizer.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: GlobalSearch) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Apply simulator limits and optimizer budget from `config`.
    pub fn with_config(self, config: &QaoaConfig) -> QaoaResult<Self> {
        config.validate()?;
        let optimizer = GlobalSearch::new(config.optimizer.clone())?;
        Ok(self
            .with_context(SimulationContext::statevector(config.simulator.max_qubits))
            .with_optimizer(optimizer))
    }

    /// The problem instance.
    pub fn problem(&self) -> &KnapsackProblem {
        &self.problem
    }

    /// The encoding strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The assembled ansatz.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// Angle domain for the optimizer.
    pub fn bounds(&self) -> QaoaResult<Bounds> {
        Bounds::qaoa(
            self.ansatz.layers(),
            self.ansatz.gamma_range(),
            self.ansatz.beta_range(),
        )
    }

    /// Full binding for `angles`: the variational angles plus every fixed
    /// penalty the circuit declares.
    pub fn bindings(&self, angles: &[f64]) -> QaoaResult<ParameterBindings> {
        let expected = self.ansatz.num_angles();
        if angles.len() != expected {
            return Err(QaoaError::AngleCountMismatch {
                expected,
                got: angles.len(),
            });
        }

        let mut bindings: ParameterBindings = self
            .ansatz
            .angle_names()
            .into_iter()
            .zip(angles.iter().copied())
            .collect();
        let declared = self.ansatz.circuit().parameters();
        let fixed = self.strategy.fixed_bindings();
        for name in fixed.names() {
            // a factor can cancel out of every gate angle
            if declared.iter().any(|p| p == name) {
                if let Some(value) = fixed.get(name) {
                    bindings.insert(name, value);
                }
            }
        }
        Ok(bindings)
    }

    /// Exact outcome distribution at `angles`, over every qubit or over the
    /// choice register only.
    pub fn probabilities(
        &self,
        angles: &[f64],
        choices_only: bool,
    ) -> QaoaResult<ProbabilityDistribution> {
        let bindings = self.bindings(angles)?;
        let register = choices_only.then_some(CHOICE);
        Ok(self
            .context
            .probabilities(self.ansatz.circuit(), &bindings, register)?)
    }

    /// Expected strategy objective over the full distribution.
    pub fn expectation_value(&self, angles: &[f64]) -> QaoaResult<f64> {
        let distribution = self.probabilities(angles, false)?;
        Ok(average_value(&distribution, |outcome| {
            self.strategy.objective(&self.problem, outcome)
        }))
    }

    /// Expected value of feasible choices, infeasible ones scoring 0.
    pub fn comparable_expectation_value(&self, angles: &[f64]) -> QaoaResult<f64> {
        let distribution = self.probabilities(angles, true)?;
        Ok(average_value(&distribution, |choice| {
            comparable_objective(&self.problem, choice)
        }))
    }

    /// Comparable expectation divided by the optimum value.
    pub fn approximation_ratio(&self, angles: &[f64]) -> QaoaResult<f64> {
        let expectation = self.comparable_expectation_value(angles)?;
        Ok(approximation_ratio(expectation, &self.problem))
    }

    /// Maximize the expectation value over the angle box.
    ///
    /// Deterministic for a fixed optimizer seed. A budget exhausted before
    /// convergence is reported through `optimization.converged`.
    #[instrument(skip(self), fields(strategy = self.strategy.name(), layers = self.ansatz.layers()))]
    pub fn find_optimal_angles(&self) -> QaoaResult<OptimalAngles> {
        let bounds = self.bounds()?;
        // surface binding and sizing errors before the search starts
        self.expectation_value(&bounds.center())?;

        let failure = OnceLock::new();
        let optimization = self.optimizer.minimize(
            |angles| match self.expectation_value(angles) {
                Ok(value) => -value,
                Err(err) => {
                    let _ = failure.set(err);
                    f64::INFINITY
                }
            },
            &bounds,
        );
        if let Some(err) = failure.into_inner() {
            return Err(err);
        }

        let objective_value = -optimization.optimal_value;
        debug!(
            angles = ?optimization.optimal_params,
            objective_value,
            evaluations = optimization.num_evaluations,
            converged = optimization.converged,
            "Found optimal angles"
        );
        Ok(OptimalAngles {
            angles: optimization.optimal_params.clone(),
            objective_value,
            optimization,
        })
    }

    /// Optimize, then summarize the result.
    pub fn run(&self) -> QaoaResult<QaoaReport> {
        let optimal = self.find_optimal_angles()?;
        self.report(&optimal.angles)
    }

    /// Summarize the circuit's behaviour at `angles`.
    pub fn report(&self, angles: &[f64]) -> QaoaResult<QaoaReport> {
        let objective_value = self.expectation_value(angles)?;
        let choices = self.probabilities(angles, true)?;
        let ratio = approximation_ratio(
            average_value(&choices, |choice| comparable_objective(&self.problem, choice)),
            &self.problem,
        );
        debug!(
            strategy = self.strategy.name(),
            ?angles,
            objective_value,
            ratio,
            "Runner finished"
        );
        Ok(QaoaReport {
            problem: self.problem.clone(),
            strategy: self.strategy.name().to_string(),
            layers: self.ansatz.layers(),
            angles: angles.to_vec(),
            objective_value,
            approximation_ratio: ratio,
            distribution: choices.to_bitstrings(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runners::strategy::{LinearStrategy, QuadraticStrategy, QuantumWalkStrategy};

    #[test]
    fn test_bindings_layout() {
        let problem = KnapsackProblem::toy("E").unwrap();
        let strategy = QuadraticStrategy::with_penalties(2, 0.5, 2.0).unwrap();
        let runner = QaoaRunner::new(problem, strategy).unwrap();
        let bindings = runner.bindings(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(bindings.len(), 6);
        assert_eq!(bindings.get("gamma1"), Some(0.3));
        assert_eq!(bindings.get("beta0"), Some(0.2));
        assert_eq!(bindings.get("b"), Some(2.0));
    }

    #[test]
    fn test_angle_count_mismatch() {
        let problem = KnapsackProblem::toy("A").unwrap();
        let runner = QaoaRunner::new(problem, QuantumWalkStrategy::new(1, 1).unwrap()).unwrap();
        assert!(matches!(
            runner.expectation_value(&[0.1]),
            Err(QaoaError::AngleCountMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_bounds_follow_ansatz() {
        let problem = KnapsackProblem::toy("A").unwrap();
        let runner = QaoaRunner::new(problem, LinearStrategy::with_penalty(2, 0.5).unwrap()).unwrap();
        let bounds = runner.bounds().unwrap();
        assert_eq!(bounds.dim(), 4);
        assert!((bounds.width(0) - 4.0 * std::f64::consts::PI).abs() < 1e-12);
        assert!((bounds.width(1) - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let problem = KnapsackProblem::toy("D").unwrap();
        let runner = QaoaRunner::new(problem, LinearStrategy::with_penalty(1, 2.0).unwrap()).unwrap();
        let full = runner.probabilities(&[0.7, 0.3], false).unwrap();
        let choices = runner.probabilities(&[0.7, 0.3], true).unwrap();
        assert!((full.total() - 1.0).abs() < 1e-9);
        assert!((choices.total() - 1.0).abs() < 1e-9);
        assert_eq!(choices.num_qubits(), 3);
    }
}
