//! Knapsack encodings as interchangeable strategies.

use qkp_ir::ParameterBindings;

use crate::circuits::{
    Ansatz, PENALTY_A, PENALTY_B, linear_ansatz, quadratic_ansatz, quantum_walk_ansatz,
};
use crate::error::{QaoaError, QaoaResult};
use crate::objective::{linear_objective, quadratic_objective, walk_objective};
use crate::problems::{KnapsackProblem, Rational, a_min, b_min};

/// An encoding of the knapsack problem into an ansatz and an objective.
pub trait Strategy: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Number of phase/mixer layer pairs `p`.
    fn layers(&self) -> usize;

    /// Assemble the parameterized circuit for `problem`.
    fn build(&self, problem: &KnapsackProblem) -> QaoaResult<Ansatz>;

    /// Values of the non-variational symbols (penalty factors).
    fn fixed_bindings(&self) -> ParameterBindings;

    /// Objective maximized by the optimizer, over full-circuit outcomes.
    fn objective(&self, problem: &KnapsackProblem, outcome: usize) -> f64;
}

fn check_layers(layers: usize) -> QaoaResult<()> {
    if layers == 0 {
        return Err(QaoaError::InvalidLayers(layers));
    }
    Ok(())
}

/// Value dephasing with a penalty linear in the excess weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStrategy {
    layers: usize,
    a: Rational,
}

impl LinearStrategy {
    /// Create a strategy with `p` layers and penalty factor `a`.
    pub fn new(layers: usize, a: Rational) -> QaoaResult<Self> {
        check_layers(layers)?;
        Ok(Self { layers, a })
    }

    /// Penalty factor given as a float; approximated by a rational.
    pub fn with_penalty(layers: usize, a: f64) -> QaoaResult<Self> {
        Self::new(layers, Rational::from_f64(a)?)
    }

    /// Use the smallest effective penalty for `problem`.
    pub fn with_minimal_penalty(problem: &KnapsackProblem, layers: usize) -> QaoaResult<Self> {
        Self::new(layers, a_min(problem))
    }

    /// The penalty factor.
    pub fn a(&self) -> Rational {
        self.a
    }
}

impl Strategy for LinearStrategy {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn layers(&self) -> usize {
        self.layers
    }

    fn build(&self, problem: &KnapsackProblem) -> QaoaResult<Ansatz> {
        linear_ansatz(problem, self.layers, self.a)
    }

    fn fixed_bindings(&self) -> ParameterBindings {
        ParameterBindings::new().with(PENALTY_A, self.a.to_f64())
    }

    fn objective(&self, problem: &KnapsackProblem, outcome: usize) -> f64 {
        linear_objective(problem, self.a.to_f64(), outcome)
    }
}

/// Algebraic quadratic penalty over a one-hot weight register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticStrategy {
    layers: usize,
    a: Rational,
    b: Rational,
}

impl QuadraticStrategy {
    /// Create a strategy with `p` layers, value factor `a` and constraint
    /// factor `b`.
    pub fn new(layers: usize, a: Rational, b: Rational) -> QaoaResult<Self> {
        check_layers(layers)?;
        Ok(Self { layers, a, b })
    }

    /// Factors given as floats; approximated by rationals.
    pub fn with_penalties(layers: usize, a: f64, b: f64) -> QaoaResult<Self> {
        Self::new(layers, Rational::from_f64(a)?, Rational::from_f64(b)?)
    }

    /// `a = 1` and the smallest effective `b` for `problem`.
    pub fn with_minimal_penalty(problem: &KnapsackProblem, layers: usize) -> QaoaResult<Self> {
        let a = Rational::from_integer(1);
        Self::new(layers, a, b_min(a, problem))
    }

    /// The value factor.
    pub fn a(&self) -> Rational {
        self.a
    }

    /// The constraint factor.
    pub fn b(&self) -> Rational {
        self.b
    }
}

impl Strategy for QuadraticStrategy {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn layers(&self) -> usize {
        self.layers
    }

    fn build(&self, problem: &KnapsackProblem) -> QaoaResult<Ansatz> {
        quadratic_ansatz(problem, self.layers, self.a, self.b)
    }

    fn fixed_bindings(&self) -> ParameterBindings {
        ParameterBindings::new()
            .with(PENALTY_A, self.a.to_f64())
            .with(PENALTY_B, self.b.to_f64())
    }

    fn objective(&self, problem: &KnapsackProblem, outcome: usize) -> f64 {
        quadratic_objective(problem, self.a.to_f64(), self.b.to_f64(), outcome)
    }
}

/// Value dephasing with a feasibility-preserving walk mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantumWalkStrategy {
    layers: usize,
    trotter_steps: usize,
}

impl QuantumWalkStrategy {
    /// Create a strategy with `p` layers and `m` Trotter steps per mixer.
    pub fn new(layers: usize, trotter_steps: usize) -> QaoaResult<Self> {
        check_layers(layers)?;
        if trotter_steps == 0 {
            return Err(QaoaError::InvalidTrotterCount(trotter_steps));
        }
        Ok(Self {
            layers,
            trotter_steps,
        })
    }

    /// The Trotter count `m`.
    pub fn trotter_steps(&self) -> usize {
        self.trotter_steps
    }
}

impl Strategy for QuantumWalkStrategy {
    fn name(&self) -> &'static str {
        "quantum_walk"
    }

    fn layers(&self) -> usize {
        self.layers
    }

    fn build(&self, problem: &KnapsackProblem) -> QaoaResult<Ansatz> {
        quantum_walk_ansatz(problem, self.layers, self.trotter_steps)
    }

    fn fixed_bindings(&self) -> ParameterBindings {
        ParameterBindings::new()
    }

    fn objective(&self, problem: &KnapsackProblem, outcome: usize) -> f64 {
        walk_objective(problem, outcome)
    }
}
