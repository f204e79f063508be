//! Alternating-operator ansätze for the three knapsack encodings.
//!
//! Each assembler prepares its initial state, then applies
//! `phase(gamma_k)` followed by `mixer(beta_k)` for `k = 0..p`, and ends
//! with a measurement of every qubit. The choice register always occupies
//! qubits `0..N`.

use std::f64::consts::PI;

use qkp_ir::{Circuit, ParameterExpression, ParameterMap, QubitId, Register, RegisterRole};
use tracing::debug;

use super::mixer::{default_mixer, quantum_walk_mixer};
use super::oracle::oracle_width;
use super::phase::{linear_phase, quadratic_phase, value_phase};
use super::{
    BETA, CHOICE, FLAG, FLAG_BOTH, FLAG_NEIGHBOR, GAMMA, WEIGHT, beta_name, gamma_name, one_hot_width,
    qubit_map,
};
use crate::error::{QaoaError, QaoaResult};
use crate::problems::{KnapsackProblem, Rational, linear_gamma_period, quadratic_gamma_period};

/// A parameterized ansatz circuit with its angle domain.
#[derive(Debug, Clone)]
pub struct Ansatz {
    circuit: Circuit,
    layers: usize,
    gamma_range: (f64, f64),
    beta_range: (f64, f64),
}

impl Ansatz {
    /// The circuit, with symbols `gamma{k}`, `beta{k}` and any penalty factors.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of phase/mixer layer pairs.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Angle names in optimizer order: `gamma0, beta0, gamma1, beta1, ...`.
    pub fn angle_names(&self) -> Vec<String> {
        (0..self.layers)
            .flat_map(|k| [gamma_name(k), beta_name(k)])
            .collect()
    }

    /// Number of variational angles, `2p`.
    pub fn num_angles(&self) -> usize {
        2 * self.layers
    }

    /// Domain of every `gamma_k`.
    pub fn gamma_range(&self) -> (f64, f64) {
        self.gamma_range
    }

    /// Domain of every `beta_k`.
    pub fn beta_range(&self) -> (f64, f64) {
        self.beta_range
    }

    /// The choice register.
    pub fn choice_register(&self) -> Option<&Register> {
        self.circuit.register(CHOICE)
    }
}

fn check_layers(p: usize) -> QaoaResult<()> {
    if p == 0 {
        return Err(QaoaError::InvalidLayers(p));
    }
    Ok(())
}

/// Append `p` alternating layers, renaming the local angles per layer.
fn alternate(
    circuit: &mut Circuit,
    p: usize,
    phase: (&Circuit, &[QubitId]),
    mixer: (&Circuit, &[QubitId]),
) -> QaoaResult<()> {
    for k in 0..p {
        let gamma = ParameterMap::new().map(GAMMA, ParameterExpression::symbol(gamma_name(k)));
        let beta = ParameterMap::new().map(BETA, ParameterExpression::symbol(beta_name(k)));
        circuit.append(phase.0, phase.1, &gamma)?;
        circuit.append(mixer.0, mixer.1, &beta)?;
    }
    circuit.measure_all()?;
    Ok(())
}

fn finish(
    strategy: &'static str,
    circuit: Circuit,
    p: usize,
    gamma_range: (f64, f64),
    beta_range: (f64, f64),
) -> Ansatz {
    debug!(
        strategy,
        qubits = circuit.num_qubits(),
        instructions = circuit.instructions().len(),
        parameters = ?circuit.parameters(),
        "Assembled ansatz"
    );
    Ansatz {
        circuit,
        layers: p,
        gamma_range,
        beta_range,
    }
}

/// Linear-penalty ansatz over `choice`, `weight` and `flag`.
///
/// Starts from the uniform superposition of choices; the mixer acts on the
/// choice register only.
pub fn linear_ansatz(problem: &KnapsackProblem, p: usize, a: Rational) -> QaoaResult<Ansatz> {
    check_layers(p)?;
    let n = problem.num_items() as u32;
    let width = oracle_width(problem);

    let mut circuit = Circuit::new("linear_qaoa");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, n);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag = circuit.add_register(FLAG, RegisterRole::Flag, 1);
    for q in choice.qubits() {
        circuit.h(q)?;
    }

    let phase = linear_phase(problem, width)?;
    let mixer = default_mixer(n)?;
    let all = qubit_map(&[&choice, &weight, &flag]);
    alternate(&mut circuit, p, (&phase, &all), (&mixer, &choice.qubits()))?;

    Ok(finish("linear", circuit, p, (0.0, linear_gamma_period(a)), (0.0, PI)))
}

/// Quadratic-penalty ansatz over `choice` and a one-hot `weight` register
/// of `max_weight` qubits.
///
/// Both registers start in uniform superposition and are mixed.
pub fn quadratic_ansatz(
    problem: &KnapsackProblem,
    p: usize,
    a: Rational,
    b: Rational,
) -> QaoaResult<Ansatz> {
    check_layers(p)?;
    let period = quadratic_gamma_period(a, b)?;
    let n = problem.num_items() as u32;
    let w_max = one_hot_width(problem)?;

    let mut circuit = Circuit::new("quadratic_qaoa");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, n);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, w_max);
    let all = qubit_map(&[&choice, &weight]);
    for &q in &all {
        circuit.h(q)?;
    }

    let phase = quadratic_phase(problem)?;
    let mixer = default_mixer(n + w_max)?;
    alternate(&mut circuit, p, (&phase, &all), (&mixer, &all))?;

    Ok(finish("quadratic", circuit, p, (0.0, period), (0.0, PI)))
}

/// Quantum-walk ansatz: value phase and a feasibility-preserving walk mixer
/// with `m` Trotter steps.
///
/// Starts from the empty choice, which is always feasible.
pub fn quantum_walk_ansatz(problem: &KnapsackProblem, p: usize, m: usize) -> QaoaResult<Ansatz> {
    check_layers(p)?;
    let n = problem.num_items() as u32;
    let width = oracle_width(problem);

    let mut circuit = Circuit::new("quantum_walk_qaoa");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, n);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag = circuit.add_register(FLAG, RegisterRole::Flag, 1);
    let neighbor = circuit.add_register(FLAG_NEIGHBOR, RegisterRole::FlagNeighbor, 1);
    let both = circuit.add_register(FLAG_BOTH, RegisterRole::FlagBoth, 1);

    let phase = value_phase(problem)?;
    let mixer = quantum_walk_mixer(problem, width, m)?;
    let all = qubit_map(&[&choice, &weight, &flag, &neighbor, &both]);
    alternate(&mut circuit, p, (&phase, &choice.qubits()), (&mixer, &all))?;

    Ok(finish("quantum_walk", circuit, p, (0.0, 2.0 * PI), (0.0, m as f64 * PI)))
}
