//! Amplitude-level tests of the knapsack circuit builders.

use num_complex::Complex64;
use proptest::prelude::*;
use qkp_ir::{Circuit, ParameterBindings, ParameterMap, QubitId, RegisterRole};
use qkp_qaoa::KnapsackProblem;
use qkp_qaoa::circuits::{
    CHOICE, FLAG, WEIGHT, inverse_transform, linear_phase, oracle_width, quadratic_phase,
    quantum_walk_ansatz, transform,
};
use qkp_qaoa::objective::quadratic_objective;
use qkp_sim::{Backend, SimulationContext, StatevectorBackend};

fn qubits(n: u32) -> Vec<QubitId> {
    (0..n).map(QubitId).collect()
}

// ---------------------------------------------------------------------------
// Fourier transform
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transform_then_inverse_is_identity(
        angles in prop::collection::vec(-3.2f64..3.2, 1..6),
    ) {
        let width = angles.len() as u32;
        let mut prepared = Circuit::with_size("prepared", width);
        for (q, &theta) in angles.iter().enumerate() {
            prepared.rx(theta, QubitId(q as u32)).unwrap();
        }

        let mut round_trip = prepared.clone();
        let none = ParameterMap::new();
        round_trip.append(&transform(width).unwrap(), &qubits(width), &none).unwrap();
        round_trip.append(&inverse_transform(width).unwrap(), &qubits(width), &none).unwrap();

        let backend = StatevectorBackend::new();
        let expected = backend.run(&prepared).unwrap();
        let actual = backend.run(&round_trip).unwrap();
        for (a, b) in expected.amplitudes().iter().zip(actual.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// Phase separation
// ---------------------------------------------------------------------------

#[test]
fn linear_phase_penalizes_excess_weight() {
    let problem = KnapsackProblem::toy("E").unwrap();
    let n = problem.num_items() as u32;
    let width = oracle_width(&problem);
    let (gamma, a) = (0.37, 1.5);

    let mut circuit = Circuit::new("host");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, n);
    circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    circuit.add_register(FLAG, RegisterRole::Flag, 1);
    for q in choice.qubits() {
        circuit.h(q).unwrap();
    }
    let all = qubits(circuit.num_qubits() as u32);
    circuit
        .append(&linear_phase(&problem, width).unwrap(), &all, &ParameterMap::new())
        .unwrap();

    let bindings = ParameterBindings::new().with("gamma", gamma).with("a", a);
    let state = SimulationContext::default().simulate(&circuit, &bindings).unwrap();
    let scale = 1.0 / f64::from(1u32 << n).sqrt();
    for x in 0..problem.num_choices() {
        let value = problem.value(x) as f64;
        let weight = problem.weight(x) as f64;
        let mut phase = -gamma * value;
        if !problem.is_feasible(x) {
            phase += a * gamma * (weight - problem.max_weight() as f64 - 1.0);
        }
        let expected = Complex64::from_polar(scale, phase);
        // ancillas return to |0⟩, so choice x lives at index x
        assert!(
            (state.amplitude(x) - expected).norm() < 1e-9,
            "choice {x:03b}: {} vs {expected}",
            state.amplitude(x)
        );
    }
    assert!((state.norm() - 1.0).abs() < 1e-9);
}

#[test]
fn quadratic_phase_matches_objective() {
    let problem = KnapsackProblem::toy("E").unwrap();
    let n = problem.num_items() as u32 + problem.max_weight() as u32;
    let (gamma, a, b) = (0.29, 0.5, 1.25);

    let mut circuit = Circuit::with_size("host", n);
    for q in qubits(n) {
        circuit.h(q).unwrap();
    }
    circuit
        .append(&quadratic_phase(&problem).unwrap(), &qubits(n), &ParameterMap::new())
        .unwrap();

    let bindings = ParameterBindings::new()
        .with("gamma", gamma)
        .with("a", a)
        .with("b", b);
    let state = SimulationContext::default().simulate(&circuit, &bindings).unwrap();
    let reference = state.amplitude(0);
    let f0 = quadratic_objective(&problem, a, b, 0);
    for z in 1..(1usize << n) {
        let relative = state.amplitude(z) / reference;
        let df = quadratic_objective(&problem, a, b, z) - f0;
        let expected = Complex64::from_polar(1.0, -gamma * df);
        assert!((relative - expected).norm() < 1e-8, "outcome {z:06b}");
    }
}

// ---------------------------------------------------------------------------
// Quantum walk
// ---------------------------------------------------------------------------

#[test]
fn walk_ansatz_never_leaves_feasible_subspace() {
    let problem = KnapsackProblem::toy("E").unwrap();
    let ansatz = quantum_walk_ansatz(&problem, 2, 2).unwrap();
    let bindings: ParameterBindings = ansatz
        .angle_names()
        .into_iter()
        .zip([0.8, 1.9, 2.3, 0.6])
        .collect();

    let dist = SimulationContext::default()
        .probabilities(ansatz.circuit(), &bindings, None)
        .unwrap();
    let n = problem.num_items();
    for (outcome, p) in dist.iter() {
        assert_eq!(outcome >> n, 0, "ancillas must be clean (p = {p})");
        assert!(problem.is_feasible(outcome), "infeasible choice {outcome:03b}");
    }
    assert!((dist.total() - 1.0).abs() < 1e-9);
    // the mixer actually moved amplitude away from the empty choice
    assert!(dist.probability(0) < 1.0 - 1e-6);
}

#[test]
fn unbound_and_unknown_parameters_fail_before_simulation() {
    let problem = KnapsackProblem::toy("A").unwrap();
    let ansatz = qkp_qaoa::circuits::linear_ansatz(&problem, 1, qkp_qaoa::Rational::from_integer(2))
        .unwrap();
    let ctx = SimulationContext::default();

    let missing = ParameterBindings::new().with("gamma0", 0.1).with("beta0", 0.2);
    let err = ctx.probabilities(ansatz.circuit(), &missing, None).unwrap_err();
    assert!(matches!(
        err,
        qkp_sim::SimError::Ir(qkp_ir::IrError::UnboundParameter(ref name)) if name == "a"
    ));

    let extra = missing.clone().with("a", 2.0).with("c", 1.0);
    let err = ctx.probabilities(ansatz.circuit(), &extra, None).unwrap_err();
    assert!(matches!(
        err,
        qkp_sim::SimError::Ir(qkp_ir::IrError::UnknownParameter(ref name)) if name == "c"
    ));
}
