//! Tests for statevector evolution and probability extraction.

use proptest::prelude::*;
use qkp_ir::{Circuit, ParameterBindings, ParameterExpression, QubitId};
use qkp_sim::{Backend, ProbabilityDistribution, SimulationContext, StatevectorBackend};

// ---------------------------------------------------------------------------
// Inversion
// ---------------------------------------------------------------------------

#[test]
fn circuit_then_inverse_is_identity() {
    let mut circuit = Circuit::with_size("mixed", 3);
    circuit.h(QubitId(0)).unwrap();
    circuit.cp(0.4, QubitId(0), QubitId(2)).unwrap();
    circuit.crx(1.1, QubitId(2), QubitId(1)).unwrap();
    circuit.rzz(-0.8, QubitId(1), QubitId(0)).unwrap();
    circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
    circuit.rz(0.3, QubitId(2)).unwrap();

    let inverse = circuit.inverse().unwrap();
    circuit
        .append(
            &inverse,
            &[QubitId(0), QubitId(1), QubitId(2)],
            &Default::default(),
        )
        .unwrap();

    let state = StatevectorBackend::new().run(&circuit).unwrap();
    assert!((state.amplitude(0).re - 1.0).abs() < 1e-10);
    assert!(state.amplitude(0).im.abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

#[test]
fn measurement_does_not_change_probabilities() {
    let mut circuit = Circuit::with_size("h", 1);
    circuit.h(QubitId(0)).unwrap();
    let before = StatevectorBackend::new().probabilities(&circuit, None).unwrap();
    circuit.measure_all().unwrap();
    let after = StatevectorBackend::new().probabilities(&circuit, None).unwrap();
    assert_eq!(before, after);
}

#[test]
fn bitstring_view_is_qubit_zero_first() {
    let mut circuit = Circuit::with_size("x", 3);
    circuit.x(QubitId(0)).unwrap();
    let dist = StatevectorBackend::new().probabilities(&circuit, None).unwrap();
    let bits = dist.to_bitstrings();
    assert_eq!(bits.len(), 1);
    assert!((bits["100"] - 1.0).abs() < 1e-12);
}

fn arb_rotation_circuit() -> impl Strategy<Value = (Circuit, f64, f64)> {
    (1_u32..=5, -6.0_f64..6.0, -6.0_f64..6.0).prop_map(|(n, gamma, beta)| {
        let mut circuit = Circuit::with_size("layer", n);
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
        }
        for q in 0..n {
            circuit
                .rz(ParameterExpression::symbol("gamma0").scaled(f64::from(q + 1)), QubitId(q))
                .unwrap();
        }
        for q in 1..n {
            circuit
                .rzz(ParameterExpression::symbol("gamma0"), QubitId(q - 1), QubitId(q))
                .unwrap();
        }
        for q in 0..n {
            circuit
                .rx(ParameterExpression::symbol("beta0").scaled(2.0), QubitId(q))
                .unwrap();
        }
        (circuit, gamma, beta)
    })
}

proptest! {
    #[test]
    fn probabilities_are_normalized((circuit, gamma, beta) in arb_rotation_circuit()) {
        let ctx = SimulationContext::default();
        let bindings = ParameterBindings::new().with("gamma0", gamma).with("beta0", beta);
        let dist: ProbabilityDistribution = ctx.probabilities(&circuit, &bindings, None).unwrap();
        prop_assert!(dist.iter().all(|(_, p)| p >= 0.0));
        prop_assert!((dist.total() - 1.0).abs() < 1e-9);

        let state = ctx.simulate(&circuit, &bindings).unwrap();
        prop_assert!((state.norm() - 1.0).abs() < 1e-9);
    }
}
