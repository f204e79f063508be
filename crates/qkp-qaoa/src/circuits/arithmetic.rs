//! Fourier-domain integer arithmetic.
//!
//! A register of `width` qubits stores an integer with qubit `i` as bit `i`.
//! [`transform`] moves it into the phase basis, where adding a classical
//! constant is a layer of single-qubit phases ([`shift`]). Sums wrap modulo
//! `2^width`.

use std::f64::consts::PI;

use qkp_ir::{Circuit, ParameterMap, RegisterRole};

use super::{CHOICE, CONTROL, WEIGHT, qubit_map};
use crate::error::QaoaResult;
use crate::problems::KnapsackProblem;

/// Fourier basis change over a `width`-qubit register (no swaps).
///
/// Afterwards qubit `i` carries the phase `2π·x / 2^(i+1)`.
pub fn transform(width: u32) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new("transform");
    let register = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    for idx in (0..width).rev() {
        let target = register.qubit(idx)?;
        circuit.h(target)?;
        for c_idx in (0..idx).rev() {
            let angle = 2.0 * PI / 2f64.powi((idx - c_idx + 1) as i32);
            circuit.cp(angle, target, register.qubit(c_idx)?)?;
        }
    }
    Ok(circuit)
}

/// Inverse of [`transform`].
pub fn inverse_transform(width: u32) -> QaoaResult<Circuit> {
    Ok(transform(width)?.inverse()?)
}

/// Add the constant `n` to a register already in the Fourier basis.
///
/// With `controlled`, the circuit gains a one-qubit `control` register
/// (after the target register) and the addition happens only when it is
/// |1⟩. Bit `k` of `n` only rotates qubits of significance above `k`.
pub fn shift(width: u32, n: u64, controlled: bool) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new(format!("shift_{n}"));
    let register = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let control = if controlled {
        Some(circuit.add_register(CONTROL, RegisterRole::Control, 1).qubit(0)?)
    } else {
        None
    };

    for k in (0..64u32).filter(|k| n >> k & 1 == 1) {
        for idx in 0..width {
            let l = idx + 1;
            if l <= k {
                continue;
            }
            let angle = 2.0 * PI / 2f64.powi((l - k) as i32);
            let target = register.qubit(idx)?;
            match control {
                Some(c) => circuit.cp(angle, c, target)?,
                None => circuit.p(angle, target)?,
            };
        }
    }
    Ok(circuit)
}

/// Add `Σ weights[i]·choice[i]` to the weight register.
///
/// Registers are `choice` (one qubit per weight) then `weight` (`width`
/// qubits). The result is left in the Fourier basis; apply
/// [`inverse_transform`] to read it.
pub fn accumulate(weights: &[u64], width: u32) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new("accumulate");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, weights.len() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);

    circuit.append(&transform(width)?, &weight.qubits(), &ParameterMap::new())?;
    for (i, &w) in weights.iter().enumerate() {
        let mut map = weight.qubits();
        map.push(choice.qubit(i as u32)?);
        circuit.append(&shift(width, w, true)?, &map, &ParameterMap::new())?;
    }
    Ok(circuit)
}

/// Compute the total weight of the choice register into a `width`-qubit
/// weight register, in the computational basis.
pub fn weight_calculator(problem: &KnapsackProblem, width: u32) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new("weight_calculator");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let map = qubit_map(&[&choice, &weight]);

    circuit.append(&accumulate(problem.weights(), width)?, &map, &ParameterMap::new())?;
    circuit.append(&inverse_transform(width)?, &weight.qubits(), &ParameterMap::new())?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::prepare_basis;
    use qkp_ir::QubitId;
    use qkp_sim::{Backend, StatevectorBackend};

    fn probability_of(circuit: &Circuit, index: usize) -> f64 {
        let state = StatevectorBackend::new().run(circuit).unwrap();
        state.probabilities()[index]
    }

    #[test]
    fn test_transform_shape() {
        let circuit = transform(3).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        // 3 Hadamards and 3 controlled phases
        assert_eq!(circuit.gate_count(), 6);
        assert!(!circuit.is_parameterized());
    }

    #[test]
    fn test_adder_with_controlled_shift() {
        let mut circuit = Circuit::new("adder");
        let register = circuit.add_register("register", RegisterRole::Weight, 5);
        let control = circuit.add_register(CONTROL, RegisterRole::Control, 1);
        let none = ParameterMap::new();
        let mut controlled = register.qubits();
        controlled.push(control.qubit(0).unwrap());

        circuit.x(control.qubit(0).unwrap()).unwrap();
        circuit.append(&transform(5).unwrap(), &register.qubits(), &none).unwrap();
        circuit.append(&shift(5, 5, false).unwrap(), &register.qubits(), &none).unwrap();
        circuit.append(&shift(5, 6, true).unwrap(), &controlled, &none).unwrap();
        circuit
            .append(&inverse_transform(5).unwrap(), &register.qubits(), &none)
            .unwrap();

        // 11 in the register, control bit (qubit 5) still set
        assert!((probability_of(&circuit, 11 + 32) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_uncontrolled_shift_wraps() {
        let mut circuit = Circuit::with_size("wrap", 3);
        let qubits: Vec<_> = (0..3).map(QubitId).collect();
        let none = ParameterMap::new();
        prepare_basis(&mut circuit, &qubits, 6);
        circuit.append(&transform(3).unwrap(), &qubits, &none).unwrap();
        circuit.append(&shift(3, 3, false).unwrap(), &qubits, &none).unwrap();
        circuit.append(&inverse_transform(3).unwrap(), &qubits, &none).unwrap();
        assert!((probability_of(&circuit, 1) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_weight_calculator() {
        let problem = KnapsackProblem::new(vec![1, 2, 3], vec![1, 2, 3], 2).unwrap();
        for choice in 0..8usize {
            let mut circuit = Circuit::new("weights");
            let reg = circuit.add_register(CHOICE, RegisterRole::Choice, 3);
            let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, 3);
            prepare_basis(&mut circuit, &reg.qubits(), choice);
            let map = qubit_map(&[&reg, &weight]);
            circuit
                .append(&weight_calculator(&problem, 3).unwrap(), &map, &ParameterMap::new())
                .unwrap();

            let expected = choice | (problem.weight(choice) as usize) << 3;
            assert!(
                (probability_of(&circuit, expected) - 1.0).abs() < 1e-10,
                "choice {choice:03b}"
            );
        }
    }
}
