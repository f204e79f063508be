//! Feasibility oracle.
//!
//! The oracle adds `weight(x) + w0` into a weight register, where
//! `w0 = 2^c − max_weight − 1` and `c` is the bit length of `max_weight`.
//! A choice is feasible exactly when no bit at position `c` or above is set,
//! so a multi-controlled X on the negated high bits toggles the flag for
//! feasible choices. A flag starting in |0⟩ therefore ends in |1⟩ for
//! feasible choices; a flag pre-set to |1⟩ ends in |1⟩ for infeasible ones.

use qkp_ir::{Circuit, ParameterMap, RegisterRole};

use super::arithmetic::{accumulate, inverse_transform, shift};
use super::{CHOICE, FLAG, WEIGHT, qubit_map};
use crate::error::{QaoaError, QaoaResult};
use crate::problems::KnapsackProblem;

/// Register sizing of the feasibility oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleLayout {
    /// Bit length of `max_weight`; bits from here up mark infeasibility.
    pub c: u32,
    /// Offset added to every weight.
    pub w0: u64,
    /// Smallest weight register that never wraps.
    pub width: u32,
}

/// Number of bits needed to write `x`; `bit_length(0) == 0`.
pub fn bit_length(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

fn low_bits(c: u32) -> u64 {
    if c == 0 { 0 } else { u64::MAX >> (u64::BITS - c) }
}

/// Sizing for `problem`.
///
/// The register must hold `total_weight + w0` without wrapping and must
/// have at least one bit at position `c`.
pub fn oracle_layout(problem: &KnapsackProblem) -> OracleLayout {
    let c = bit_length(problem.max_weight());
    let w0 = low_bits(c) - problem.max_weight();
    let width = bit_length(problem.total_weight() + w0).max(c + 1);
    OracleLayout { c, w0, width }
}

/// Weight register width every ansatz allocates for `problem`.
pub fn oracle_width(problem: &KnapsackProblem) -> u32 {
    oracle_layout(problem).width
}

/// `weight += weight(choice) + w0`, read out in the computational basis.
fn offset_weight(problem: &KnapsackProblem, w0: u64, width: u32) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new("offset_weight");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let none = ParameterMap::new();

    circuit.append(&accumulate(problem.weights(), width)?, &qubit_map(&[&choice, &weight]), &none)?;
    circuit.append(&shift(width, w0, false)?, &weight.qubits(), &none)?;
    circuit.append(&inverse_transform(width)?, &weight.qubits(), &none)?;
    Ok(circuit)
}

/// Build the feasibility oracle over registers `choice`, `weight` (`width`
/// qubits) and `flag`.
///
/// With `clean_up` the weight register is uncomputed back to |0⟩. Without
/// it the register is left holding `weight(choice) + w0` and the caller
/// owns the uncompute, usually by appending this circuit's inverse.
pub fn feasibility_oracle(
    problem: &KnapsackProblem,
    width: u32,
    clean_up: bool,
) -> QaoaResult<Circuit> {
    let layout = oracle_layout(problem);
    if width < layout.width {
        return Err(QaoaError::RegisterTooNarrow {
            required: layout.width,
            actual: width,
        });
    }

    let mut circuit = Circuit::new(if clean_up { "oracle" } else { "oracle_dirty" });
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag = circuit.add_register(FLAG, RegisterRole::Flag, 1).qubit(0)?;
    let none = ParameterMap::new();
    let map = qubit_map(&[&choice, &weight]);

    let compute = offset_weight(problem, layout.w0, width)?;
    circuit.append(&compute, &map, &none)?;

    let high: Vec<_> = weight.qubits()[layout.c as usize..].to_vec();
    for &q in &high {
        circuit.x(q)?;
    }
    circuit.mcx(&high, flag)?;
    for &q in &high {
        circuit.x(q)?;
    }

    if clean_up {
        circuit.append(&compute.inverse()?, &map, &none)?;
    }
    Ok(circuit)
}
