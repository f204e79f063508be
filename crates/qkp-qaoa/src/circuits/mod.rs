//! Circuit builders for the knapsack ansätze.
//!
//! Every builder returns a standalone [`Circuit`](qkp_ir::Circuit) over its
//! own named registers and local angle symbols. Larger circuits embed them
//! with [`Circuit::append`](qkp_ir::Circuit::append), mapping qubits by
//! register and renaming angles through a [`ParameterMap`](qkp_ir::ParameterMap).

pub mod ansatz;
pub mod arithmetic;
pub mod mixer;
pub mod oracle;
pub mod phase;

use qkp_ir::{QubitId, Register};

use crate::error::{QaoaError, QaoaResult};
use crate::problems::KnapsackProblem;

pub use ansatz::{Ansatz, linear_ansatz, quadratic_ansatz, quantum_walk_ansatz};
pub use arithmetic::{accumulate, inverse_transform, shift, transform, weight_calculator};
pub use mixer::{default_mixer, quantum_walk_mixer, single_qubit_walk};
pub use oracle::{OracleLayout, bit_length, feasibility_oracle, oracle_layout, oracle_width};
pub use phase::{linear_phase, quadratic_phase, value_phase};

/// Local angle of phase-separation layers.
pub const GAMMA: &str = "gamma";
/// Local angle of mixing layers.
pub const BETA: &str = "beta";
/// Linear penalty factor.
pub const PENALTY_A: &str = "a";
/// Quadratic constraint factor.
pub const PENALTY_B: &str = "b";

/// Register holding one qubit per item.
pub const CHOICE: &str = "choice";
/// Register holding a weight (binary or one-hot).
pub const WEIGHT: &str = "weight";
/// Feasibility flag of the current choice.
pub const FLAG: &str = "flag";
/// Feasibility flag of a neighboring choice.
pub const FLAG_NEIGHBOR: &str = "flag_neighbor";
/// AND of both feasibility flags.
pub const FLAG_BOTH: &str = "flag_both";
/// Control qubit of a controlled shift.
pub const CONTROL: &str = "control";

/// Angle symbol of phase layer `k`.
pub fn gamma_name(k: usize) -> String {
    format!("{GAMMA}{k}")
}

/// Angle symbol of mixing layer `k`.
pub fn beta_name(k: usize) -> String {
    format!("{BETA}{k}")
}

/// Qubits of the one-hot weight register, one per weight `1..=max_weight`.
pub fn one_hot_width(problem: &KnapsackProblem) -> QaoaResult<u32> {
    u32::try_from(problem.max_weight()).map_err(|_| {
        QaoaError::MalformedProblem(format!(
            "capacity {} needs more one-hot weight qubits than a circuit can address",
            problem.max_weight()
        ))
    })
}

/// Concatenate the qubits of `registers` into an embedding map.
pub(crate) fn qubit_map(registers: &[&Register]) -> Vec<QubitId> {
    registers.iter().flat_map(|r| r.qubits()).collect()
}

/// Prepare `value` in the computational basis of `qubits`.
#[cfg(test)]
pub(crate) fn prepare_basis(circuit: &mut qkp_ir::Circuit, qubits: &[QubitId], value: usize) {
    for (k, &q) in qubits.iter().enumerate() {
        if value >> k & 1 == 1 {
            circuit.x(q).unwrap();
        }
    }
}
