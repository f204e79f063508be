//! Mixing layers.

use qkp_ir::{Circuit, ParameterExpression, ParameterMap, QubitId, RegisterRole};

use super::oracle::feasibility_oracle;
use super::{BETA, CHOICE, FLAG, FLAG_BOTH, FLAG_NEIGHBOR, WEIGHT, qubit_map};
use crate::error::{QaoaError, QaoaResult};
use crate::problems::KnapsackProblem;

/// `Rx(2β)` on each of `num_qubits` qubits.
pub fn default_mixer(num_qubits: u32) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::with_size("default_mixer", num_qubits);
    for q in 0..num_qubits {
        circuit.rx(ParameterExpression::symbol(BETA).scaled(2.0), QubitId(q))?;
    }
    Ok(circuit)
}

/// Rotate choice bit `j` by `Rx(2β)` only where both the current choice and
/// its neighbor with bit `j` flipped are feasible.
///
/// Registers are `choice`, `weight` (`width` qubits), `flag`,
/// `flag_neighbor` and `flag_both`; every register except `choice` starts
/// and ends in |0⟩.
pub fn single_qubit_walk(problem: &KnapsackProblem, width: u32, j: u32) -> QaoaResult<Circuit> {
    let oracle = feasibility_oracle(problem, width, true)?;
    let oracle_dg = oracle.inverse()?;

    let mut circuit = Circuit::new(format!("walk_{j}"));
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag = circuit.add_register(FLAG, RegisterRole::Flag, 1);
    let neighbor = circuit.add_register(FLAG_NEIGHBOR, RegisterRole::FlagNeighbor, 1);
    let both = circuit.add_register(FLAG_BOTH, RegisterRole::FlagBoth, 1);

    let bit = choice.qubit(j)?;
    let (own, other, joint) = (flag.qubit(0)?, neighbor.qubit(0)?, both.qubit(0)?);
    let own_map = qubit_map(&[&choice, &weight, &flag]);
    let neighbor_map = qubit_map(&[&choice, &weight, &neighbor]);
    let none = ParameterMap::new();

    circuit.append(&oracle, &own_map, &none)?;
    circuit.x(bit)?;
    circuit.append(&oracle, &neighbor_map, &none)?;
    circuit.x(bit)?;
    circuit.ccx(own, other, joint)?;

    circuit.crx(ParameterExpression::symbol(BETA).scaled(2.0), joint, bit)?;

    circuit.ccx(own, other, joint)?;
    circuit.x(bit)?;
    circuit.append(&oracle_dg, &neighbor_map, &none)?;
    circuit.x(bit)?;
    circuit.append(&oracle_dg, &own_map, &none)?;
    Ok(circuit)
}

/// `m` Trotter rounds of [`single_qubit_walk`] over every choice bit, each
/// with angle `β/m`.
pub fn quantum_walk_mixer(problem: &KnapsackProblem, width: u32, m: usize) -> QaoaResult<Circuit> {
    if m == 0 {
        return Err(QaoaError::InvalidTrotterCount(m));
    }
    let walks = (0..problem.num_items() as u32)
        .map(|j| single_qubit_walk(problem, width, j))
        .collect::<QaoaResult<Vec<_>>>()?;

    let mut circuit = Circuit::new("quantum_walk_mixer");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag = circuit.add_register(FLAG, RegisterRole::Flag, 1);
    let neighbor = circuit.add_register(FLAG_NEIGHBOR, RegisterRole::FlagNeighbor, 1);
    let both = circuit.add_register(FLAG_BOTH, RegisterRole::FlagBoth, 1);
    let map = qubit_map(&[&choice, &weight, &flag, &neighbor, &both]);
    let step = ParameterExpression::symbol(BETA).scaled(1.0 / m as f64);
    let trotter = ParameterMap::new().map(BETA, step);

    for _ in 0..m {
        for walk in &walks {
            circuit.append(walk, &map, &trotter)?;
        }
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::oracle_width;
    use qkp_ir::ParameterBindings;
    use qkp_sim::SimulationContext;

    #[test]
    fn test_default_mixer() {
        let circuit = default_mixer(4).unwrap();
        assert_eq!(circuit.gate_count(), 4);
        assert_eq!(circuit.parameters(), [BETA.to_string()]);
    }

    #[test]
    fn test_zero_trotter_count() {
        let problem = KnapsackProblem::toy("A").unwrap();
        let err = quantum_walk_mixer(&problem, oracle_width(&problem), 0).unwrap_err();
        assert!(matches!(err, QaoaError::InvalidTrotterCount(0)));
    }

    #[test]
    fn test_walk_stays_feasible() {
        let problem = KnapsackProblem::toy("A").unwrap();
        let width = oracle_width(&problem);
        let circuit = quantum_walk_mixer(&problem, width, 2).unwrap();
        let dist = SimulationContext::default()
            .probabilities(&circuit, &ParameterBindings::new().with(BETA, 0.7), None)
            .unwrap();

        assert!((dist.total() - 1.0).abs() < 1e-9);
        for (outcome, p) in dist.iter() {
            if p < 1e-12 {
                continue;
            }
            // Ancillas clean, and the infeasible choice 0b11 is never reached.
            assert_eq!(outcome >> 2, 0, "ancilla left dirty in outcome {outcome:b}");
            assert_ne!(outcome & 0b11, 0b11);
        }
        assert!(dist.probability(0b01) > 1e-3);
        assert!(dist.probability(0b10) > 1e-3);
    }

    #[test]
    fn test_walk_blocks_infeasible_neighbor() {
        // Capacity 0: every move out of the empty choice is infeasible.
        let problem = KnapsackProblem::new(vec![1, 1], vec![1, 1], 0).unwrap();
        let width = oracle_width(&problem);
        let circuit = quantum_walk_mixer(&problem, width, 1).unwrap();
        let dist = SimulationContext::default()
            .probabilities(&circuit, &ParameterBindings::new().with(BETA, 1.1), None)
            .unwrap();
        assert!((dist.probability(0) - 1.0).abs() < 1e-9);
    }
}
