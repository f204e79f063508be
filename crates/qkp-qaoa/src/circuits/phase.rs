//! Phase-separation layers.
//!
//! All three layers are diagonal in the computational basis and use the
//! local angle [`GAMMA`]; the penalty layers also carry the symbolic
//! factors [`PENALTY_A`] and [`PENALTY_B`], bound at evaluation time.

use qkp_ir::{Circuit, ParameterExpression, ParameterMap, RegisterRole};

use super::oracle::{feasibility_oracle, oracle_layout};
use super::{CHOICE, FLAG, GAMMA, PENALTY_A, PENALTY_B, WEIGHT, one_hot_width, qubit_map};
use crate::error::QaoaResult;
use crate::problems::KnapsackProblem;

/// `coefficient · factor · γ`
fn scaled_angle(factor: &str, coefficient: f64) -> ParameterExpression {
    (ParameterExpression::symbol(factor) * ParameterExpression::symbol(GAMMA)).scaled(coefficient)
}

/// Phase `−γ·value_i` on every choice qubit.
pub fn value_phase(problem: &KnapsackProblem) -> QaoaResult<Circuit> {
    let mut circuit = Circuit::new("value_phase");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    for (i, &v) in problem.values().iter().enumerate() {
        let angle = ParameterExpression::symbol(GAMMA).scaled(-(v as f64));
        circuit.p(angle, choice.qubit(i as u32)?)?;
    }
    Ok(circuit)
}

/// Value phase plus a penalty phase `a·γ·(weight − max_weight − 1)` on
/// infeasible choices.
///
/// Registers are `choice`, `weight` (`width` qubits) and `flag`. The flag
/// and weight register start and end in |0⟩.
pub fn linear_phase(problem: &KnapsackProblem, width: u32) -> QaoaResult<Circuit> {
    let layout = oracle_layout(problem);
    let oracle = feasibility_oracle(problem, width, false)?;

    let mut circuit = Circuit::new("linear_phase");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, problem.num_items() as u32);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, width);
    let flag_reg = circuit.add_register(FLAG, RegisterRole::Flag, 1);
    let flag = flag_reg.qubit(0)?;
    let map = qubit_map(&[&choice, &weight, &flag_reg]);
    let none = ParameterMap::new();

    circuit.x(flag)?;
    circuit.append(&value_phase(problem)?, &choice.qubits(), &none)?;
    circuit.append(&oracle, &map, &none)?;

    // The register now reads weight + w0, and the flag is set only for
    // infeasible choices.
    for idx in 0..width {
        let angle = scaled_angle(PENALTY_A, 2f64.powi(idx as i32));
        circuit.cp(angle, flag, weight.qubit(idx)?)?;
    }
    circuit.p(scaled_angle(PENALTY_A, -(2f64.powi(layout.c as i32))), flag)?;

    circuit.append(&oracle.inverse()?, &map, &none)?;
    circuit.x(flag)?;
    Ok(circuit)
}

/// `exp(−iγ·f)` up to a global phase, for the quadratic-penalty objective
///
/// `f = a·Σ v_i x_i − b·[(1 − Σ y_j)² + (Σ j·y_j − Σ w_i x_i)²]`
///
/// over registers `choice` (`x`) and a one-hot `weight` register (`y`,
/// `max_weight` qubits, qubit `j − 1` standing for weight `j`).
pub fn quadratic_phase(problem: &KnapsackProblem) -> QaoaResult<Circuit> {
    let n = problem.num_items() as u32;
    let w_max = one_hot_width(problem)?;
    let total = problem.total_weight() as f64;
    let s = f64::from(w_max) * (f64::from(w_max) + 1.0) / 2.0;

    let mut circuit = Circuit::new("quadratic_phase");
    let choice = circuit.add_register(CHOICE, RegisterRole::Choice, n);
    let weight = circuit.add_register(WEIGHT, RegisterRole::Weight, w_max);
    let values = problem.values();
    let weights = problem.weights();

    for i in 0..n as usize {
        let value_term = ParameterExpression::symbol(PENALTY_A).scaled(-(values[i] as f64));
        let weight_term =
            ParameterExpression::symbol(PENALTY_B).scaled((total - s) * weights[i] as f64);
        let angle = ParameterExpression::symbol(GAMMA) * (value_term + weight_term);
        circuit.rz(angle, choice.qubit(i as u32)?)?;
    }
    for idx in 0..w_max {
        let j = f64::from(idx + 1);
        let coefficient = f64::from(w_max) - 2.0 + j * (s - total);
        circuit.rz(scaled_angle(PENALTY_B, coefficient), weight.qubit(idx)?)?;
    }

    for i in 0..n {
        for l in (i + 1)..n {
            let coefficient = -((weights[i as usize] * weights[l as usize]) as f64);
            circuit.rzz(scaled_angle(PENALTY_B, coefficient), choice.qubit(i)?, choice.qubit(l)?)?;
        }
    }
    for idx in 0..w_max {
        for kdx in (idx + 1)..w_max {
            let (j, k) = (f64::from(idx + 1), f64::from(kdx + 1));
            let coefficient = -(1.0 + j * k);
            circuit.rzz(scaled_angle(PENALTY_B, coefficient), weight.qubit(idx)?, weight.qubit(kdx)?)?;
        }
    }
    for i in 0..n {
        for idx in 0..w_max {
            let coefficient = f64::from(idx + 1) * weights[i as usize] as f64;
            circuit.rzz(scaled_angle(PENALTY_B, coefficient), choice.qubit(i)?, weight.qubit(idx)?)?;
        }
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::oracle_width;
    use crate::error::QaoaError;

    #[test]
    fn test_value_phase_parameters() {
        let problem = KnapsackProblem::toy("E").unwrap();
        let circuit = value_phase(&problem).unwrap();
        assert_eq!(circuit.gate_count(), 3);
        assert_eq!(circuit.parameters(), [GAMMA.to_string()]);
    }

    #[test]
    fn test_linear_phase_declares_penalty() {
        let problem = KnapsackProblem::toy("E").unwrap();
        let circuit = linear_phase(&problem, oracle_width(&problem)).unwrap();
        assert_eq!(circuit.num_qubits(), 3 + 3 + 1);
        assert_eq!(circuit.parameters(), [GAMMA.to_string(), PENALTY_A.to_string()]);
    }

    #[test]
    fn test_quadratic_phase_rejects_unaddressable_capacity() {
        let problem = KnapsackProblem::new(vec![1], vec![1], (1 << 32) + 1).unwrap();
        let err = quadratic_phase(&problem).unwrap_err();
        assert!(matches!(err, QaoaError::MalformedProblem(_)));
        assert_eq!(one_hot_width(&KnapsackProblem::toy("E").unwrap()).unwrap(), 3);
    }

    #[test]
    fn test_quadratic_phase_gate_counts() {
        let problem = KnapsackProblem::toy("E").unwrap();
        let circuit = quadratic_phase(&problem).unwrap();
        // 3 + 3 single rotations, 3 + 3 in-register pairs, 9 cross pairs
        assert_eq!(circuit.gate_count(), 21);
        assert_eq!(circuit.num_qubits(), 6);
        assert!(circuit.instructions().iter().all(|i| i.name() == "rz" || i.name() == "rzz"));
    }
}
