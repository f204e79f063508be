//! Gate set used by the knapsack circuits.

use serde::{Deserialize, Serialize};

use crate::parameter::{ParameterExpression, ParameterMap};

/// Gates with known semantics.
///
/// Qubit order for controlled gates is controls first, target last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
    /// Phase gate, `diag(1, e^{iθ})`.
    P(ParameterExpression),
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Z axis, `diag(e^{-iθ/2}, e^{iθ/2})`.
    Rz(ParameterExpression),

    /// Controlled phase gate.
    CP(ParameterExpression),
    /// Controlled rotation around X.
    CRx(ParameterExpression),
    /// ZZ rotation gate, `exp(-iθ/2 Z⊗Z)`.
    RZZ(ParameterExpression),

    /// Toffoli gate (CCX).
    CCX,
    /// Multi-controlled X with the given number of controls.
    MCX(u32),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
            StandardGate::P(_) => "p",
            StandardGate::Rx(_) => "rx",
            StandardGate::Rz(_) => "rz",
            StandardGate::CP(_) => "cp",
            StandardGate::CRx(_) => "crx",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::MCX(_) => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X
            | StandardGate::H
            | StandardGate::P(_)
            | StandardGate::Rx(_)
            | StandardGate::Rz(_) => 1,

            StandardGate::CP(_) | StandardGate::CRx(_) | StandardGate::RZZ(_) => 2,

            StandardGate::CCX => 3,
            StandardGate::MCX(controls) => controls + 1,
        }
    }

    /// Check if this gate has unbound parameters.
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some_and(ParameterExpression::is_symbolic)
    }

    /// The angle of a rotation gate.
    pub fn parameter(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::P(p)
            | StandardGate::Rx(p)
            | StandardGate::Rz(p)
            | StandardGate::CP(p)
            | StandardGate::CRx(p)
            | StandardGate::RZZ(p) => Some(p),
            _ => None,
        }
    }

    /// Apply `f` to the angle, if there is one.
    #[must_use]
    pub fn map_parameter(&self, f: impl FnOnce(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::CRx(p) => StandardGate::CRx(f(p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(f(p)),
            other => other.clone(),
        }
    }

    /// Rename symbols through `map`.
    #[must_use]
    pub fn substitute(&self, map: &ParameterMap) -> Self {
        self.map_parameter(|p| p.substitute(map))
    }

    /// The adjoint gate. Every gate in this set is its own inverse or a
    /// rotation whose inverse negates the angle.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.map_parameter(|p| match p.as_f64() {
            Some(v) => ParameterExpression::Constant(-v),
            None => -p.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CP(PI.into()).num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::MCX(4).num_qubits(), 5);

        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(StandardGate::Rx(ParameterExpression::symbol("beta0")).is_parameterized());
    }

    #[test]
    fn test_inverse_negates_angle() {
        let g = StandardGate::CP(ParameterExpression::constant(0.3));
        assert_eq!(g.inverse(), StandardGate::CP(ParameterExpression::constant(-0.3)));
        assert_eq!(StandardGate::CCX.inverse(), StandardGate::CCX);

        let sym = StandardGate::Rz(ParameterExpression::symbol("gamma"));
        let inv = sym.inverse();
        assert_eq!(inv.parameter().unwrap().symbols(), vec!["gamma".to_string()]);
    }
}
