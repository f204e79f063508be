//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::parameter::ParameterMap;
use crate::qubit::QubitId;

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(StandardGate),
    /// Computational-basis measurement. Only valid at the end of a circuit.
    Measure,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a measurement over `qubits`.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Get the name of this instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// The gate, if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Relabel operands through `map`, where `map[i]` is the new id of
    /// qubit `i`.
    pub fn remap(&self, map: &[QubitId]) -> IrResult<Self> {
        let qubits = self
            .qubits
            .iter()
            .map(|q| {
                map.get(q.index()).copied().ok_or_else(|| IrError::QubitNotFound {
                    qubit: *q,
                    operation: self.name().to_string(),
                })
            })
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            kind: self.kind.clone(),
            qubits,
        })
    }

    /// Rename angle symbols through `map`.
    #[must_use]
    pub fn substitute(&self, map: &ParameterMap) -> Self {
        if map.is_empty() {
            return self.clone();
        }
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.substitute(map)),
            other => other.clone(),
        };
        Self {
            kind,
            qubits: self.qubits.clone(),
        }
    }

    /// The adjoint instruction.
    pub fn inverse(&self) -> IrResult<Self> {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.inverse()),
            InstructionKind::Measure => return Err(IrError::NotInvertible("measure".into())),
        };
        Ok(Self {
            kind,
            qubits: self.qubits.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterExpression;

    #[test]
    fn test_remap() {
        let inst = Instruction::gate(StandardGate::CCX, [QubitId(0), QubitId(1), QubitId(2)]);
        let mapped = inst
            .remap(&[QubitId(5), QubitId(3), QubitId(4)])
            .unwrap();
        assert_eq!(mapped.qubits, vec![QubitId(5), QubitId(3), QubitId(4)]);
    }

    #[test]
    fn test_remap_short_map() {
        let inst = Instruction::gate(StandardGate::H, [QubitId(2)]);
        assert!(matches!(
            inst.remap(&[QubitId(0)]),
            Err(IrError::QubitNotFound { .. })
        ));
    }

    #[test]
    fn test_measure_not_invertible() {
        let m = Instruction::measure([QubitId(0)]);
        assert!(m.is_measure());
        assert!(matches!(m.inverse(), Err(IrError::NotInvertible(_))));
    }

    #[test]
    fn test_substitute_renames_gate_angle() {
        let inst = Instruction::gate(
            StandardGate::Rx(ParameterExpression::symbol("t")),
            [QubitId(0)],
        );
        let renamed = inst.substitute(&ParameterMap::new().map("t", "beta0"));
        let angle = renamed.as_gate().and_then(StandardGate::parameter).unwrap();
        assert_eq!(angle.symbols(), vec!["beta0".to_string()]);
    }
}
