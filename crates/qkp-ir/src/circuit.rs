//! High-level circuit builder API.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::{ParameterBindings, ParameterExpression, ParameterMap};
use crate::qubit::{Qubit, QubitId, Register, RegisterRole};

/// A quantum circuit.
///
/// Instructions are kept in application order. Qubit `i` of the circuit is
/// bit `i` of a computational-basis index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Named registers, in allocation order.
    registers: Vec<Register>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
    /// Free angle symbols in order of first use.
    parameters: Vec<String>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            registers: vec![],
            instructions: vec![],
            parameters: vec![],
        }
    }

    /// Create a circuit with a given number of anonymous qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.qubits.len() as u32);
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Allocate a register of `size` fresh qubits.
    pub fn add_register(
        &mut self,
        name: impl Into<String>,
        role: RegisterRole,
        size: u32,
    ) -> Register {
        let name = name.into();
        let offset = self.qubits.len() as u32;
        for i in 0..size {
            self.qubits
                .push(Qubit::with_register(QubitId(offset + i), &name, i));
        }
        let register = Register::new(name, role, offset, size);
        self.registers.push(register.clone());
        register
    }

    /// Append a validated instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        if let Some(param) = instruction.as_gate().and_then(StandardGate::parameter) {
            for symbol in param.symbols() {
                if !self.parameters.contains(&symbol) {
                    self.parameters.push(symbol);
                }
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let operation = || instruction.name().to_string();
        if let Some(gate) = instruction.as_gate() {
            let got = instruction.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }
        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.index() >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    operation: operation(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    operation: operation(),
                });
            }
        }
        Ok(())
    }

    fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::P(theta.into()), [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta.into()), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta.into()), [qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply controlled phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::CP(theta.into()), [control, target])
    }

    /// Apply controlled Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::CRx(theta.into()), [control, target])
    }

    /// Apply ZZ rotation gate.
    pub fn rzz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta.into()), [q1, q2])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    /// Apply X to `target` when every control is |1⟩.
    ///
    /// With no controls this is a plain X.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let qubits = controls.iter().copied().chain([target]);
        self.gate(StandardGate::MCX(controls.len() as u32), qubits)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure all qubits in the computational basis.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::measure(qubits))
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Splice `other` into this circuit.
    ///
    /// Qubit `i` of `other` lands on `qubit_map[i]`; angle symbols of `other`
    /// are rewritten through `params`.
    pub fn append(
        &mut self,
        other: &Circuit,
        qubit_map: &[QubitId],
        params: &ParameterMap,
    ) -> IrResult<&mut Self> {
        if qubit_map.len() != other.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: other.name.clone(),
                expected: other.num_qubits() as u32,
                got: qubit_map.len() as u32,
            });
        }
        for instruction in &other.instructions {
            let spliced = instruction.remap(qubit_map)?.substitute(params);
            self.apply(spliced)?;
        }
        Ok(self)
    }

    /// The adjoint circuit: reversed order, every gate inverted.
    ///
    /// Registers and qubit labels are preserved. Fails on measurements.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverted = Circuit {
            name: format!("{}_dg", self.name),
            qubits: self.qubits.clone(),
            registers: self.registers.clone(),
            instructions: Vec::with_capacity(self.instructions.len()),
            parameters: vec![],
        };
        for instruction in self.instructions.iter().rev() {
            inverted.apply(instruction.inverse()?)?;
        }
        Ok(inverted)
    }

    /// Substitute concrete values for every free angle.
    ///
    /// Every binding must name a declared parameter and every declared
    /// parameter must be bound.
    pub fn bind(&self, bindings: &ParameterBindings) -> IrResult<Circuit> {
        if let Some(unknown) = bindings
            .names()
            .find(|name| !self.parameters.iter().any(|p| p.as_str() == *name))
        {
            return Err(IrError::UnknownParameter(unknown.to_string()));
        }
        if let Some(unbound) = self.parameters.iter().find(|p| bindings.get(p).is_none()) {
            return Err(IrError::UnboundParameter(unbound.clone()));
        }

        let mut bound = Circuit {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            registers: self.registers.clone(),
            instructions: Vec::with_capacity(self.instructions.len()),
            parameters: vec![],
        };
        for instruction in &self.instructions {
            let kind = match &instruction.kind {
                InstructionKind::Gate(g) => {
                    let value = g.parameter().map(|p| p.evaluate(bindings)).transpose()?;
                    InstructionKind::Gate(match value {
                        Some(v) => g.map_parameter(|_| ParameterExpression::Constant(v)),
                        None => g.clone(),
                    })
                }
                other => other.clone(),
            };
            bound.instructions.push(Instruction {
                kind,
                qubits: instruction.qubits.clone(),
            });
        }
        Ok(bound)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Registers in allocation order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// First register with the given role.
    pub fn register_by_role(&self, role: RegisterRole) -> Option<&Register> {
        self.registers.iter().find(|r| r.role() == role)
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Free angle symbols in order of first use.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Whether any angle is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Number of gate instructions.
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.qubits.len()];
        for instruction in &self.instructions {
            let start = instruction
                .qubits
                .iter()
                .map(|q| levels[q.index()])
                .max()
                .unwrap_or(0);
            for q in &instruction.qubits {
                levels[q.index()] = start + 1;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let choice = circuit.add_register("choice", RegisterRole::Choice, 3);
        let flag = circuit.add_register("flag", RegisterRole::Flag, 1);

        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(choice.offset(), 0);
        assert_eq!(flag.qubit(0).unwrap(), QubitId(3));
        assert_eq!(circuit.register("flag"), Some(&flag));
        assert_eq!(
            circuit.register_by_role(RegisterRole::Choice).map(Register::size),
            Some(3)
        );
        assert_eq!(format!("{}", circuit.qubits()[3]), "flag[0]");
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cp(PI / 2.0, QubitId(0), QubitId(1))
            .unwrap()
            .measure_all()
            .unwrap();

        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.gate_count(), 2);
    }

    #[test]
    fn test_rejects_bad_operands() {
        let mut circuit = Circuit::with_size("test", 2);
        assert!(matches!(
            circuit.x(QubitId(2)),
            Err(IrError::QubitNotFound { .. })
        ));
        assert!(matches!(
            circuit.ccx(QubitId(0), QubitId(0), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_parameters_tracked_in_order() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.rx(ParameterExpression::symbol("beta0"), QubitId(0)).unwrap();
        circuit.p(ParameterExpression::symbol("gamma0"), QubitId(0)).unwrap();
        circuit.rz(ParameterExpression::symbol("beta0"), QubitId(0)).unwrap();
        assert_eq!(circuit.parameters(), ["beta0".to_string(), "gamma0".to_string()]);
    }

    #[test]
    fn test_append_with_maps() {
        let mut sub = Circuit::with_size("sub", 2);
        sub.crx(ParameterExpression::symbol("t"), QubitId(0), QubitId(1))
            .unwrap();

        let mut host = Circuit::with_size("host", 3);
        host.append(
            &sub,
            &[QubitId(2), QubitId(0)],
            &ParameterMap::new().map("t", ParameterExpression::symbol("beta3").scaled(2.0)),
        )
        .unwrap();

        let inst = &host.instructions()[0];
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(0)]);
        assert_eq!(host.parameters(), ["beta3".to_string()]);

        assert!(matches!(
            host.append(&sub, &[QubitId(0)], &ParameterMap::new()),
            Err(IrError::QubitCountMismatch { .. })
        ));
    }

    #[test]
    fn test_inverse_reverses_and_negates() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cp(0.5, QubitId(0), QubitId(1)).unwrap();

        let inv = circuit.inverse().unwrap();
        assert_eq!(inv.name(), "test_dg");
        assert_eq!(
            inv.instructions()[0].as_gate(),
            Some(&StandardGate::CP(ParameterExpression::constant(-0.5)))
        );
        assert_eq!(inv.instructions()[1].as_gate(), Some(&StandardGate::H));

        circuit.measure_all().unwrap();
        assert!(matches!(circuit.inverse(), Err(IrError::NotInvertible(_))));
    }

    #[test]
    fn test_bind() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit
            .rx(ParameterExpression::symbol("beta0").scaled(2.0), QubitId(0))
            .unwrap();

        let bound = circuit
            .bind(&ParameterBindings::new().with("beta0", 0.25))
            .unwrap();
        assert!(!bound.is_parameterized());
        assert_eq!(
            bound.instructions()[0].as_gate(),
            Some(&StandardGate::Rx(ParameterExpression::constant(0.5)))
        );

        assert!(matches!(
            circuit.bind(&ParameterBindings::new()),
            Err(IrError::UnboundParameter(name)) if name == "beta0"
        ));
        assert!(matches!(
            circuit.bind(&ParameterBindings::new().with("beta0", 0.1).with("gamma0", 0.2)),
            Err(IrError::UnknownParameter(name)) if name == "gamma0"
        ));
    }
}
