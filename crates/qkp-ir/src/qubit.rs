//! Qubits and role-tagged registers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit in a statevector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Semantic role of a register inside a knapsack circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterRole {
    /// One qubit per item; |1⟩ means the item is packed.
    Choice,
    /// Accumulated weight (binary or one-hot).
    Weight,
    /// Feasibility flag of the current choice.
    Flag,
    /// Feasibility flag of the neighbouring choice.
    FlagNeighbor,
    /// Conjunction of both feasibility flags.
    FlagBoth,
    /// Plain control qubit for standalone arithmetic.
    Control,
}

impl fmt::Display for RegisterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegisterRole::Choice => "choice",
            RegisterRole::Weight => "weight",
            RegisterRole::Flag => "flag",
            RegisterRole::FlagNeighbor => "flag_neighbor",
            RegisterRole::FlagBoth => "flag_both",
            RegisterRole::Control => "control",
        };
        f.write_str(name)
    }
}

/// A quantum bit with optional register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The unique identifier.
    pub id: QubitId,
    /// The name of the register this qubit belongs to, if any.
    pub register: Option<String>,
    /// The index within the register, if any.
    pub index: Option<u32>,
}

impl Qubit {
    /// Create a new qubit with just an id.
    pub fn new(id: QubitId) -> Self {
        Self {
            id,
            register: None,
            index: None,
        }
    }

    /// Create a new qubit with register membership.
    pub fn with_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some(register.into()),
            index: Some(index),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
            _ => write!(f, "{}", self.id),
        }
    }
}

/// A contiguous, named block of qubits.
///
/// Registers of one circuit never overlap; the circuit width is the sum of
/// the register sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    role: RegisterRole,
    offset: u32,
    size: u32,
}

impl Register {
    pub(crate) fn new(name: impl Into<String>, role: RegisterRole, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            role,
            offset,
            size,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register role.
    pub fn role(&self) -> RegisterRole {
        self.role
    }

    /// Number of qubits in the register.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Circuit position of the first qubit.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Whether the register has no qubits.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The qubit at `index` within this register.
    pub fn qubit(&self, index: u32) -> IrResult<QubitId> {
        if index >= self.size {
            return Err(IrError::RegisterIndexOutOfRange {
                register: self.name.clone(),
                index,
                size: self.size,
            });
        }
        Ok(QubitId(self.offset + index))
    }

    /// All qubits, least significant first.
    pub fn qubits(&self) -> Vec<QubitId> {
        (self.offset..self.offset + self.size).map(QubitId).collect()
    }

    /// Whether `qubit` belongs to this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit.0 >= self.offset && qubit.0 < self.offset + self.size
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] ({})", self.name, self.size, self.role)
    }
}
