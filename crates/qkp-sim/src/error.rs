//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while simulating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The statevector would exceed the backend's qubit budget.
    #[error("Circuit has {qubits} qubits but the backend supports at most {max_qubits}")]
    CircuitTooLarge {
        /// Qubits in the circuit.
        qubits: usize,
        /// Backend limit.
        max_qubits: usize,
    },

    /// A gate still carries a symbolic angle.
    #[error("Gate '{gate}' has an unresolved parameter: {expression}")]
    UnresolvedParameter {
        /// Gate name.
        gate: String,
        /// The symbolic angle.
        expression: String,
    },

    /// Circuit IR error (binding or register lookup).
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qkp_ir::IrError),

    /// Requested register is not part of the circuit.
    #[error("Register '{0}' not found in circuit")]
    RegisterNotFound(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
