//! Circuit construction and binding errors.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors raised while building, composing or binding circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operation addressed a qubit past the end of the circuit.
    #[error("'{operation}' addresses {qubit:?}, which is not in the circuit")]
    QubitNotFound {
        /// Offending qubit.
        qubit: QubitId,
        /// Operation name.
        operation: String,
    },

    /// Index past the end of a register.
    #[error("Index {index} out of range for register '{register}' of size {size}")]
    RegisterIndexOutOfRange {
        /// Register name.
        register: String,
        /// Requested index.
        index: u32,
        /// Register size.
        size: u32,
    },

    /// Gate arity or sub-circuit qubit map does not match.
    #[error("'{gate_name}' acts on {expected} qubits but {got} were given")]
    QubitCountMismatch {
        /// Name of the gate or sub-circuit.
        gate_name: String,
        /// Qubits it acts on.
        expected: u32,
        /// Qubits supplied.
        got: u32,
    },

    /// Parameter is declared but no value was bound.
    #[error("No value bound for parameter '{0}'")]
    UnboundParameter(String),

    /// Every symbol is bound but a divisor evaluates to zero.
    #[error("Expression '{0}' divides by zero")]
    DivisionByZero(String),

    /// A value was bound to a name the circuit does not declare.
    #[error("Parameter '{0}' is not declared by the circuit")]
    UnknownParameter(String),

    /// Circuit contains an operation without an inverse.
    #[error("Instruction '{0}' has no inverse")]
    NotInvertible(String),

    /// The same qubit appears twice in one operation.
    #[error("'{operation}' uses {qubit:?} more than once")]
    DuplicateQubit {
        /// Repeated qubit.
        qubit: QubitId,
        /// Operation name.
        operation: String,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
