//! Error types for the knapsack QAOA crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while building, simulating or optimizing knapsack circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QaoaError {
    /// Problem instance failed validation.
    #[error("Malformed knapsack problem: {0}")]
    MalformedProblem(String),

    /// A weight register cannot hold every reachable sum.
    #[error("Weight register too narrow: oracle needs {required} qubits, got {actual}")]
    RegisterTooNarrow {
        /// Minimum width.
        required: u32,
        /// Width supplied by the caller.
        actual: u32,
    },

    /// Number of alternating layers must be at least 1.
    #[error("Number of layers must be at least 1, got {0}")]
    InvalidLayers(usize),

    /// Trotter count of the walk mixer must be at least 1.
    #[error("Trotter count must be at least 1, got {0}")]
    InvalidTrotterCount(usize),

    /// Penalty factor is not a positive finite rational.
    #[error("Invalid penalty factor: {0}")]
    InvalidPenalty(String),

    /// Optimizer bounds are empty or inverted.
    #[error("Invalid optimizer bounds: {0}")]
    InvalidBounds(String),

    /// Angle vector does not match the ansatz.
    #[error("Expected {expected} angles, got {got}")]
    AngleCountMismatch {
        /// Angles the ansatz declares.
        expected: usize,
        /// Angles supplied.
        got: usize,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qkp_ir::IrError),

    /// Simulation error.
    #[error("Simulation error: {0}")]
    Sim(#[from] qkp_sim::SimError),
}

/// Result type for knapsack QAOA operations.
pub type QaoaResult<T> = Result<T, QaoaError>;
