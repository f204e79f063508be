//! Circuit intermediate representation for variational knapsack solvers.
//!
//! This crate provides the data structures the circuit builders in
//! `qkp-qaoa` emit and the simulator in `qkp-sim` consumes.
//!
//! # Core Components
//!
//! - **Qubits and Registers**: [`QubitId`] addresses a qubit; a [`Register`]
//!   is a contiguous, role-tagged block (choice, weight, flag, ...)
//! - **Gates**: [`StandardGate`], the small gate set the knapsack circuits need
//! - **Parameters**: [`ParameterExpression`] for symbolic angles, bound with
//!   [`ParameterBindings`] and renamed with [`ParameterMap`]
//! - **Circuit**: [`Circuit`], an ordered instruction list with a builder API
//!   plus `append`, `inverse` and `bind`
//!
//! # Example: Splicing a Parameterized Sub-circuit
//!
//! ```rust
//! use qkp_ir::{Circuit, ParameterBindings, ParameterExpression, ParameterMap, QubitId, RegisterRole};
//!
//! let mut rot = Circuit::with_size("rot", 1);
//! rot.rx(ParameterExpression::symbol("t"), QubitId(0)).unwrap();
//!
//! let mut circuit = Circuit::new("host");
//! let choice = circuit.add_register("choice", RegisterRole::Choice, 2);
//! for q in choice.qubits() {
//!     circuit
//!         .append(&rot, &[q], &ParameterMap::new().map("t", "beta0"))
//!         .unwrap();
//! }
//!
//! assert_eq!(circuit.parameters(), ["beta0".to_string()]);
//! let bound = circuit.bind(&ParameterBindings::new().with("beta0", 0.3)).unwrap();
//! assert!(!bound.is_parameterized());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X`, `H` | 1 | Pauli-X and Hadamard |
//! | `P`, `Rx`, `Rz` | 1 | Phase and rotation gates |
//! | `CP`, `CRx` | 2 | Controlled phase and controlled Rx |
//! | `RZZ` | 2 | ZZ rotation |
//! | `CCX` | 3 | Toffoli |
//! | `MCX(k)` | k+1 | X with k controls |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{ParameterBindings, ParameterExpression, ParameterMap};
pub use qubit::{Qubit, QubitId, Register, RegisterRole};
