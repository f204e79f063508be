//! Exact statevector simulation for knapsack circuits.
//!
//! The engine keeps one complex amplitude per basis state and applies the
//! `qkp-ir` gate set in place. Results are exact probabilities rather than
//! shot counts, which keeps the variational objective smooth.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qkp_ir::{Circuit, ParameterBindings, QubitId};
//! use qkp_sim::SimulationContext;
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.mcx(&[QubitId(0)], QubitId(1)).unwrap();
//!
//! let ctx = SimulationContext::default();
//! let dist = ctx.probabilities(&circuit, &ParameterBindings::new(), None).unwrap();
//! assert!((dist.probability(0b00) - 0.5).abs() < 1e-12);
//! assert!((dist.probability(0b11) - 0.5).abs() < 1e-12);
//! ```

pub mod backend;
pub mod distribution;
pub mod error;
pub mod statevector;

pub use backend::{Backend, DEFAULT_MAX_QUBITS, NORM_TOLERANCE, SimulationContext, StatevectorBackend};
pub use distribution::{ProbabilityDistribution, outcome_to_bitstring};
pub use error::{SimError, SimResult};
pub use statevector::Statevector;
