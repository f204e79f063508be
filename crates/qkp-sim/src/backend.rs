//! The backend contract and the simulation context handed to evaluators.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use qkp_ir::{Circuit, ParameterBindings};

use crate::distribution::ProbabilityDistribution;
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Largest tolerated deviation of the final state norm from 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Default qubit budget of [`StatevectorBackend`].
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Executes fully bound circuits.
///
/// Implementations are pure: the same circuit always yields the same state,
/// so one backend can serve many threads.
pub trait Backend: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Largest circuit the backend accepts.
    fn max_qubits(&self) -> usize;

    /// Final statevector of `circuit` applied to |0...0⟩.
    fn run(&self, circuit: &Circuit) -> SimResult<Statevector>;

    /// Exact outcome distribution, optionally marginalized to a register.
    fn probabilities(
        &self,
        circuit: &Circuit,
        register: Option<&str>,
    ) -> SimResult<ProbabilityDistribution> {
        let state = self.run(circuit)?;
        let full = ProbabilityDistribution::from_statevector(&state);
        match register {
            None => Ok(full),
            Some(name) => {
                let reg = circuit
                    .register(name)
                    .ok_or_else(|| SimError::RegisterNotFound(name.to_string()))?;
                Ok(full.marginal(&reg.qubits()))
            }
        }
    }
}

/// Local exact statevector backend.
#[derive(Debug, Clone)]
pub struct StatevectorBackend {
    max_qubits: usize,
}

impl StatevectorBackend {
    /// Create a backend with the default qubit budget.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Create a backend with a custom qubit budget.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        Self { max_qubits }
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        "statevector"
    }

    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run(&self, circuit: &Circuit) -> SimResult<Statevector> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(SimError::CircuitTooLarge {
                qubits: num_qubits,
                max_qubits: self.max_qubits,
            });
        }

        let start = Instant::now();
        let mut state = Statevector::new(num_qubits);
        for instruction in circuit.instructions() {
            state.apply(instruction)?;
        }

        let drift = (state.norm() - 1.0).abs();
        if drift > NORM_TOLERANCE {
            warn!(drift, num_qubits, "statevector norm drifted");
        }
        debug!(
            num_qubits,
            instructions = circuit.instructions().len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "simulation completed"
        );
        Ok(state)
    }
}

/// Injected simulation handle.
///
/// Every evaluation binds the circuit into a fresh, independent instruction
/// sequence before it reaches the backend, so a context can be cloned into
/// parallel workers freely.
#[derive(Clone)]
pub struct SimulationContext {
    backend: Arc<dyn Backend>,
}

impl SimulationContext {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Context over a [`StatevectorBackend`] with the given qubit budget.
    pub fn statevector(max_qubits: usize) -> Self {
        Self::new(Arc::new(StatevectorBackend::with_max_qubits(max_qubits)))
    }

    /// The underlying backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Bind and simulate.
    pub fn simulate(
        &self,
        circuit: &Circuit,
        bindings: &ParameterBindings,
    ) -> SimResult<Statevector> {
        let bound = circuit.bind(bindings)?;
        self.backend.run(&bound)
    }

    /// Bind, simulate and read the distribution over `register` (or all
    /// qubits when `None`).
    pub fn probabilities(
        &self,
        circuit: &Circuit,
        bindings: &ParameterBindings,
        register: Option<&str>,
    ) -> SimResult<ProbabilityDistribution> {
        let bound = circuit.bind(bindings)?;
        self.backend.probabilities(&bound, register)
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(Arc::new(StatevectorBackend::new()))
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("backend", &self.backend.name())
            .field("max_qubits", &self.backend.max_qubits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qkp_ir::{ParameterExpression, QubitId, RegisterRole};

    #[test]
    fn test_rejects_large_circuit() {
        let backend = StatevectorBackend::with_max_qubits(2);
        let circuit = Circuit::with_size("big", 3);
        assert!(matches!(
            backend.run(&circuit),
            Err(SimError::CircuitTooLarge { qubits: 3, max_qubits: 2 })
        ));
    }

    #[test]
    fn test_register_marginal() {
        let mut circuit = Circuit::new("test");
        let choice = circuit.add_register("choice", RegisterRole::Choice, 1);
        let flag = circuit.add_register("flag", RegisterRole::Flag, 1);
        circuit.h(choice.qubit(0).unwrap()).unwrap();
        circuit.x(flag.qubit(0).unwrap()).unwrap();

        let dist = StatevectorBackend::new()
            .probabilities(&circuit, Some("flag"))
            .unwrap();
        assert!((dist.probability(1) - 1.0).abs() < 1e-12);

        assert!(matches!(
            StatevectorBackend::new().probabilities(&circuit, Some("weight")),
            Err(SimError::RegisterNotFound(_))
        ));
    }

    #[test]
    fn test_context_binds_before_simulating() {
        let mut circuit = Circuit::with_size("rot", 1);
        circuit
            .rx(ParameterExpression::symbol("beta0").scaled(2.0), QubitId(0))
            .unwrap();

        let ctx = SimulationContext::default();
        let bindings = ParameterBindings::new().with("beta0", std::f64::consts::FRAC_PI_2);
        let dist = ctx.probabilities(&circuit, &bindings, None).unwrap();
        assert!((dist.probability(1) - 1.0).abs() < 1e-12);

        assert!(matches!(
            ctx.simulate(&circuit, &ParameterBindings::new()),
            Err(SimError::Ir(qkp_ir::IrError::UnboundParameter(_)))
        ));
    }
}
