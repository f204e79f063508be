//! Runners tying a problem, an encoding strategy, the simulator and the
//! optimizer together.

pub mod qaoa;
pub mod report;
pub mod strategy;

pub use qaoa::{OptimalAngles, QaoaRunner};
pub use report::QaoaReport;
pub use strategy::{LinearStrategy, QuadraticStrategy, QuantumWalkStrategy, Strategy};
