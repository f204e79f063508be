//! Configuration for optimizer budgets and simulator limits.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QKP_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaoaConfig {
    /// Global angle search budget
    #[serde(default)]
    pub optimizer: GlobalSearchConfig,

    /// Statevector simulator limits
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Budget and behavior of the bounded global search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSearchConfig {
    /// Number of sample-and-refine rounds
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Uniform samples drawn per round
    #[serde(default = "default_samples")]
    pub samples_per_iteration: usize,

    /// Best candidates refined by the local simplex search per round
    #[serde(default = "default_local_candidates")]
    pub local_candidates: usize,

    /// Iteration cap of each local refinement
    #[serde(default = "default_local_max_iterations")]
    pub local_max_iterations: usize,

    /// Objective spread below which a refinement counts as converged
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Seed of the sampling RNG
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Evaluate samples on the rayon thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// Statevector simulator limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest circuit (in qubits) the simulator accepts
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,
}

impl Default for GlobalSearchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            samples_per_iteration: default_samples(),
            local_candidates: default_local_candidates(),
            local_max_iterations: default_local_max_iterations(),
            tolerance: default_tolerance(),
            seed: default_seed(),
            parallel: default_true(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
        }
    }
}

fn default_iterations() -> usize {
    3
}

fn default_samples() -> usize {
    64
}

fn default_local_candidates() -> usize {
    2
}

fn default_local_max_iterations() -> usize {
    200
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_seed() -> u64 {
    42
}

fn default_true() -> bool {
    true
}

fn default_max_qubits() -> usize {
    qkp_sim::DEFAULT_MAX_QUBITS
}

impl QaoaConfig {
    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: QaoaConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with full precedence handling.
    ///
    /// Priority: environment variables > config file > defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => QaoaConfig::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QKP_*` overrides from the process environment.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `QKP_*` overrides from an arbitrary variable lookup.
    pub fn merge_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QKP_MAX_QUBITS") {
            self.simulator.max_qubits = parse_env("QKP_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QKP_OPTIMIZER_ITERATIONS") {
            self.optimizer.iterations = parse_env("QKP_OPTIMIZER_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("QKP_OPTIMIZER_SAMPLES") {
            self.optimizer.samples_per_iteration = parse_env("QKP_OPTIMIZER_SAMPLES", &v)?;
        }
        if let Some(v) = lookup("QKP_OPTIMIZER_SEED") {
            self.optimizer.seed = parse_env("QKP_OPTIMIZER_SEED", &v)?;
        }
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.optimizer.validate()?;
        if self.simulator.max_qubits == 0 || self.simulator.max_qubits > MAX_SIMULATED_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "simulator.max_qubits must be in 1..={MAX_SIMULATED_QUBITS}, got {}",
                self.simulator.max_qubits
            )));
        }
        Ok(())
    }
}

impl GlobalSearchConfig {
    /// Validate the search budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "optimizer.iterations must be at least 1".into(),
            ));
        }
        if self.samples_per_iteration == 0 {
            return Err(ConfigError::ValidationError(
                "optimizer.samples_per_iteration must be at least 1".into(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "optimizer.tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Hard ceiling on `simulator.max_qubits` (a 30-qubit state needs 16 GiB).
pub const MAX_SIMULATED_QUBITS: usize = 30;

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QaoaConfig::default();
        assert_eq!(config.optimizer.iterations, 3);
        assert_eq!(config.simulator.max_qubits, qkp_sim::DEFAULT_MAX_QUBITS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = QaoaConfig::from_yaml_str(
            "optimizer:\n  samples_per_iteration: 8\n  seed: 7\n",
        )
        .unwrap();
        assert_eq!(config.optimizer.samples_per_iteration, 8);
        assert_eq!(config.optimizer.seed, 7);
        assert_eq!(config.optimizer.iterations, 3);
        assert!(config.optimizer.parallel);
    }

    #[test]
    fn test_yaml_validation_error() {
        let err = QaoaConfig::from_yaml_str("optimizer:\n  iterations: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = QaoaConfig::from_yaml_str("optimizer:\n  seed: 1\n")
            .unwrap()
            .merge_env_from(|key| match key {
                "QKP_OPTIMIZER_SEED" => Some("99".into()),
                "QKP_MAX_QUBITS" => Some(" 12 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.optimizer.seed, 99);
        assert_eq!(config.simulator.max_qubits, 12);
    }

    #[test]
    fn test_env_parse_error() {
        let err = QaoaConfig::default()
            .merge_env_from(|key| (key == "QKP_OPTIMIZER_ITERATIONS").then(|| "many".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validate_qubit_ceiling() {
        let mut config = QaoaConfig::default();
        config.simulator.max_qubits = 40;
        assert!(config.validate().is_err());
    }
}
