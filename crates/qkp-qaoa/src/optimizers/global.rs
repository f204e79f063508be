//! Sampling global search with local simplex refinement.
//!
//! Each iteration draws a batch of uniform samples from the box, evaluates
//! them (on the rayon pool when enabled), and refines the best few with a
//! bounded Nelder-Mead search. Samples come from one seeded RNG consumed
//! on the calling thread, so results do not depend on the thread count.

use std::cmp::Ordering;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use super::{Bounds, NelderMead, OptimizationResult, Optimizer, sanitize};
use crate::config::GlobalSearchConfig;
use crate::error::QaoaResult;

/// Deterministic bounded global optimizer.
#[derive(Debug, Clone, Default)]
pub struct GlobalSearch {
    config: GlobalSearchConfig,
}

impl GlobalSearch {
    /// Create a search with a validated budget.
    pub fn new(config: GlobalSearchConfig) -> QaoaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The search budget.
    pub fn config(&self) -> &GlobalSearchConfig {
        &self.config
    }

    fn local(&self) -> NelderMead {
        NelderMead::new()
            .with_max_iterations(self.config.local_max_iterations)
            .with_tolerance(self.config.tolerance)
    }
}

impl Optimizer for GlobalSearch {
    fn minimize<F>(&self, objective: F, bounds: &Bounds) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let local = self.local();

        let mut best_params = bounds.center();
        let mut best_value = sanitize(objective(&best_params));
        let mut num_evaluations = 1;
        let mut history = Vec::with_capacity(self.config.iterations);
        let mut converged = false;

        for iteration in 0..self.config.iterations {
            let samples: Vec<Vec<f64>> = (0..self.config.samples_per_iteration)
                .map(|_| bounds.sample(&mut rng))
                .collect();
            let values: Vec<f64> = if self.config.parallel {
                samples.par_iter().map(|x| sanitize(objective(x))).collect()
            } else {
                samples.iter().map(|x| sanitize(objective(x))).collect()
            };
            num_evaluations += samples.len();

            let mut order: Vec<usize> = (0..samples.len()).collect();
            order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

            if let Some(&top) = order.first() {
                if values[top] < best_value {
                    best_value = values[top];
                    best_params = samples[top].clone();
                    converged = false;
                }
            }

            for &idx in order.iter().take(self.config.local_candidates) {
                let refined = local.minimize_from(&objective, bounds, &samples[idx]);
                num_evaluations += refined.num_evaluations;
                if refined.optimal_value < best_value {
                    best_value = refined.optimal_value;
                    best_params = refined.optimal_params;
                    converged = refined.converged;
                } else if refined.converged && refined.optimal_value - best_value <= self.config.tolerance {
                    // a converged refinement that lands on the incumbent confirms it
                    converged = true;
                }
            }

            history.push(best_value);
            debug!(iteration, best_value, num_evaluations, "Global search iteration");
        }

        OptimizationResult {
            optimal_params: best_params,
            optimal_value: best_value,
            num_evaluations,
            num_iterations: self.config.iterations,
            history,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shallow bowl around (2, -1) plus a narrow, deeper well at (-2, 2).
    fn hidden_well(x: &[f64]) -> f64 {
        let bowl = ((x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2)) / 10.0;
        let well = 5.0 * (-4.0 * ((x[0] + 2.0).powi(2) + (x[1] - 2.0).powi(2))).exp();
        bowl - well
    }

    #[test]
    fn test_finds_global_minimum() {
        let bounds = Bounds::new(vec![(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
        let config = GlobalSearchConfig {
            iterations: 4,
            samples_per_iteration: 512,
            ..GlobalSearchConfig::default()
        };
        let result = GlobalSearch::new(config).unwrap().minimize(hidden_well, &bounds);
        assert!(result.optimal_value < -2.4, "got {}", result.optimal_value);
        assert!((result.optimal_params[0] + 2.0).abs() < 0.1);
        assert!((result.optimal_params[1] - 2.0).abs() < 0.1);
        assert_eq!(result.history.len(), 4);
    }

    #[test]
    fn test_converged_when_start_is_optimal() {
        // Nothing beats the center, so only a confirming refinement can converge.
        let bounds = Bounds::new(vec![(-1.0, 1.0), (-1.0, 1.0)]).unwrap();
        let config = GlobalSearchConfig {
            iterations: 2,
            samples_per_iteration: 16,
            local_candidates: 1,
            tolerance: 1e-3,
            ..GlobalSearchConfig::default()
        };
        let result = GlobalSearch::new(config)
            .unwrap()
            .minimize(|x| x[0].powi(2) + x[1].powi(2), &bounds);
        assert_eq!(result.optimal_params, vec![0.0, 0.0]);
        assert_eq!(result.optimal_value, 0.0);
        assert!(result.converged);
    }

    #[test]
    fn test_deterministic_across_modes() {
        let bounds = Bounds::new(vec![(0.0, 3.0), (-1.0, 1.0)]).unwrap();
        let f = |x: &[f64]| (x[0] - 2.0).powi(2) + (3.0 * x[1]).sin();
        let serial = GlobalSearchConfig {
            parallel: false,
            ..GlobalSearchConfig::default()
        };
        let a = GlobalSearch::new(serial).unwrap().minimize(f, &bounds);
        let b = GlobalSearch::default().minimize(f, &bounds);
        assert_eq!(a.optimal_params, b.optimal_params);
        assert_eq!(a.num_evaluations, b.num_evaluations);
    }

    #[test]
    fn test_rejects_empty_budget() {
        let config = GlobalSearchConfig {
            samples_per_iteration: 0,
            ..GlobalSearchConfig::default()
        };
        assert!(GlobalSearch::new(config).is_err());
    }
}
