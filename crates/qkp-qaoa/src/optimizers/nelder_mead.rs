//! Nelder-Mead simplex search, projected onto a box.
//!
//! Every trial point is clamped into the bounds before it is evaluated, so
//! the objective is never called outside its domain.

use std::cmp::Ordering;

use super::{Bounds, OptimizationResult, Optimizer, sanitize};

/// Bounded Nelder-Mead optimizer configuration.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Spread of simplex values below which the search stops.
    pub tolerance: f64,
    /// Initial simplex edge as a fraction of each axis width.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            initial_step: 0.1,
        }
    }
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Create a new optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the initial simplex edge (fraction of each axis width).
    #[must_use]
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }

    /// Minimize starting from `start`.
    pub fn minimize_from<F>(&self, objective: F, bounds: &Bounds, start: &[f64]) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = bounds.dim();
        let eval = |x: &[f64]| sanitize(objective(x));
        let start = bounds.project(start);

        let mut simplex = vec![start.clone()];
        for i in 0..n {
            let step = self.initial_step * bounds.width(i);
            let mut vertex = start.clone();
            // step inward when the start sits on the upper face
            vertex[i] = if vertex[i] + step <= bounds.ranges()[i].1 {
                vertex[i] + step
            } else {
                vertex[i] - step
            };
            simplex.push(bounds.project(&vertex));
        }
        let mut costs: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();
        let mut num_evaluations = simplex.len();
        let mut history = Vec::new();
        let mut converged = false;
        let mut num_iterations = 0;

        while num_iterations < self.max_iterations {
            num_iterations += 1;
            sort_simplex(&mut simplex, &mut costs);
            history.push(costs[0]);

            if costs[n] - costs[0] < self.tolerance {
                converged = true;
                break;
            }

            let center = centroid(&simplex[..n]);
            let toward = |from: &[f64], coefficient: f64| -> Vec<f64> {
                let point: Vec<f64> = center
                    .iter()
                    .zip(from)
                    .map(|(c, x)| c + coefficient * (x - c))
                    .collect();
                bounds.project(&point)
            };

            let reflected = toward(&simplex[n], -REFLECTION);
            let f_reflected = eval(&reflected);
            num_evaluations += 1;

            if f_reflected < costs[0] {
                let expanded = toward(&simplex[n], -EXPANSION);
                let f_expanded = eval(&expanded);
                num_evaluations += 1;
                (simplex[n], costs[n]) = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
            } else if f_reflected < costs[n - 1] {
                (simplex[n], costs[n]) = (reflected, f_reflected);
            } else {
                let contracted = toward(&simplex[n], CONTRACTION);
                let f_contracted = eval(&contracted);
                num_evaluations += 1;
                if f_contracted < costs[n] {
                    (simplex[n], costs[n]) = (contracted, f_contracted);
                } else {
                    let best = simplex[0].clone();
                    for (vertex, cost) in simplex.iter_mut().zip(costs.iter_mut()).skip(1) {
                        for (x, b) in vertex.iter_mut().zip(&best) {
                            *x = b + SHRINK * (*x - b);
                        }
                        *cost = eval(vertex);
                        num_evaluations += 1;
                    }
                }
            }
        }

        sort_simplex(&mut simplex, &mut costs);
        OptimizationResult {
            optimal_params: simplex.swap_remove(0),
            optimal_value: costs[0],
            num_evaluations,
            num_iterations,
            history,
            converged,
        }
    }
}

impl Optimizer for NelderMead {
    fn minimize<F>(&self, objective: F, bounds: &Bounds) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        self.minimize_from(objective, bounds, &bounds.center())
    }
}

/// Sort vertices by cost, best first.
fn sort_simplex(simplex: &mut Vec<Vec<f64>>, costs: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..simplex.len()).collect();
    order.sort_by(|&a, &b| costs[a].partial_cmp(&costs[b]).unwrap_or(Ordering::Equal));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *costs = order.iter().map(|&i| costs[i]).collect();
}

/// Mean of the given vertices.
fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let dim = vertices.first().map_or(0, Vec::len);
    let mut center = vec![0.0; dim];
    for vertex in vertices {
        for (c, &v) in center.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    for c in &mut center {
        *c /= vertices.len() as f64;
    }
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_bowl() {
        let bounds = Bounds::new(vec![(-5.0, 5.0), (-5.0, 5.0)]).unwrap();
        let result = NelderMead::new()
            .with_tolerance(1e-12)
            .with_max_iterations(500)
            .minimize(|x| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2), &bounds);
        assert!(result.converged);
        assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
        assert!((result.optimal_params[1] + 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_minimum_outside_box_is_clamped() {
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let result = NelderMead::new()
            .with_max_iterations(500)
            .minimize(|x| (x[0] - 3.0).powi(2), &bounds);
        assert!(bounds.contains(&result.optimal_params));
        assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_wide_initial_step_from_upper_face() {
        let bounds = Bounds::new(vec![(0.0, 2.0)]).unwrap();
        let result = NelderMead::new()
            .with_initial_step(0.5)
            .with_max_iterations(300)
            .minimize_from(|x| (x[0] - 0.5).powi(2), &bounds, &[2.0]);
        assert!(result.converged);
        assert!(bounds.contains(&result.optimal_params));
        assert!((result.optimal_params[0] - 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_nan_is_worst() {
        let bounds = Bounds::new(vec![(-1.0, 1.0)]).unwrap();
        let result = NelderMead::new()
            .with_max_iterations(200)
            .minimize(|x| if x[0] > 0.5 { f64::NAN } else { x[0].abs() }, &bounds);
        assert!(result.optimal_value.is_finite());
        assert!(result.optimal_value < 1e-3);
    }

    #[test]
    fn test_history_is_monotone() {
        let bounds = Bounds::new(vec![(-3.0, 3.0), (-3.0, 3.0)]).unwrap();
        let result = NelderMead::new().minimize(|x| x[0].powi(2) + 3.0 * x[1].powi(2) + 1.0, &bounds);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
    }
}
