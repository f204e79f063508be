//! Bound-constrained, derivative-free optimizers for the variational angles.

pub mod global;
pub mod nelder_mead;

pub use global::GlobalSearch;
pub use nelder_mead::NelderMead;

use rand::Rng;

use crate::error::{QaoaError, QaoaResult};

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// History of objective values.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// A minimizer over an axis-aligned box.
pub trait Optimizer {
    /// Minimize `objective` within `bounds`.
    fn minimize<F>(&self, objective: F, bounds: &Bounds) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64 + Sync;
}

/// Axis-aligned box `[lower_i, upper_i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    ranges: Vec<(f64, f64)>,
}

impl Bounds {
    /// Validate and wrap per-axis ranges.
    pub fn new(ranges: Vec<(f64, f64)>) -> QaoaResult<Self> {
        if ranges.is_empty() {
            return Err(QaoaError::InvalidBounds("no dimensions".into()));
        }
        if let Some((i, (lo, hi))) = ranges
            .iter()
            .enumerate()
            .find(|(_, (lo, hi))| !lo.is_finite() || !hi.is_finite() || lo >= hi)
        {
            return Err(QaoaError::InvalidBounds(format!(
                "axis {i}: [{lo}, {hi}] is empty or not finite"
            )));
        }
        Ok(Self { ranges })
    }

    /// `[gamma_range, beta_range]` repeated for `p` layers.
    pub fn qaoa(p: usize, gamma_range: (f64, f64), beta_range: (f64, f64)) -> QaoaResult<Self> {
        Self::new([gamma_range, beta_range].repeat(p))
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.ranges.len()
    }

    /// Per-axis ranges.
    pub fn ranges(&self) -> &[(f64, f64)] {
        &self.ranges
    }

    /// Width of axis `i`.
    pub fn width(&self, i: usize) -> f64 {
        self.ranges[i].1 - self.ranges[i].0
    }

    /// Clamp a point into the box.
    pub fn project(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(&self.ranges)
            .map(|(&x, &(lo, hi))| x.clamp(lo, hi))
            .collect()
    }

    /// Whether `point` lies in the box.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.ranges)
                .all(|(&x, &(lo, hi))| (lo..=hi).contains(&x))
    }

    /// Uniform sample from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.ranges
            .iter()
            .map(|&(lo, hi)| lo + (hi - lo) * rng.r#gen::<f64>())
            .collect()
    }

    /// Center of the box.
    pub fn center(&self) -> Vec<f64> {
        self.ranges.iter().map(|&(lo, hi)| 0.5 * (lo + hi)).collect()
    }
}

/// Objective value with NaN treated as the worst possible.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_nan() { f64::INFINITY } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(vec![]).is_err());
        assert!(Bounds::new(vec![(1.0, 1.0)]).is_err());
        assert!(Bounds::new(vec![(0.0, f64::INFINITY)]).is_err());
        assert!(Bounds::new(vec![(0.0, 1.0)]).is_ok());
    }

    #[test]
    fn test_qaoa_layout() {
        let bounds = Bounds::qaoa(2, (0.0, 6.0), (0.0, 3.0)).unwrap();
        assert_eq!(bounds.ranges(), [(0.0, 6.0), (0.0, 3.0), (0.0, 6.0), (0.0, 3.0)]);
        assert_eq!(bounds.center(), vec![3.0, 1.5, 3.0, 1.5]);
    }

    #[test]
    fn test_project_and_sample() {
        let bounds = Bounds::new(vec![(0.0, 1.0), (-2.0, 2.0)]).unwrap();
        assert_eq!(bounds.project(&[1.5, -3.0]), vec![1.0, -2.0]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(bounds.contains(&bounds.sample(&mut rng)));
        }
    }
}
