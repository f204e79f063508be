//! Penalty factors and the angle periods they induce.
//!
//! Penalty factors are kept as exact rationals: the phase-separation layers
//! rotate by integer multiples of `a·γ` and `b·γ`, so the period of the
//! objective in `γ` is a function of their numerators and denominators.

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

use crate::error::{QaoaError, QaoaResult};
use crate::problems::KnapsackProblem;

/// Largest denominator produced by [`Rational::from_f64`].
pub const MAX_DENOMINATOR: u64 = 1_000_000;

/// A non-negative rational number in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rational {
    num: u64,
    den: u64,
}

impl Rational {
    /// `num / den`, reduced.
    pub fn new(num: u64, den: u64) -> QaoaResult<Self> {
        if den == 0 {
            return Err(QaoaError::InvalidPenalty(format!("{num}/0")));
        }
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// An integer as a rational.
    pub fn from_integer(n: u64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Best rational approximation with denominator at most
    /// [`MAX_DENOMINATOR`], by continued-fraction convergents.
    pub fn from_f64(value: f64) -> QaoaResult<Self> {
        if !value.is_finite() || value < 0.0 || value > 1e15 {
            return Err(QaoaError::InvalidPenalty(format!(
                "{value} is not a non-negative finite number"
            )));
        }

        let (mut h_prev, mut h) = (0u64, 1u64);
        let (mut k_prev, mut k) = (1u64, 0u64);
        let mut x = value;
        loop {
            let term = x.floor();
            let step = term as u64;
            let next = step
                .checked_mul(h)
                .and_then(|v| v.checked_add(h_prev))
                .zip(step.checked_mul(k).and_then(|v| v.checked_add(k_prev)));
            let Some((h_next, k_next)) = next else { break };
            if k_next > MAX_DENOMINATOR {
                break;
            }
            (h_prev, h) = (h, h_next);
            (k_prev, k) = (k, k_next);

            let approx = h as f64 / k as f64;
            let frac = x - term;
            if (approx - value).abs() <= 1e-12 * value.max(1.0) || frac <= f64::EPSILON {
                break;
            }
            x = 1.0 / frac;
        }
        Self::new(h, k)
    }

    /// Numerator in lowest terms.
    pub fn numerator(&self) -> u64 {
        self.num
    }

    /// Denominator in lowest terms.
    pub fn denominator(&self) -> u64 {
        self.den
    }

    /// Floating-point value.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Product with an integer.
    #[must_use]
    pub fn scaled(&self, factor: u64) -> Self {
        let g = gcd(factor, self.den);
        Self {
            num: self.num * (factor / g),
            den: self.den / g,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Greatest common divisor; `gcd(0, 0) = 0`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple; `lcm(0, n) = 0`.
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Smallest linear penalty factor that makes dropping any overweight item
/// worthwhile: the largest item value.
pub fn a_min(problem: &KnapsackProblem) -> Rational {
    Rational::from_integer(problem.max_value())
}

/// Smallest quadratic constraint factor for a given value factor `a`.
pub fn b_min(a: Rational, problem: &KnapsackProblem) -> Rational {
    a.scaled(problem.max_value())
}

/// Period in `γ` of the linear-penalty objective.
pub fn linear_gamma_period(a: Rational) -> f64 {
    a.denominator() as f64 * 2.0 * PI
}

/// Period in `γ` of the quadratic-penalty objective.
///
/// Every phase is an integer combination of `a·γ` and `b·γ`, which are
/// multiples of `gcd(num a, num b) / lcm(den a, den b)`.
pub fn quadratic_gamma_period(a: Rational, b: Rational) -> QaoaResult<f64> {
    let g = gcd(a.numerator(), b.numerator());
    if g == 0 {
        return Err(QaoaError::InvalidPenalty(
            "a and b cannot both be zero".into(),
        ));
    }
    Ok(lcm(a.denominator(), b.denominator()) as f64 / g as f64 * 2.0 * PI)
}
