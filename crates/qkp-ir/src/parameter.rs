//! Symbolic angle expressions.
//!
//! Circuits are built once with named angles (`gamma0`, `beta0`, ...) and
//! bound to concrete values on every objective evaluation. Sub-circuits built
//! with a local angle name are spliced into a larger circuit through a
//! [`ParameterMap`], which renames or rescales their symbols.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::error::{IrError, IrResult};

/// A symbolic or concrete angle expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named angle.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant expression.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a named angle.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// `coefficient * self`, folding constants where possible.
    #[must_use]
    pub fn scaled(&self, coefficient: f64) -> Self {
        match self.as_f64() {
            Some(v) => ParameterExpression::Constant(coefficient * v),
            None if coefficient == 1.0 => self.clone(),
            None => ParameterExpression::Constant(coefficient) * self.clone(),
        }
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete value without any bindings.
    pub fn as_f64(&self) -> Option<f64> {
        self.eval_with(&|_| None)
    }

    /// Evaluate against a set of bindings.
    ///
    /// Fails with [`IrError::UnboundParameter`] naming the first symbol that
    /// has no value, or with [`IrError::DivisionByZero`] once all are bound.
    pub fn evaluate(&self, bindings: &ParameterBindings) -> IrResult<f64> {
        if let Some(v) = self.eval_with(&|name| bindings.get(name)) {
            return Ok(v);
        }
        let missing = self
            .symbols()
            .into_iter()
            .find(|name| bindings.get(name).is_none());
        Err(match missing {
            Some(name) => IrError::UnboundParameter(name),
            None => IrError::DivisionByZero(self.to_string()),
        })
    }

    fn eval_with(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(name) => lookup(name),
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.eval_with(lookup).map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.eval_with(lookup)? + b.eval_with(lookup)?),
            ParameterExpression::Sub(a, b) => Some(a.eval_with(lookup)? - b.eval_with(lookup)?),
            ParameterExpression::Mul(a, b) => Some(a.eval_with(lookup)? * b.eval_with(lookup)?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.eval_with(lookup)?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.eval_with(lookup)? / divisor)
            }
        }
    }

    /// Symbol names in order of first appearance.
    pub fn symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            ParameterExpression::Neg(e) => e.collect_symbols(out),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Replace every mapped symbol by its expression.
    ///
    /// Symbols without an entry in `map` are kept as they are.
    #[must_use]
    pub fn substitute(&self, map: &ParameterMap) -> Self {
        let rebuild = |a: &Self, b: &Self| (Box::new(a.substitute(map)), Box::new(b.substitute(map)));
        match self {
            ParameterExpression::Symbol(name) => match map.get(name) {
                Some(expr) => expr.clone(),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.substitute(map))),
            ParameterExpression::Add(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Add(a, b)
            }
            ParameterExpression::Sub(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Sub(a, b)
            }
            ParameterExpression::Mul(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Mul(a, b)
            }
            ParameterExpression::Div(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Div(a, b)
            }
        }
    }

    /// Bind a single symbol to a value.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.substitute(&ParameterMap::new().map(name, ParameterExpression::Constant(value)))
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::Symbol(name.to_string())
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

/// Concrete values for named angles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterBindings(FxHashMap<String, f64>);

impl ParameterBindings {
    /// Empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Insert or replace a binding.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Names of all bound symbols.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ParameterBindings {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Symbol-to-expression substitutions applied when splicing a sub-circuit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap(FxHashMap<String, ParameterExpression>);

impl ParameterMap {
    /// Empty map; every symbol keeps its name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `expr`.
    #[must_use]
    pub fn map(mut self, name: impl Into<String>, expr: impl Into<ParameterExpression>) -> Self {
        self.0.insert(name.into(), expr.into());
        self
    }

    /// Substitution for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ParameterExpression> {
        self.0.get(name)
    }

    /// Whether the map renames nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
