//! Serializable run summaries for downstream plotting and analysis.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::QaoaResult;
use crate::problems::KnapsackProblem;

/// Outcome of a runner at a fixed angle vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaoaReport {
    /// The instance that was solved.
    pub problem: KnapsackProblem,
    /// Strategy name.
    pub strategy: String,
    /// Number of layers `p`.
    pub layers: usize,
    /// Angles `[gamma_0, beta_0, ...]`.
    pub angles: Vec<f64>,
    /// Strategy objective expectation.
    pub objective_value: f64,
    /// Comparable expectation over the optimum value.
    pub approximation_ratio: f64,
    /// Choice-register distribution, item 0 first.
    pub distribution: BTreeMap<String, f64>,
}

impl QaoaReport {
    /// Most likely choice bitstring.
    pub fn most_likely_choice(&self) -> Option<(&str, f64)> {
        self.distribution
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (bits, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((bits.as_str(), p)),
            })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> QaoaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QaoaReport {
        QaoaReport {
            problem: KnapsackProblem::toy("A").unwrap(),
            strategy: "linear".into(),
            layers: 1,
            angles: vec![0.5, 1.0],
            objective_value: 1.5,
            approximation_ratio: 0.75,
            distribution: [("01".to_string(), 0.75), ("10".to_string(), 0.25)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_most_likely_choice() {
        assert_eq!(sample().most_likely_choice(), Some(("01", 0.75)));
    }

    #[test]
    fn test_json_fields() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["strategy"], "linear");
        assert_eq!(json["problem"]["max_weight"], 1);
        assert_eq!(json["distribution"]["01"], 0.75);
    }
}
