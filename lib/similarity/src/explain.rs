//! Explainability for composite scores
//!
//! Per-factor contributions of a single score, and summary statistics over
//! a scored candidate pool.

use crate::schema::Factor;
use serde::Serialize;
use std::collections::BTreeMap;

/// A composite score with the contribution of each factor.
///
/// Contributions already include the factor weight and, in
/// similarity-times-factors mode, the base similarity, so they sum to `score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub score: f32,
    pub base_similarity: f32,
    pub contributions: BTreeMap<Factor, f32>,
}

impl FactorScore {
    /// Factor with the largest contribution
    pub fn top_factor(&self) -> Option<Factor> {
        self.contributions
            .iter()
            .filter(|(_, &c)| c > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&factor, _)| factor)
    }

    /// Contributions keyed by factor name
    pub fn named_contributions(&self) -> BTreeMap<String, f32> {
        self.contributions
            .iter()
            .map(|(factor, &c)| (factor.name().to_string(), c))
            .collect()
    }
}

/// Summary statistics of a scored candidate pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    /// Number of candidates scored
    pub candidates_count: usize,
    /// Number of candidates at or above the threshold
    pub passed_count: usize,
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}

impl ScoreStats {
    pub fn compute(scores: &[f32], threshold: f32) -> Self {
        if scores.is_empty() {
            return Self {
                candidates_count: 0,
                passed_count: 0,
                mean: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        Self {
            candidates_count: scores.len(),
            passed_count: scores.iter().filter(|&&s| s >= threshold).count(),
            mean,
            min,
            max,
        }
    }
}
