//! Recommender and evaluator settings
//!
//! Both structs deserialize from partial JSON; missing keys take the
//! defaults below.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use shoprec_core::ClusterConfig;
use shoprec_similarity::ScoringMode;

/// Default minimum similarity for all three strategies
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;

/// Default composite-score threshold of the weighted-boolean mode
pub const WEIGHTED_BOOLEAN_THRESHOLD: f32 = 0.3;

/// Default k-means seed
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Entries scoring below this are never returned
    pub min_similarity: f32,
    pub seed: u64,
    pub cluster: ClusterConfig,
    pub scoring: ScoringMode,
    /// Overrides the cluster recommender's threshold
    pub cluster_min_score: Option<f32>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            seed: DEFAULT_SEED,
            cluster: ClusterConfig::default(),
            scoring: ScoringMode::default(),
            cluster_min_score: None,
        }
    }
}

impl RecommenderConfig {
    /// Composite-score threshold of the cluster recommender.
    ///
    /// Without an override, similarity-times-factors uses `min_similarity`
    /// and weighted-boolean uses [`WEIGHTED_BOOLEAN_THRESHOLD`].
    pub fn cluster_threshold(&self) -> f32 {
        self.cluster_min_score.unwrap_or(match self.scoring {
            ScoringMode::SimilarityTimesFactors => self.min_similarity,
            ScoringMode::WeightedBoolean => WEIGHTED_BOOLEAN_THRESHOLD,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_similarity.is_finite() {
            return Err(Error::InvalidConfig("min_similarity must be finite".to_string()));
        }
        if let Some(score) = self.cluster_min_score {
            if !score.is_finite() {
                return Err(Error::InvalidConfig("cluster_min_score must be finite".to_string()));
            }
        }
        self.cluster.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Each recommender is asked for `n * oversample` entries (saturating)
    pub oversample: usize,
    /// Jointly min-max normalize the averaged scores
    pub normalize: bool,
    /// Absolute price difference that still earns the price bonus
    pub price_tolerance: f64,
    pub season_bonus: f64,
    pub color_bonus: f64,
    pub price_bonus: f64,
    /// Run trials on the rayon pool
    pub parallel: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            oversample: 1,
            normalize: true,
            price_tolerance: 20.0,
            season_bonus: 0.1,
            color_bonus: 0.05,
            price_bonus: 0.05,
            parallel: true,
        }
    }
}

impl EvaluatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.oversample == 0 {
            return Err(Error::InvalidConfig("oversample must be at least 1".to_string()));
        }
        if !(self.price_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(
                "price_tolerance must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
