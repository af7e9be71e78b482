//! Factor schema definitions
//!
//! Declares which factors feed the composite cluster score, how each factor
//! is matched, and its weight. Two presets cover the supported scoring
//! modes; custom schemas are validated and normalized the same way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One signal of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Candidate item is in the target item's cluster
    Cluster,
    Category,
    Season,
    /// Candidate's purchaser is in the target user's cluster
    UserCluster,
    Price,
    Color,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Cluster,
        Factor::Category,
        Factor::Season,
        Factor::UserCluster,
        Factor::Price,
        Factor::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Factor::Cluster => "cluster",
            Factor::Category => "category",
            Factor::Season => "season",
            Factor::UserCluster => "user_cluster",
            Factor::Price => "price",
            Factor::Color => "color",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How factor indicators combine into a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// `base_similarity × Σ weight · match`
    #[default]
    SimilarityTimesFactors,
    /// `Σ weight · match`, no base similarity
    WeightedBoolean,
}

/// How a single factor is matched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Matcher {
    /// 1 if equal, 0 otherwise
    Exact,
    /// `max(0, 1 - |a - b| / max(target, 1))`
    Proximity,
    /// 1 if the candidate lies within `±tolerance × target`, 0 otherwise
    Band { tolerance: f64 },
}

/// Configuration of a single factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorConfig {
    pub weight: f32,
    pub matcher: Matcher,
}

impl FactorConfig {
    pub fn exact(weight: f32) -> Self {
        Self {
            weight,
            matcher: Matcher::Exact,
        }
    }

    pub fn proximity(weight: f32) -> Self {
        Self {
            weight,
            matcher: Matcher::Proximity,
        }
    }

    pub fn band(weight: f32, tolerance: f64) -> Self {
        Self {
            weight,
            matcher: Matcher::Band { tolerance },
        }
    }
}

/// Weighted factor schema for composite scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSchema {
    #[serde(default)]
    pub mode: ScoringMode,
    pub factors: BTreeMap<Factor, FactorConfig>,
}

impl FactorSchema {
    pub fn new(mode: ScoringMode, factors: BTreeMap<Factor, FactorConfig>) -> Self {
        Self { mode, factors }
    }

    /// Cosine base similarity multiplied by weighted factor matches
    pub fn similarity_times_factors() -> Self {
        Self::new(
            ScoringMode::SimilarityTimesFactors,
            BTreeMap::from([
                (Factor::Cluster, FactorConfig::exact(0.31)),
                (Factor::Category, FactorConfig::exact(0.25)),
                (Factor::Season, FactorConfig::exact(0.15)),
                (Factor::UserCluster, FactorConfig::exact(0.19)),
                (Factor::Price, FactorConfig::proximity(0.05)),
                (Factor::Color, FactorConfig::exact(0.05)),
            ]),
        )
    }

    /// Additive weighted matches with a ±20% price band
    pub fn weighted_boolean() -> Self {
        Self::new(
            ScoringMode::WeightedBoolean,
            BTreeMap::from([
                (Factor::Cluster, FactorConfig::exact(0.40)),
                (Factor::Category, FactorConfig::exact(0.20)),
                (Factor::Season, FactorConfig::exact(0.15)),
                (Factor::UserCluster, FactorConfig::exact(0.15)),
                (Factor::Price, FactorConfig::band(0.05, 0.2)),
                (Factor::Color, FactorConfig::exact(0.05)),
            ]),
        )
    }

    /// Preset for a scoring mode
    pub fn for_mode(mode: ScoringMode) -> Self {
        match mode {
            ScoringMode::SimilarityTimesFactors => Self::similarity_times_factors(),
            ScoringMode::WeightedBoolean => Self::weighted_boolean(),
        }
    }

    /// Validate the schema
    /// - Checks that weights are non-negative
    /// - Normalizes weights to sum to 1.0 if they don't
    pub fn validate_and_normalize(&mut self) -> Result<(), SchemaError> {
        if self.factors.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (factor, config) in &self.factors {
            if !(config.weight >= 0.0) {
                return Err(SchemaError::NegativeWeight(*factor));
            }
            if let Matcher::Band { tolerance } = config.matcher {
                if !(tolerance >= 0.0) {
                    return Err(SchemaError::InvalidTolerance(*factor));
                }
            }
        }

        let weight_sum: f32 = self.factors.values().map(|f| f.weight).sum();
        if weight_sum <= 0.0 {
            return Err(SchemaError::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 0.001 {
            for config in self.factors.values_mut() {
                config.weight /= weight_sum;
            }
        }

        Ok(())
    }

    pub fn weight(&self, factor: Factor) -> f32 {
        self.factors.get(&factor).map_or(0.0, |c| c.weight)
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Factor '{0}' has a negative weight")]
    NegativeWeight(Factor),

    #[error("Factor '{0}' has a negative price tolerance")]
    InvalidTolerance(Factor),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_sum_to_one() {
        for mut schema in [
            FactorSchema::similarity_times_factors(),
            FactorSchema::weighted_boolean(),
        ] {
            let before = schema.clone();
            schema.validate_and_normalize().unwrap();
            assert_eq!(schema, before);
            let sum: f32 = schema.factors.values().map(|f| f.weight).sum();
            assert!((sum - 1.0).abs() < 1e-3);
            assert_eq!(schema.factors.len(), 6);
        }
    }

    #[test]
    fn test_schema_normalization() {
        let mut schema = FactorSchema::new(
            ScoringMode::WeightedBoolean,
            BTreeMap::from([
                (Factor::Category, FactorConfig::exact(2.0)),
                (Factor::Color, FactorConfig::exact(2.0)),
            ]),
        );
        schema.validate_and_normalize().unwrap();
        assert!((schema.weight(Factor::Category) - 0.5).abs() < 1e-6);
        assert_eq!(schema.weight(Factor::Season), 0.0);
    }

    #[test]
    fn test_empty_schema_error() {
        let mut schema = FactorSchema::new(ScoringMode::default(), BTreeMap::new());
        assert_eq!(schema.validate_and_normalize(), Err(SchemaError::EmptySchema));
    }

    #[test]
    fn test_negative_weight_error() {
        let mut schema = FactorSchema::new(
            ScoringMode::default(),
            BTreeMap::from([(Factor::Price, FactorConfig::proximity(-0.5))]),
        );
        assert_eq!(
            schema.validate_and_normalize(),
            Err(SchemaError::NegativeWeight(Factor::Price))
        );
    }

    #[test]
    fn test_zero_total_weight_error() {
        let mut schema = FactorSchema::new(
            ScoringMode::default(),
            BTreeMap::from([(Factor::Color, FactorConfig::exact(0.0))]),
        );
        assert_eq!(schema.validate_and_normalize(), Err(SchemaError::ZeroTotalWeight));
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = FactorSchema::weighted_boolean();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: FactorSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}
