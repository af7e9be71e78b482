//! Composite scorer for cluster-weighted recommendations
//!
//! Blends cluster membership, categorical matches and price proximity into a
//! single score with per-factor contributions.

use crate::distance::{categorical_match, label_match, price_match};
use crate::explain::{FactorScore, ScoreStats};
use crate::schema::{Factor, FactorSchema, SchemaError, ScoringMode};
use ordered_float::OrderedFloat;
use shoprec_core::ItemRecord;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// The attributes a factor can compare, for either side of a pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorProfile<'a> {
    pub item_cluster: Option<usize>,
    pub user_cluster: Option<usize>,
    pub category: Option<&'a str>,
    pub season: Option<&'a str>,
    pub color: Option<&'a str>,
    pub price: Option<f64>,
}

impl<'a> FactorProfile<'a> {
    /// Profile of a purchased item, with the item's cluster and its
    /// purchaser's cluster
    pub fn from_item(item: &'a ItemRecord, item_cluster: usize, user_cluster: usize) -> Self {
        Self {
            item_cluster: Some(item_cluster),
            user_cluster: Some(user_cluster),
            category: item.category.as_deref(),
            season: item.season.as_deref(),
            color: item.color.as_deref(),
            price: item.purchase_amount.filter(|p| p.is_finite()),
        }
    }
}

/// A candidate that passed the threshold, with its explained score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub row: usize,
    pub score: FactorScore,
}

/// Scores candidates against a target with a validated [`FactorSchema`]
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    schema: FactorSchema,
}

impl CompositeScorer {
    pub fn new(mut schema: FactorSchema) -> Result<Self, SchemaError> {
        schema.validate_and_normalize()?;
        Ok(Self { schema })
    }

    /// Scorer with the preset weights of `mode`
    pub fn for_mode(mode: ScoringMode) -> Self {
        Self {
            schema: FactorSchema::for_mode(mode),
        }
    }

    pub fn schema(&self) -> &FactorSchema {
        &self.schema
    }

    pub fn mode(&self) -> ScoringMode {
        self.schema.mode
    }

    /// Score one candidate.
    ///
    /// `base_similarity` only scales the result in
    /// [`ScoringMode::SimilarityTimesFactors`]; the weighted-boolean mode
    /// ignores it. If no factor matches, the score is exactly 0.
    pub fn score(
        &self,
        target: &FactorProfile<'_>,
        candidate: &FactorProfile<'_>,
        base_similarity: f32,
    ) -> FactorScore {
        let scale = match self.schema.mode {
            ScoringMode::SimilarityTimesFactors => base_similarity,
            ScoringMode::WeightedBoolean => 1.0,
        };

        let mut contributions = BTreeMap::new();
        let mut total = 0.0f32;

        for (&factor, config) in &self.schema.factors {
            let matched = match factor {
                Factor::Cluster => match (target.item_cluster, candidate.item_cluster) {
                    (Some(a), Some(b)) => label_match(a, b),
                    _ => 0.0,
                },
                Factor::UserCluster => match (target.user_cluster, candidate.user_cluster) {
                    (Some(a), Some(b)) => label_match(a, b),
                    _ => 0.0,
                },
                Factor::Category => categorical_match(target.category, candidate.category),
                Factor::Season => categorical_match(target.season, candidate.season),
                Factor::Color => categorical_match(target.color, candidate.color),
                Factor::Price => match (target.price, candidate.price) {
                    (Some(t), Some(c)) => price_match(t, c, config.matcher),
                    _ => 0.0,
                },
            };

            let contribution = matched * config.weight * scale;
            contributions.insert(factor, contribution);
            total += contribution;
        }

        FactorScore {
            score: total,
            base_similarity,
            contributions,
        }
    }

    /// Score every candidate, keep those at or above `threshold`, best first.
    ///
    /// Equal scores keep ascending row order.
    pub fn rank<'a, I>(
        &self,
        target: &FactorProfile<'_>,
        candidates: I,
        threshold: f32,
    ) -> (Vec<ScoredCandidate>, ScoreStats)
    where
        I: IntoIterator<Item = (usize, FactorProfile<'a>, f32)>,
    {
        let mut all_scores = Vec::new();
        let mut passed: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter_map(|(row, profile, base)| {
                let score = self.score(target, &profile, base);
                all_scores.push(score.score);
                (score.score >= threshold).then_some(ScoredCandidate { row, score })
            })
            .collect();

        passed.sort_by_key(|c| (Reverse(OrderedFloat(c.score.score)), c.row));

        (passed, ScoreStats::compute(&all_scores, threshold))
    }

    /// Create a new scorer with custom weight overrides
    ///
    /// Factors not in the overrides keep their weights; factors absent from
    /// the schema are ignored. Weights are re-normalized afterwards.
    pub fn with_weights(&self, overrides: &BTreeMap<Factor, f32>) -> Result<Self, SchemaError> {
        let mut schema = self.schema.clone();
        for (factor, &weight) in overrides {
            if let Some(config) = schema.factors.get_mut(factor) {
                config.weight = weight.max(0.0);
            }
        }
        Self::new(schema)
    }
}
