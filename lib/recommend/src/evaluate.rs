//! Evaluation harness
//!
//! Sweeps recommendation counts over a set of test customers, scores each
//! strategy's lists against the customer's own purchase and averages per
//! count. Averages can be min-max normalized jointly across strategies so
//! the comparison is relative.

use crate::cluster_based::ClusterRecommender;
use crate::config::{EvaluatorConfig, RecommenderConfig};
use crate::item_based::ItemBasedRecommender;
use crate::outcome::Recommendation;
use crate::strategy::{Recommender, StrategyKind};
use crate::user_based::UserBasedRecommender;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use shoprec_core::{CustomerId, Dataset, FeatureEncoder, Field, ItemRecord, SimilarityMatrix};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Default sweep: 10, 20, ..., 100
pub fn default_counts() -> Vec<usize> {
    (10..=100).step_by(10).collect()
}

/// Up to `n` distinct customer ids drawn with a seeded generator
pub fn sample_test_users(dataset: &Dataset, n: usize, seed: u64) -> Vec<CustomerId> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = n.min(dataset.len());
    rand::seq::index::sample(&mut rng, dataset.len(), amount)
        .into_iter()
        .map(|row| dataset.users()[row].customer_id)
        .collect()
}

/// Per-strategy scores aligned with `counts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub counts: Vec<usize>,
    pub scores: BTreeMap<StrategyKind, Vec<f64>>,
    /// Number of scored trials behind each score
    pub trials: BTreeMap<StrategyKind, Vec<usize>>,
    pub normalized: bool,
}

impl EvaluationResult {
    pub fn scores_for(&self, kind: StrategyKind) -> Option<&[f64]> {
        self.scores.get(&kind).map(Vec::as_slice)
    }

    /// Strategy with the highest mean score over the sweep
    pub fn best_strategy(&self) -> Option<StrategyKind> {
        self.scores
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(&kind, s)| (kind, s.iter().sum::<f64>() / s.len() as f64))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(kind, _)| kind)
    }
}

pub struct Evaluator {
    dataset: Arc<Dataset>,
    /// Item similarity used to score recommendations
    similarity: SimilarityMatrix,
    recommenders: Vec<Box<dyn Recommender>>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub const FIELDS: [Field; 5] = [
        Field::ItemName,
        Field::Category,
        Field::Color,
        Field::Season,
        Field::PurchaseAmount,
    ];

    pub fn new(
        dataset: Arc<Dataset>,
        recommenders: Vec<Box<dyn Recommender>>,
        config: EvaluatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let encoded = FeatureEncoder::new(&Self::FIELDS).encode(dataset.items())?;
        let similarity = SimilarityMatrix::build(&encoded)?;

        Ok(Self {
            dataset,
            similarity,
            recommenders,
            config,
        })
    }

    /// Evaluator over the user-based, item-based and cluster recommenders
    pub fn with_default_recommenders(
        dataset: Arc<Dataset>,
        recommender_config: &RecommenderConfig,
        config: EvaluatorConfig,
    ) -> Result<Self> {
        let recommenders: Vec<Box<dyn Recommender>> = vec![
            Box::new(UserBasedRecommender::new(dataset.clone(), recommender_config)?),
            Box::new(ItemBasedRecommender::new(dataset.clone(), recommender_config)?),
            Box::new(ClusterRecommender::new(dataset.clone(), recommender_config)?),
        ];
        Self::new(dataset, recommenders, config)
    }

    pub fn strategies(&self) -> Vec<StrategyKind> {
        self.recommenders.iter().map(|r| r.kind()).collect()
    }

    /// Score one list against the item `customer_id` bought.
    ///
    /// Each entry is matched to the best item sharing its name or category
    /// (other customers only). Returns 0 when fewer than `n` entries match.
    pub fn score_recommendations(
        &self,
        customer_id: CustomerId,
        recommendations: &[Recommendation],
        n: usize,
    ) -> f64 {
        let Some(target_row) = self.dataset.item_row(customer_id) else {
            return 0.0;
        };
        if n == 0 {
            return 0.0;
        }

        let items = self.dataset.items();
        let target = &items[target_row];
        let mut matched = Vec::with_capacity(n.min(recommendations.len()));

        for rec in recommendations {
            let best = items
                .iter()
                .enumerate()
                .filter(|(_, c)| c.customer_id != customer_id && shares_name_or_category(c, &rec.item))
                .map(|(row, c)| self.similarity.get(target_row, row) as f64 + self.bonus(target, c))
                .fold(None, |best: Option<f64>, score| match best {
                    Some(b) if b >= score => Some(b),
                    _ => Some(score),
                });

            if let Some(score) = best {
                matched.push(score);
            }
            if matched.len() >= n {
                break;
            }
        }

        if matched.len() < n {
            return 0.0;
        }
        matched.iter().sum::<f64>() / n as f64
    }

    fn bonus(&self, target: &ItemRecord, candidate: &ItemRecord) -> f64 {
        let mut bonus = 0.0;
        if both_equal(&target.season, &candidate.season) {
            bonus += self.config.season_bonus;
        }
        if both_equal(&target.color, &candidate.color) {
            bonus += self.config.color_bonus;
        }
        if let (Some(a), Some(b)) = (target.purchase_amount, candidate.purchase_amount) {
            if (a - b).abs() <= self.config.price_tolerance {
                bonus += self.config.price_bonus;
            }
        }
        bonus
    }

    /// One trial: every strategy for one customer at one count
    fn trial(&self, customer_id: CustomerId, n: usize) -> Vec<Option<f64>> {
        self.recommenders
            .iter()
            .map(|recommender| {
                let requested = n.saturating_mul(self.config.oversample);
                let outcome = recommender.recommend(customer_id, requested);
                (!outcome.is_empty())
                    .then(|| self.score_recommendations(customer_id, outcome.recommendations(), n))
            })
            .collect()
    }

    pub fn evaluate(&self, test_users: &[CustomerId], counts: &[usize]) -> EvaluationResult {
        info!(
            users = test_users.len(),
            counts = ?counts,
            strategies = self.recommenders.len(),
            "evaluation started"
        );

        let jobs: Vec<(usize, CustomerId)> = counts
            .iter()
            .flat_map(|&n| test_users.iter().map(move |&id| (n, id)))
            .collect();

        // collect keeps job order in both modes
        let outcomes: Vec<Vec<Option<f64>>> = if self.config.parallel {
            jobs.par_iter().map(|&(n, id)| self.trial(id, n)).collect()
        } else {
            jobs.iter().map(|&(n, id)| self.trial(id, n)).collect()
        };

        let mut scores: BTreeMap<StrategyKind, Vec<f64>> = BTreeMap::new();
        let mut trials: BTreeMap<StrategyKind, Vec<usize>> = BTreeMap::new();

        for (count_index, &n) in counts.iter().enumerate() {
            let per_count = &outcomes[count_index * test_users.len()..(count_index + 1) * test_users.len()];

            for (strategy, recommender) in self.recommenders.iter().enumerate() {
                let scored: Vec<f64> = per_count.iter().filter_map(|trial| trial[strategy]).collect();
                let average = if scored.is_empty() {
                    0.0
                } else {
                    scored.iter().sum::<f64>() / scored.len() as f64
                };
                debug!(strategy = %recommender.kind(), n, trials = scored.len(), average, "count scored");

                scores.entry(recommender.kind()).or_default().push(average);
                trials.entry(recommender.kind()).or_default().push(scored.len());
            }
        }

        if self.config.normalize {
            normalize_jointly(&mut scores);
        }

        for (kind, values) in &scores {
            info!(strategy = %kind, scores = ?values, "evaluation finished");
        }

        EvaluationResult {
            counts: counts.to_vec(),
            scores,
            trials,
            normalized: self.config.normalize,
        }
    }
}

fn shares_name_or_category(candidate: &ItemRecord, recommended: &ItemRecord) -> bool {
    both_equal(&candidate.item_name, &recommended.item_name)
        || both_equal(&candidate.category, &recommended.category)
}

fn both_equal(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Min-max scale every value against the range of all strategies together.
/// A zero range maps everything to 0.
fn normalize_jointly(scores: &mut BTreeMap<StrategyKind, Vec<f64>>) {
    let all = scores.values().flatten().copied();
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = max - min;

    for values in scores.values_mut() {
        for v in values.iter_mut() {
            *v = if range > f64::EPSILON { (*v - min) / range } else { 0.0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::shop;

    fn evaluator(config: EvaluatorConfig) -> Evaluator {
        Evaluator::with_default_recommenders(shop(), &RecommenderConfig::default(), config).unwrap()
    }

    #[test]
    fn test_sweep_shape_and_range() {
        let e = evaluator(EvaluatorConfig::default());
        let result = e.evaluate(&[1, 3, 5, 7, 9], &[1, 2]);

        assert_eq!(result.counts, vec![1, 2]);
        assert!(result.normalized);
        for kind in StrategyKind::ALL {
            let scores = result.scores_for(kind).unwrap();
            assert_eq!(scores.len(), 2);
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        }
        assert!(result.best_strategy().is_some());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let users = [1, 2, 4, 6, 8, 10, 12];
        let parallel = evaluator(EvaluatorConfig::default()).evaluate(&users, &[1, 3]);
        let sequential = evaluator(EvaluatorConfig {
            parallel: false,
            ..EvaluatorConfig::default()
        })
        .evaluate(&users, &[1, 3]);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_score_with_bonuses() {
        let e = evaluator(EvaluatorConfig::default());
        let dataset = shop();
        let jeans = Recommendation::for_item_row(&dataset, 1, 1.0).unwrap();

        // best match for customer 1's Jeans is customer 2's identical Jeans:
        // cosine 1 + season 0.1 + color 0.05 + price 0.05
        let score = e.score_recommendations(1, &[jeans], 1);
        assert!((score - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_underfilled_list_scores_zero() {
        let e = evaluator(EvaluatorConfig::default());
        let dataset = shop();
        let rec = Recommendation::for_item_row(&dataset, 1, 1.0).unwrap();
        assert_eq!(e.score_recommendations(1, &[rec], 2), 0.0);
        assert_eq!(e.score_recommendations(1, &[], 1), 0.0);
        assert_eq!(e.score_recommendations(999, &[], 1), 0.0);
    }

    #[test]
    fn test_raw_scores_without_normalization() {
        let e = evaluator(EvaluatorConfig {
            normalize: false,
            ..EvaluatorConfig::default()
        });
        let result = e.evaluate(&[1, 2], &[1]);
        assert!(!result.normalized);
        let item_based = result.scores_for(StrategyKind::ItemBased).unwrap();
        assert!(item_based[0] > 1.0);
        assert_eq!(result.trials[&StrategyKind::ItemBased], vec![2]);
    }

    #[test]
    fn test_unknown_users_produce_no_trials() {
        let result = evaluator(EvaluatorConfig::default()).evaluate(&[404, 405], &[1]);
        for kind in StrategyKind::ALL {
            assert_eq!(result.scores_for(kind).unwrap(), &[0.0]);
            assert_eq!(result.trials[&kind], vec![0]);
        }
    }

    #[test]
    fn test_huge_count_saturates() {
        let e = evaluator(EvaluatorConfig {
            oversample: 3,
            normalize: false,
            parallel: false,
            ..EvaluatorConfig::default()
        });
        let result = e.evaluate(&[1], &[usize::MAX]);
        // no list can fill usize::MAX entries
        for kind in StrategyKind::ALL {
            assert_eq!(result.scores_for(kind).unwrap(), &[0.0]);
        }
    }

    #[test]
    fn test_oversampling_does_not_change_scores() {
        let users = [1, 3, 5, 7];
        let plain = evaluator(EvaluatorConfig::default()).evaluate(&users, &[1, 2]);
        let oversampled = evaluator(EvaluatorConfig {
            oversample: 2,
            ..EvaluatorConfig::default()
        })
        .evaluate(&users, &[1, 2]);
        assert_eq!(plain.scores, oversampled.scores);
    }

    #[test]
    fn test_normalize_jointly() {
        let mut scores = BTreeMap::from([
            (StrategyKind::UserBased, vec![0.5, 1.0]),
            (StrategyKind::ItemBased, vec![1.5, 2.5]),
        ]);
        normalize_jointly(&mut scores);
        assert_eq!(scores[&StrategyKind::UserBased], vec![0.0, 0.25]);
        assert_eq!(scores[&StrategyKind::ItemBased], vec![0.5, 1.0]);

        let mut flat = BTreeMap::from([(StrategyKind::ClusterBased, vec![0.7, 0.7])]);
        normalize_jointly(&mut flat);
        assert_eq!(flat[&StrategyKind::ClusterBased], vec![0.0, 0.0]);
    }

    #[test]
    fn test_sample_test_users() {
        let dataset = shop();
        let sample = sample_test_users(&dataset, 5, 42);
        assert_eq!(sample.len(), 5);
        assert_eq!(sample, sample_test_users(&dataset, 5, 42));
        let mut unique = sample.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 5);
        assert_eq!(sample_test_users(&dataset, 100, 42).len(), 12);
    }

    #[test]
    fn test_default_counts() {
        assert_eq!(default_counts(), vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }
}
