//! Item-similarity collaborative filtering
//!
//! Recommends the items most similar to the one the target customer bought.
//! Identity and price are left out of the item features.

use crate::config::RecommenderConfig;
use crate::outcome::{RecommendOutcome, Recommendation, Target};
use crate::strategy::{Recommender, StrategyKind};
use crate::Result;
use shoprec_core::{CustomerId, Dataset, EncodedMatrix, FeatureEncoder, Field, SimilarityMatrix};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ItemBasedRecommender {
    dataset: Arc<Dataset>,
    encoded: EncodedMatrix,
    similarity: SimilarityMatrix,
    min_similarity: f32,
}

impl ItemBasedRecommender {
    pub const FIELDS: [Field; 4] = [Field::ItemName, Field::Category, Field::Color, Field::Season];

    pub fn new(dataset: Arc<Dataset>, config: &RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let encoded = FeatureEncoder::new(&Self::FIELDS).encode(dataset.items())?;
        let similarity = SimilarityMatrix::build(&encoded)?;
        info!(items = dataset.len(), dim = encoded.dim(), "item-based recommender ready");

        Ok(Self {
            dataset,
            encoded,
            similarity,
            min_similarity: config.min_similarity,
        })
    }

    pub fn encoded(&self) -> &EncodedMatrix {
        &self.encoded
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}

impl Recommender for ItemBasedRecommender {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ItemBased
    }

    fn recommend(&self, customer_id: CustomerId, n: usize) -> RecommendOutcome {
        let Some(row) = self.dataset.item_row(customer_id) else {
            warn!(customer_id, "unknown customer, no purchased item");
            return RecommendOutcome::UnknownTarget;
        };

        let recommendations: Vec<Recommendation> = self
            .similarity
            .ranked_neighbours(row, self.min_similarity)
            .into_iter()
            .filter_map(|(neighbour, sim)| Recommendation::for_item_row(&self.dataset, neighbour, sim))
            .take(n)
            .collect();

        if recommendations.is_empty() {
            debug!(customer_id, min_similarity = self.min_similarity, "no similar items");
            return RecommendOutcome::NoCandidates;
        }

        RecommendOutcome::Recommended {
            target: Target::Item(self.dataset.items()[row].clone()),
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::shop;

    fn recommender() -> ItemBasedRecommender {
        ItemBasedRecommender::new(shop(), &RecommenderConfig::default()).unwrap()
    }

    #[test]
    fn test_identical_item_scores_one() {
        let outcome = recommender().recommend(1, 3);
        let first = &outcome.recommendations()[0];
        assert_eq!(first.purchaser.customer_id, 2);
        assert_eq!(first.item.item_name.as_deref(), Some("Jeans"));
        assert!((first.similarity - 1.0).abs() < 1e-6);

        match outcome.target() {
            Some(Target::Item(item)) => assert_eq!(item.customer_id, 1),
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_excludes_target_and_sorted() {
        let outcome = recommender().recommend(5, 10);
        let recs = outcome.recommendations();
        assert!(!recs.is_empty() && recs.len() <= 10);
        assert!(recs.iter().all(|r| r.item.customer_id != 5));
        assert!(recs.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(recs.iter().all(|r| r.similarity >= 0.1));
    }

    #[test]
    fn test_price_not_encoded() {
        let r = recommender();
        assert!(r.encoded().columns().iter().all(|c| !c.starts_with("PurchaseAmount")));
        // items 3 and 4 differ only by price
        assert!((r.similarity().get(2, 3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_customer() {
        assert_eq!(recommender().recommend(0, 5), RecommendOutcome::UnknownTarget);
    }
}
