//! User-similarity collaborative filtering
//!
//! Recommends the items bought by the customers most similar to the target
//! customer.

use crate::config::RecommenderConfig;
use crate::outcome::{RecommendOutcome, Recommendation, Target};
use crate::strategy::{Recommender, StrategyKind};
use crate::Result;
use shoprec_core::{CustomerId, Dataset, EncodedMatrix, FeatureEncoder, Field, SimilarityMatrix};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct UserBasedRecommender {
    dataset: Arc<Dataset>,
    encoded: EncodedMatrix,
    similarity: SimilarityMatrix,
    min_similarity: f32,
}

impl UserBasedRecommender {
    /// Every user attribute takes part in the similarity
    pub const FIELDS: [Field; 7] = Field::USER_FIELDS;

    pub fn new(dataset: Arc<Dataset>, config: &RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let encoded = FeatureEncoder::new(&Self::FIELDS).encode(dataset.users())?;
        let similarity = SimilarityMatrix::build(&encoded)?;
        info!(users = dataset.len(), dim = encoded.dim(), "user-based recommender ready");

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

impl Recommender for UserBasedRecommender {
    fn kind(&self) -> StrategyKind {
        StrategyKind::UserBased
    }

    fn recommend(&self, customer_id: CustomerId, n: usize) -> RecommendOutcome {
        let Some(row) = self.dataset.user_row(customer_id) else {
            warn!(customer_id, "unknown user");
            return RecommendOutcome::UnknownTarget;
        };

        let recommendations: Vec<Recommendation> = self
            .similarity
            .ranked_neighbours(row, self.min_similarity)
            .into_iter()
            .filter_map(|(neighbour, sim)| {
                let neighbour_id = self.dataset.users()[neighbour].customer_id;
                let item_row = self.dataset.item_row(neighbour_id)?;
                Recommendation::for_item_row(&self.dataset, item_row, sim)
            })
            .take(n)
            .collect();

        if recommendations.is_empty() {
            debug!(customer_id, min_similarity = self.min_similarity, "no similar users");
            return RecommendOutcome::NoCandidates;
        }

        RecommendOutcome::Recommended {
            target: Target::User(self.dataset.users()[row].clone()),
            recommendations,
        }
    }
}
