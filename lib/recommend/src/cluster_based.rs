//! Cluster-weighted hybrid recommender
//!
//! Users and items are clustered independently. Candidates are then ranked
//! by a composite score that blends item-cluster and user-cluster
//! membership, categorical matches and price proximity, optionally scaled
//! by a dedicated cosine similarity.

use crate::config::RecommenderConfig;
use crate::insights::{item_insights, user_insights, ClusterInsights};
use crate::outcome::{ClusterAnnotation, RecommendOutcome, Recommendation, Target};
use crate::strategy::{Recommender, StrategyKind};
use crate::Result;
use shoprec_core::{
    ClusterAssignment, ClusterEngine, CustomerId, Dataset, FeatureEncoder, Field, SimilarityMatrix,
};
use shoprec_similarity::{CompositeScorer, FactorProfile, FactorSchema, ScoringMode};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ClusterRecommender {
    dataset: Arc<Dataset>,
    user_clusters: ClusterAssignment,
    item_clusters: ClusterAssignment,
    /// Base similarity between items
    similarity: SimilarityMatrix,
    scorer: CompositeScorer,
    threshold: f32,
}

impl ClusterRecommender {
    /// Behavioural and demographic features for user clustering
    pub const USER_CLUSTER_FIELDS: [Field; 6] = [
        Field::Age,
        Field::Gender,
        Field::PreviousPurchases,
        Field::PurchaseFrequency,
        Field::Size,
        Field::SubscriptionStatus,
    ];

    pub const ITEM_CLUSTER_FIELDS: [Field; 3] = [Field::ItemName, Field::Category, Field::Season];

    /// Features of the base similarity
    pub const SIMILARITY_FIELDS: [Field; 4] =
        [Field::ItemName, Field::Category, Field::Color, Field::Season];

    /// Build with the preset factor weights of `config.scoring`
    pub fn new(dataset: Arc<Dataset>, config: &RecommenderConfig) -> Result<Self> {
        Self::with_schema(dataset, config, FactorSchema::for_mode(config.scoring))
    }

    /// Build with custom factor weights
    pub fn with_schema(
        dataset: Arc<Dataset>,
        config: &RecommenderConfig,
        schema: FactorSchema,
    ) -> Result<Self> {
        config.validate()?;
        let scorer = CompositeScorer::new(schema)?;
        let engine = ClusterEngine::new(config.cluster.clone(), config.seed)?;

        let users = FeatureEncoder::new(&Self::USER_CLUSTER_FIELDS).encode(dataset.users())?;
        let user_clusters = engine.fit(&users);

        let items = FeatureEncoder::new(&Self::ITEM_CLUSTER_FIELDS).encode(dataset.items())?;
        let item_clusters = engine.fit(&items);

        let base = FeatureEncoder::new(&Self::SIMILARITY_FIELDS).encode(dataset.items())?;
        let similarity = SimilarityMatrix::build(&base)?;

        let threshold = config.cluster_threshold();
        info!(
            user_k = user_clusters.k(),
            item_k = item_clusters.k(),
            mode = ?scorer.mode(),
            threshold,
            "cluster recommender ready"
        );

        Ok(Self {
            dataset,
            user_clusters,
            item_clusters,
            similarity,
            scorer,
            threshold,
        })
    }

    pub fn user_clusters(&self) -> &ClusterAssignment {
        &self.user_clusters
    }

    pub fn item_clusters(&self) -> &ClusterAssignment {
        &self.item_clusters
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scorer.mode()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Aggregates for every user and item cluster
    pub fn insights(&self) -> ClusterInsights {
        ClusterInsights {
            user_clusters: user_insights(self.dataset.users(), &self.user_clusters),
            item_clusters: item_insights(self.dataset.items(), &self.item_clusters),
        }
    }

    /// Profile of the item at `item_row`, carrying its purchaser's cluster
    fn profile(&self, item_row: usize) -> Option<FactorProfile<'_>> {
        let item = self.dataset.items().get(item_row)?;
        let user_row = self.dataset.user_row(item.customer_id)?;
        Some(FactorProfile::from_item(
            item,
            self.item_clusters.label(item_row)?,
            self.user_clusters.label(user_row)?,
        ))
    }
}

impl Recommender for ClusterRecommender {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ClusterBased
    }

    fn recommend(&self, customer_id: CustomerId, n: usize) -> RecommendOutcome {
        let Some((row, target)) = self
            .dataset
            .item_row(customer_id)
            .and_then(|row| Some((row, self.profile(row)?)))
        else {
            warn!(customer_id, "unknown customer, no purchased item");
            return RecommendOutcome::UnknownTarget;
        };

        let items = self.dataset.items();
        let candidates = (0..items.len())
            .filter(|&c| c != row && items[c].customer_id != customer_id)
            .filter_map(|c| Some((c, self.profile(c)?, self.similarity.get(row, c))));

        let (ranked, stats) = self.scorer.rank(&target, candidates, self.threshold);
        debug!(
            customer_id,
            candidates = stats.candidates_count,
            passed = stats.passed_count,
            mean = stats.mean,
            max = stats.max,
            "composite scores"
        );

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .filter_map(|candidate| {
                let profile = self.profile(candidate.row)?;
                let mut rec =
                    Recommendation::for_item_row(&self.dataset, candidate.row, candidate.score.score)?;
                rec.clusters = Some(ClusterAnnotation {
                    user_cluster: profile.user_cluster?,
                    item_cluster: profile.item_cluster?,
                    contributions: candidate.score.contributions,
                });
                Some(rec)
            })
            .take(n)
            .collect();

        if recommendations.is_empty() {
            debug!(customer_id, threshold = self.threshold, "no candidate cleared the threshold");
            return RecommendOutcome::NoCandidates;
        }

        RecommendOutcome::Recommended {
            target: Target::Item(items[row].clone()),
            recommendations,
        }
    }
}
