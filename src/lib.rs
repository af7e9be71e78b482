//! # shoprec
//!
//! A retail recommender with three interchangeable strategies and a harness
//! that compares them.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! shoprec --data shopping_trends_updated.csv --mode cluster --user-id 42 --num-recommendations 5
//! shoprec --data shopping_trends_updated.csv --evaluate --n-test-users 100
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use shoprec::prelude::*;
//! use std::sync::Arc;
//!
//! let dataset = Arc::new(shoprec::snapshot::load_dataset("shopping_trends_updated.csv").unwrap());
//! let config = RecommenderConfig::default();
//!
//! let recommender = ClusterRecommender::new(dataset, &config).unwrap();
//! match recommender.recommend(42, 5) {
//!     RecommendOutcome::Recommended { recommendations, .. } => {
//!         for rec in recommendations {
//!             println!("{:?} {:.3}", rec.item.item_name, rec.similarity);
//!         }
//!     }
//!     RecommendOutcome::NoCandidates => println!("nothing similar enough"),
//!     RecommendOutcome::UnknownTarget => println!("unknown customer"),
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `shoprec-core` - records, feature encoding, cosine similarity, k-means, knee detection
//! - `shoprec-similarity` - weighted factor schema and composite scorer
//! - `shoprec-recommend` - the recommenders, cluster insights and the evaluator

pub mod snapshot;

// Re-export core types
pub use shoprec_core::{
    ClusterAssignment, ClusterConfig, CustomerId, Dataset, EncodedMatrix, FeatureEncoder, Field,
    ItemRecord, SimilarityMatrix, UserRecord,
};

// Re-export scoring
pub use shoprec_similarity::{CompositeScorer, Factor, FactorSchema, ScoringMode};

// Re-export strategies
pub use shoprec_recommend::{
    default_counts, sample_test_users, ClusterInsights, ClusterRecommender, EvaluationResult,
    Evaluator, EvaluatorConfig, ItemBasedRecommender, RecommendOutcome, Recommendation, Recommender,
    RecommenderConfig, StrategyKind, Target, UserBasedRecommender,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClusterRecommender, Dataset, EvaluationResult, Evaluator, EvaluatorConfig,
        ItemBasedRecommender, ItemRecord, RecommendOutcome, Recommendation, Recommender,
        RecommenderConfig, ScoringMode, StrategyKind, UserBasedRecommender, UserRecord,
    };
}
