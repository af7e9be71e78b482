//! # shoprec Recommend
//!
//! The three recommendation strategies and the harness that compares them.
//!
//! - [`UserBasedRecommender`] - items bought by the most similar customers
//! - [`ItemBasedRecommender`] - items most similar to the customer's purchase
//! - [`ClusterRecommender`] - composite score over user and item clusters
//! - [`Evaluator`] - recommendation-count sweeps with joint normalization
//!
//! Every strategy implements [`Recommender`]. Artifacts are built once at
//! construction and shared read-only, so a recommender is `Send + Sync`.
//!
//! ## Example
//!
//! ```rust
//! use shoprec_core::{Dataset, ItemRecord, UserRecord};
//! use shoprec_recommend::{ItemBasedRecommender, Recommender, RecommenderConfig};
//! use std::sync::Arc;
//!
//! let user = |id| UserRecord {
//!     customer_id: id,
//!     age: Some(30.0),
//!     gender: Some("Female".into()),
//!     location: None,
//!     size: Some("M".into()),
//!     previous_purchases: Some(3.0),
//!     purchase_frequency: Some("Weekly".into()),
//!     subscription_status: Some("No".into()),
//! };
//! let item = |id, name: &str| ItemRecord {
//!     customer_id: id,
//!     item_name: Some(name.into()),
//!     category: Some("Clothing".into()),
//!     purchase_amount: Some(40.0),
//!     color: Some("Blue".into()),
//!     season: Some("Winter".into()),
//! };
//!
//! let dataset = Arc::new(Dataset::new(
//!     vec![user(1), user(2)],
//!     vec![item(1, "Jeans"), item(2, "Jeans")],
//! ).unwrap());
//!
//! let recommender = ItemBasedRecommender::new(dataset, &RecommenderConfig::default()).unwrap();
//! let outcome = recommender.recommend(1, 5);
//! assert_eq!(outcome.len(), 1);
//! assert!(recommender.recommend(99, 5).target().is_none());
//! ```

pub mod cluster_based;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod insights;
pub mod item_based;
pub mod outcome;
pub mod strategy;
pub mod user_based;

#[cfg(test)]
mod fixtures;

pub use cluster_based::ClusterRecommender;
pub use config::{EvaluatorConfig, RecommenderConfig, DEFAULT_MIN_SIMILARITY, WEIGHTED_BOOLEAN_THRESHOLD};
pub use error::{Error, Result};
pub use evaluate::{default_counts, sample_test_users, EvaluationResult, Evaluator};
pub use insights::{ClusterInsights, ItemClusterInsight, UserClusterInsight};
pub use item_based::ItemBasedRecommender;
pub use outcome::{ClusterAnnotation, RecommendOutcome, Recommendation, Target};
pub use strategy::{Recommender, StrategyKind};
pub use user_based::UserBasedRecommender;
