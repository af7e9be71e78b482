//! # shoprec Similarity
//!
//! Weighted factor scoring for the cluster-based recommender.
//!
//! A [`FactorSchema`] declares which factors matter, how each is matched
//! and its weight. A [`CompositeScorer`] applies the schema to a target and
//! its candidates, returning scores with per-factor contributions.
//!
//! ## Example
//!
//! ```rust
//! use shoprec_similarity::{CompositeScorer, FactorProfile, FactorSchema, ScoringMode};
//!
//! let scorer = CompositeScorer::new(FactorSchema::for_mode(ScoringMode::SimilarityTimesFactors)).unwrap();
//!
//! let target = FactorProfile {
//!     item_cluster: Some(1),
//!     user_cluster: Some(0),
//!     category: Some("Clothing"),
//!     season: Some("Winter"),
//!     color: Some("Blue"),
//!     price: Some(50.0),
//! };
//! let candidate = FactorProfile { color: Some("Red"), ..target };
//!
//! let scored = scorer.score(&target, &candidate, 0.9);
//! assert!(scored.score > 0.0 && scored.score < 0.9);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   Schema    │────>│   Scorer    │<──── base similarity
//! │  (factors)  │     │ (profiles)  │
//! └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Explain    │
//!                     │ (factors)   │
//!                     └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod schema;
pub mod scorer;

pub use explain::{FactorScore, ScoreStats};
pub use schema::{Factor, FactorConfig, FactorSchema, Matcher, SchemaError, ScoringMode};
pub use scorer::{CompositeScorer, FactorProfile, ScoredCandidate};
