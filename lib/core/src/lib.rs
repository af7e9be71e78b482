//! # shoprec Core
//!
//! Core library for the shoprec recommender.
//!
//! This crate provides the data model and the numeric engines shared by
//! every recommendation strategy:
//!
//! - [`Dataset`] - users and their purchases, indexed by customer id
//! - [`FeatureEncoder`] - mixed-type records to an [`EncodedMatrix`]
//! - [`SimilarityMatrix`] - dense pairwise cosine similarity
//! - [`ClusterEngine`] - k-means with elbow-selected cluster count
//!
//! ## Example
//!
//! ```rust
//! use shoprec_core::{EncodedMatrix, SimilarityMatrix, ClusterEngine, ClusterConfig};
//!
//! let matrix = EncodedMatrix::from_rows(&[
//!     vec![1.0, 0.0, 1.0],
//!     vec![1.0, 0.0, 1.0],
//!     vec![0.0, 1.0, 0.0],
//! ]).unwrap();
//!
//! let sim = SimilarityMatrix::build(&matrix).unwrap();
//! assert!((sim.get(0, 1) - 1.0).abs() < 1e-6);
//!
//! let clusters = ClusterEngine::new(ClusterConfig::default(), 42).unwrap().fit(&matrix);
//! assert_eq!(clusters.labels().len(), 3);
//! ```

pub mod cluster;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod kmeans;
pub mod knee;
pub mod matrix;
pub mod record;
pub mod similarity;

/// Dot product, norm and distance kernels
pub mod simd;

pub use cluster::{ClusterAssignment, ClusterConfig, ClusterEngine};
pub use dataset::Dataset;
pub use encoder::{FeatureEncoder, FittedEncoder, UNMAPPED};
pub use error::{Error, Result};
pub use kmeans::{KMeans, KMeansFit};
pub use knee::KneeLocator;
pub use matrix::{EncodeDiagnostics, EncodedMatrix};
pub use record::{CustomerId, Field, FieldKind, FieldValue, ItemRecord, Record, UserRecord, UNKNOWN};
pub use similarity::{SimilarityMatrix, MAX_DENSE_ROWS};
