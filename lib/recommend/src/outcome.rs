//! Result types shared by all recommenders

use serde::Serialize;
use shoprec_core::{Dataset, ItemRecord, UserRecord};
use shoprec_similarity::Factor;
use std::collections::BTreeMap;

/// Attributes of the query target, user or item depending on the strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Target {
    User(UserRecord),
    Item(ItemRecord),
}

/// Cluster ids and factor breakdown attached by the cluster recommender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAnnotation {
    /// Cluster of the user who bought the recommended item
    pub user_cluster: usize,
    /// Cluster of the recommended item
    pub item_cluster: usize,
    /// Weighted contribution of each factor to `similarity`
    pub contributions: BTreeMap<Factor, f32>,
}

/// One recommended item with its score and purchaser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: ItemRecord,
    /// Cosine similarity, or the composite score for the cluster strategy
    pub similarity: f32,
    pub purchaser: UserRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<ClusterAnnotation>,
}

impl Recommendation {
    /// The item at `item_row` together with its purchaser
    pub(crate) fn for_item_row(dataset: &Dataset, item_row: usize, similarity: f32) -> Option<Self> {
        let item = dataset.items().get(item_row)?;
        let purchaser = dataset.purchaser_of(item_row)?;
        Some(Self {
            item: item.clone(),
            similarity,
            purchaser: purchaser.clone(),
            clusters: None,
        })
    }
}

/// Outcome of one `recommend` call.
///
/// Unknown ids and empty candidate pools are ordinary outcomes, never
/// errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendOutcome {
    Recommended {
        target: Target,
        recommendations: Vec<Recommendation>,
    },
    /// Nothing cleared the threshold
    NoCandidates,
    /// The customer id is not in the dataset
    UnknownTarget,
}

impl RecommendOutcome {
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            RecommendOutcome::Recommended { recommendations, .. } => recommendations,
            _ => &[],
        }
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            RecommendOutcome::Recommended { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations().is_empty()
    }

    pub fn len(&self) -> usize {
        self.recommendations().len()
    }
}
