use crate::outcome::RecommendOutcome;
use serde::{Deserialize, Serialize};
use shoprec_core::CustomerId;
use std::fmt;

/// The three recommendation strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    UserBased,
    ItemBased,
    ClusterBased,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::UserBased,
        StrategyKind::ItemBased,
        StrategyKind::ClusterBased,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::UserBased => "user_based",
            StrategyKind::ItemBased => "item_based",
            StrategyKind::ClusterBased => "cluster_based",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common call contract of every strategy.
///
/// Implementations hold only read-only artifacts built at construction,
/// so one instance can serve queries from many threads.
pub trait Recommender: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// At most `n` recommendations for `customer_id`, best first
    fn recommend(&self, customer_id: CustomerId, n: usize) -> RecommendOutcome;
}
