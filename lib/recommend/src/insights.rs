//! Descriptive aggregates per cluster
//!
//! A reporting view over a [`ClusterAssignment`]; nothing here feeds back
//! into scoring.

use serde::Serialize;
use shoprec_core::{ClusterAssignment, ItemRecord, UserRecord};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserClusterInsight {
    pub size: usize,
    pub avg_age: Option<f64>,
    pub avg_previous_purchases: Option<f64>,
    pub common_gender: Option<String>,
    pub common_size: Option<String>,
    /// Percentage of members with an active subscription
    pub subscription_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemClusterInsight {
    pub size: usize,
    pub common_category: Option<String>,
    pub common_season: Option<String>,
    pub common_color: Option<String>,
    pub avg_price: Option<f64>,
}

/// Insights for every user cluster and every item cluster, keyed by label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterInsights {
    pub user_clusters: BTreeMap<usize, UserClusterInsight>,
    pub item_clusters: BTreeMap<usize, ItemClusterInsight>,
}

pub fn user_insights(
    users: &[UserRecord],
    assignment: &ClusterAssignment,
) -> BTreeMap<usize, UserClusterInsight> {
    (0..assignment.k())
        .map(|label| {
            let members: Vec<&UserRecord> =
                assignment.members(label).filter_map(|row| users.get(row)).collect();
            let subscribed = members
                .iter()
                .filter(|u| u.subscription_status.as_deref() == Some("Yes"))
                .count();

            let insight = UserClusterInsight {
                size: members.len(),
                avg_age: mean(members.iter().filter_map(|u| u.age)),
                avg_previous_purchases: mean(members.iter().filter_map(|u| u.previous_purchases)),
                common_gender: mode(members.iter().filter_map(|u| u.gender.as_deref())),
                common_size: mode(members.iter().filter_map(|u| u.size.as_deref())),
                subscription_ratio: (!members.is_empty())
                    .then(|| subscribed as f64 / members.len() as f64 * 100.0),
            };
            (label, insight)
        })
        .collect()
}

pub fn item_insights(
    items: &[ItemRecord],
    assignment: &ClusterAssignment,
) -> BTreeMap<usize, ItemClusterInsight> {
    (0..assignment.k())
        .map(|label| {
            let members: Vec<&ItemRecord> =
                assignment.members(label).filter_map(|row| items.get(row)).collect();

            let insight = ItemClusterInsight {
                size: members.len(),
                common_category: mode(members.iter().filter_map(|i| i.category.as_deref())),
                common_season: mode(members.iter().filter_map(|i| i.season.as_deref())),
                common_color: mode(members.iter().filter_map(|i| i.color.as_deref())),
                avg_price: mean(members.iter().filter_map(|i| i.purchase_amount)),
            };
            (label, insight)
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Most frequent value; ties go to the lexicographically smallest
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
