use crate::kmeans::KMeans;
use crate::knee::KneeLocator;
use crate::matrix::EncodedMatrix;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Settings for automatic cluster-count selection and the final fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Smallest k in the elbow sweep
    pub k_min: usize,
    /// Largest k in the elbow sweep
    pub k_max: usize,
    /// Cluster count used when the inertia curve has no knee
    pub fallback_k: usize,
    pub max_iter: usize,
    pub tol: f32,
    /// Restarts per fit, best inertia kept
    pub n_init: usize,
    /// Kneedle sensitivity
    pub sensitivity: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k_min: 1,
            k_max: 10,
            fallback_k: 3,
            max_iter: 300,
            tol: 1e-4,
            n_init: 3,
            sensitivity: 1.0,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k_min == 0 || self.k_min > self.k_max {
            return Err(Error::InvalidConfig(format!(
                "cluster sweep {}..={} is empty or starts at 0",
                self.k_min, self.k_max
            )));
        }
        if self.fallback_k == 0 {
            return Err(Error::InvalidConfig("fallback_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Cluster label per encoded row plus the chosen cluster count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
    /// `(k, inertia)` points of the elbow sweep
    inertia_curve: Vec<(usize, f32)>,
    /// Whether `k` came from a detected knee rather than the fallback
    from_knee: bool,
}

impl ClusterAssignment {
    /// Assignment from labels computed elsewhere; `k` is one past the largest label
    pub fn from_labels(labels: Vec<usize>) -> Self {
        let k = labels.iter().max().map_or(0, |&max| max + 1);
        Self {
            labels,
            k,
            inertia_curve: Vec::new(),
            from_knee: false,
        }
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn label(&self, row: usize) -> Option<usize> {
        self.labels.get(row).copied()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn inertia_curve(&self) -> &[(usize, f32)] {
        &self.inertia_curve
    }

    pub fn from_knee(&self) -> bool {
        self.from_knee
    }

    /// Rows carrying `label`, ascending
    pub fn members(&self, label: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| l == label)
            .map(|(row, _)| row)
    }
}

/// Chooses k by elbow detection and fits k-means once at that k
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    config: ClusterConfig,
    seed: u64,
}

impl ClusterEngine {
    pub fn new(config: ClusterConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, seed })
    }

    fn kmeans(&self, k: usize) -> KMeans {
        KMeans::new(k)
            .with_max_iter(self.config.max_iter)
            .with_tol(self.config.tol)
            .with_n_init(self.config.n_init)
            .with_seed(self.seed)
    }

    /// Inertia for every k in the sweep, clamped to the row count
    pub fn inertia_curve(&self, matrix: &EncodedMatrix) -> Vec<(usize, f32)> {
        let k_max = self.config.k_max.min(matrix.rows());
        (self.config.k_min..=k_max)
            .map(|k| (k, self.kmeans(k).fit(matrix).inertia))
            .collect()
    }

    /// Knee of the sweep, falling back to `fallback_k`
    pub fn optimal_k(&self, matrix: &EncodedMatrix) -> (usize, Vec<(usize, f32)>, bool) {
        let curve = self.inertia_curve(matrix);
        let xs: Vec<f64> = curve.iter().map(|&(k, _)| k as f64).collect();
        let ys: Vec<f64> = curve.iter().map(|&(_, inertia)| inertia as f64).collect();

        match KneeLocator::new(self.config.sensitivity).locate(&xs, &ys) {
            Some(index) => (curve[index].0, curve, true),
            None => {
                let k = self.config.fallback_k.min(matrix.rows().max(1));
                debug!(fallback = k, "no knee in inertia curve");
                (k, curve, false)
            }
        }
    }

    pub fn fit(&self, matrix: &EncodedMatrix) -> ClusterAssignment {
        let (k, inertia_curve, from_knee) = self.optimal_k(matrix);
        let fit = self.kmeans(k).fit(matrix);
        info!(k = fit.k, from_knee, inertia = fit.inertia, "clusters fitted");

        ClusterAssignment {
            labels: fit.labels,
            k: fit.k,
            inertia_curve,
            from_knee,
        }
    }
}
