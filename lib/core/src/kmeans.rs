//! K-Means clustering.
//!
//! Lloyd's algorithm with random distinct-row initialization drawn from a
//! seeded [`StdRng`], so the same matrix and seed always give the same labels.

use crate::matrix::EncodedMatrix;
use crate::simd::squared_distance;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of one k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster label per row, in `0..k`
    pub labels: Vec<usize>,
    /// Row-major `k x dim` centroids
    pub centroids: Vec<f32>,
    /// Within-cluster sum of squared distances
    pub inertia: f32,
    /// Lloyd iterations of the kept run
    pub n_iter: usize,
    /// Number of clusters actually fitted
    pub k: usize,
}

/// K-Means estimator
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f32,
    n_init: usize,
    seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(3)
    }
}

impl KMeans {
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            n_init: 3,
            seed: 42,
        }
    }

    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    #[must_use]
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit on the rows of `x`.
    ///
    /// `k` is clamped to `1..=rows`. An empty matrix yields an empty fit
    /// with `k = 1`.
    pub fn fit(&self, x: &EncodedMatrix) -> KMeansFit {
        let n = x.rows();
        let k = self.n_clusters.clamp(1, n.max(1));
        if n == 0 {
            return KMeansFit {
                labels: Vec::new(),
                centroids: vec![0.0; x.dim()],
                inertia: 0.0,
                n_iter: 0,
                k,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.n_init {
            let run = self.run_once(x, k, &mut rng);
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }
        // n_init >= 1, so at least one run was recorded
        best.unwrap_or_else(|| self.run_once(x, k, &mut rng))
    }

    fn run_once(&self, x: &EncodedMatrix, k: usize, rng: &mut StdRng) -> KMeansFit {
        let dim = x.dim();
        let mut centroids = Vec::with_capacity(k * dim);
        for row in rand::seq::index::sample(rng, x.rows(), k) {
            centroids.extend_from_slice(x.row(row));
        }

        let mut labels = assign_labels(x, &centroids, k);
        let mut n_iter = 0;
        for iter in 0..self.max_iter {
            n_iter = iter + 1;
            let updated = update_centroids(x, &labels, &centroids, k);
            let converged = max_shift(&centroids, &updated, dim) <= self.tol * self.tol;
            centroids = updated;
            labels = assign_labels(x, &centroids, k);
            if converged {
                break;
            }
        }

        let inertia = inertia(x, &centroids, &labels);
        KMeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
            k,
        }
    }
}

fn centroid(centroids: &[f32], c: usize, dim: usize) -> &[f32] {
    &centroids[c * dim..(c + 1) * dim]
}

/// Assign each row to its nearest centroid; ties go to the lower label.
fn assign_labels(x: &EncodedMatrix, centroids: &[f32], k: usize) -> Vec<usize> {
    let dim = x.dim();
    x.iter_rows()
        .map(|point| {
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for c in 0..k {
                let dist = squared_distance(point, centroid(centroids, c, dim));
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            best
        })
        .collect()
}

/// Mean of assigned rows; an empty cluster keeps its previous centroid.
fn update_centroids(x: &EncodedMatrix, labels: &[usize], previous: &[f32], k: usize) -> Vec<f32> {
    let dim = x.dim();
    let mut sums = vec![0.0f32; k * dim];
    let mut counts = vec![0usize; k];

    for (point, &label) in x.iter_rows().zip(labels) {
        counts[label] += 1;
        for (acc, v) in sums[label * dim..(label + 1) * dim].iter_mut().zip(point) {
            *acc += v;
        }
    }

    for c in 0..k {
        let block = &mut sums[c * dim..(c + 1) * dim];
        if counts[c] == 0 {
            block.copy_from_slice(centroid(previous, c, dim));
        } else {
            let inv = 1.0 / counts[c] as f32;
            block.iter_mut().for_each(|v| *v *= inv);
        }
    }
    sums
}

fn max_shift(old: &[f32], new: &[f32], dim: usize) -> f32 {
    if dim == 0 {
        return 0.0;
    }
    old.chunks_exact(dim)
        .zip(new.chunks_exact(dim))
        .map(|(a, b)| squared_distance(a, b))
        .fold(0.0, f32::max)
}

/// Within-cluster sum of squared distances
pub fn inertia(x: &EncodedMatrix, centroids: &[f32], labels: &[usize]) -> f32 {
    let dim = x.dim();
    x.iter_rows()
        .zip(labels)
        .map(|(point, &label)| squared_distance(point, centroid(centroids, label, dim)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> EncodedMatrix {
        EncodedMatrix::from_rows(&[
            vec![1.0, 1.0],
            vec![1.2, 0.8],
            vec![0.9, 1.1],
            vec![8.0, 8.0],
            vec![8.2, 7.9],
            vec![7.8, 8.1],
        ])
        .unwrap()
    }

    #[test]
    fn test_separates_blobs() {
        let fit = KMeans::new(2).fit(&blobs());
        assert_eq!(fit.k, 2);
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[4], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
        assert!(fit.inertia < 1.0);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let a = KMeans::new(3).with_seed(7).fit(&blobs());
        let b = KMeans::new(3).with_seed(7).fit(&blobs());
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_cluster_inertia() {
        let fit = KMeans::new(1).fit(&blobs());
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert!(fit.inertia > 100.0);
    }

    #[test]
    fn test_k_clamped_to_rows() {
        let x = EncodedMatrix::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        let fit = KMeans::new(10).fit(&x);
        assert_eq!(fit.k, 2);
        assert!(fit.labels.iter().all(|&l| l < 2));
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_duplicate_rows_leave_empty_clusters_stable() {
        let x = EncodedMatrix::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let fit = KMeans::new(3).fit(&x);
        assert_eq!(fit.labels, vec![0, 0, 0]);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_inertia_decreases_with_more_clusters() {
        let x = blobs();
        let i1 = KMeans::new(1).fit(&x).inertia;
        let i2 = KMeans::new(2).fit(&x).inertia;
        assert!(i2 < i1);
    }

    #[test]
    fn test_empty_input() {
        let x = EncodedMatrix::from_rows(&[]).unwrap();
        let fit = KMeans::new(3).fit(&x);
        assert!(fit.labels.is_empty());
        assert_eq!(fit.k, 1);
    }
}
