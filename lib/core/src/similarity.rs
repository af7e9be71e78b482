use crate::matrix::EncodedMatrix;
use crate::simd::{dot_product, norm};
use crate::{Error, Result};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::info;

/// Largest row count accepted for a dense n x n matrix (about 1 GiB of f32)
pub const MAX_DENSE_ROWS: usize = 16_384;

/// Dense pairwise cosine-similarity matrix.
///
/// Symmetric with a unit diagonal. A zero-vector row has similarity 0
/// with every other row. Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute all pairwise similarities of `matrix` rows.
    ///
    /// Cost is O(n² · d); rows are computed in parallel.
    pub fn build(matrix: &EncodedMatrix) -> Result<Self> {
        let n = matrix.rows();
        if n > MAX_DENSE_ROWS {
            return Err(Error::DatasetTooLarge {
                rows: n,
                limit: MAX_DENSE_ROWS,
            });
        }

        let norms: Vec<f32> = matrix.iter_rows().map(norm).collect();

        // upper triangle, one tail per row
        let tails: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let a = matrix.row(i);
                ((i + 1)..n)
                    .map(|j| {
                        if norms[i] == 0.0 || norms[j] == 0.0 {
                            0.0
                        } else {
                            (dot_product(a, matrix.row(j)) / norms[i] / norms[j]).clamp(-1.0, 1.0)
                        }
                    })
                    .collect()
            })
            .collect();

        let mut values = vec![0.0f32; n * n];
        for (i, tail) in tails.into_iter().enumerate() {
            values[i * n + i] = 1.0;
            for (offset, sim) in tail.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }

        info!(rows = n, dim = matrix.dim(), "similarity matrix built");
        Ok(Self { n, values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.n + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Rows other than `row` whose similarity is at least `min_similarity`,
    /// most similar first. Ties keep ascending row order.
    pub fn ranked_neighbours(&self, row: usize, min_similarity: f32) -> Vec<(usize, f32)> {
        let mut neighbours: Vec<(usize, f32)> = self
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, sim)| j != row && sim >= min_similarity)
            .collect();
        neighbours.sort_by_key(|&(j, sim)| (std::cmp::Reverse(OrderedFloat(sim)), j));
        neighbours
    }
}
