//! Knee detection on a convex, decreasing curve (Kneedle).
//!
//! Both axes are normalized to [0, 1], the curve is flipped to
//! `1 - y`, and the knee is the first local maximum of the difference
//! curve `y - x` after which the difference drops below that maximum's
//! threshold `y_diff[max] - S * mean(Δx)`.

/// Kneedle detector for convex, decreasing curves such as inertia vs. k
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KneeLocator {
    sensitivity: f64,
}

impl Default for KneeLocator {
    fn default() -> Self {
        Self { sensitivity: 1.0 }
    }
}

impl KneeLocator {
    pub fn new(sensitivity: f64) -> Self {
        Self { sensitivity }
    }

    /// Index of the knee point in `xs`/`ys`, or `None` when the curve has
    /// no knee (fewer than three points, flat, or straight).
    pub fn locate(&self, xs: &[f64], ys: &[f64]) -> Option<usize> {
        let n = xs.len();
        if n < 3 || ys.len() != n {
            return None;
        }

        let x_norm = normalize(xs)?;
        let y_norm = normalize(ys)?;
        let y_max = y_norm.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let diff: Vec<f64> = y_norm
            .iter()
            .zip(&x_norm)
            .map(|(y, x)| (y_max - y) - x)
            .collect();

        let neighbours = |i: usize| (diff[i.saturating_sub(1)], diff[(i + 1).min(n - 1)]);
        let is_max = |i: usize| {
            let (prev, next) = neighbours(i);
            diff[i] >= prev && diff[i] >= next
        };
        let is_min = |i: usize| {
            let (prev, next) = neighbours(i);
            diff[i] <= prev && diff[i] <= next
        };

        let first_max = (0..n).find(|&i| is_max(i))?;
        let step = x_norm.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / (n - 1) as f64;
        let offset = self.sensitivity * step.abs();

        let mut threshold = f64::NEG_INFINITY;
        let mut threshold_index = first_max;
        for i in first_max..n - 1 {
            if is_max(i) {
                threshold = diff[i] - offset;
                threshold_index = i;
            }
            if is_min(i) {
                threshold = 0.0;
            }
            if diff[i + 1] < threshold {
                return Some(threshold_index);
            }
        }
        None
    }
}

fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return None;
    }
    Some(values.iter().map(|v| (v - min) / range).collect())
}
