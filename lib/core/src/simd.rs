// Vector kernels used by the similarity matrix and k-means.
// AVX2/FMA dot product on x86_64 when available, scalar with two
// accumulators everywhere else.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

/// Dot product of two equal-length slices; 0 on length mismatch
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if a.len() >= MIN_DIM_SIZE_AVX
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut acc0 = _mm256_setzero_ps();
    let mut acc1 = _mm256_setzero_ps();

    while i + 16 <= dim {
        let a0 = _mm256_loadu_ps(a.as_ptr().add(i));
        let b0 = _mm256_loadu_ps(b.as_ptr().add(i));
        let a1 = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let b1 = _mm256_loadu_ps(b.as_ptr().add(i + 8));
        acc0 = _mm256_fmadd_ps(a0, b0, acc0);
        acc1 = _mm256_fmadd_ps(a1, b1, acc1);
        i += 16;
    }

    let sum = _mm256_add_ps(acc0, acc1);
    let mut lanes = _mm_add_ps(_mm256_extractf128_ps(sum, 1), _mm256_castps256_ps128(sum));
    lanes = _mm_hadd_ps(lanes, lanes);
    lanes = _mm_hadd_ps(lanes, lanes);
    let mut dot = _mm_cvtss_f32(lanes);

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;

    let pairs = a.chunks_exact(2).zip(b.chunks_exact(2));
    for (x, y) in pairs {
        even += x[0] * y[0];
        odd += x[1] * y[1];
    }
    if a.len() % 2 == 1 {
        let last = a.len() - 1;
        even += a[last] * b[last];
    }
    even + odd
}

/// Euclidean norm
#[inline]
pub fn norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Squared Euclidean distance; infinite on length mismatch
#[inline]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Cosine similarity; 0 when either side is a zero vector
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot_product(a, b) / na / nb).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_matches_naive() {
        for dim in [1usize, 2, 7, 31, 32, 33, 100] {
            let a: Vec<f32> = (0..dim).map(|i| (i % 5) as f32 * 0.5).collect();
            let b: Vec<f32> = (0..dim).map(|i| (i % 3) as f32).collect();
            let naive: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
            assert!((dot_product(&a, &b) - naive).abs() < 1e-3, "dim {dim}");
        }
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(dot_product(&[1.0, 2.0], &[1.0]), 0.0);
        assert!(squared_distance(&[1.0], &[1.0, 2.0]).is_infinite());
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    }
}
