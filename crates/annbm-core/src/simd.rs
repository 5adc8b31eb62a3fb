//! Distance kernels using the `wide` crate for portable vectorization.
//!
//! Each kernel processes 8 lanes at a time with fused multiply-add and folds
//! the remainder with scalar code. `wide` selects AVX2/SSE/NEON/SIMD128 at
//! compile time and falls back to scalar code elsewhere.
//!
//! Callers guarantee equal slice lengths; this is only checked in debug builds.

use wide::f32x8;

const LANES: usize = 8;

/// Dot product of two equal-length slices.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = f32x8::ZERO;
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let (a_rest, b_rest) = (a_chunks.remainder(), b_chunks.remainder());

    for (ca, cb) in a_chunks.zip(b_chunks) {
        sum = f32x8::from(ca).mul_add(f32x8::from(cb), sum);
    }

    let mut result = sum.reduce_add();
    for (x, y) in a_rest.iter().zip(b_rest) {
        result += x * y;
    }
    result
}

/// Squared L2 distance. Avoids the sqrt since only ranking matters inside the graph.
#[inline]
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut sum = f32x8::ZERO;
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let (a_rest, b_rest) = (a_chunks.remainder(), b_chunks.remainder());

    for (ca, cb) in a_chunks.zip(b_chunks) {
        let diff = f32x8::from(ca) - f32x8::from(cb);
        sum = diff.mul_add(diff, sum);
    }

    let mut result = sum.reduce_add();
    for (x, y) in a_rest.iter().zip(b_rest) {
        let diff = x - y;
        result += diff * diff;
    }
    result
}

/// Cosine similarity computed in a single fused pass (dot and both norms).
///
/// Returns 0.0 when either vector has zero norm.
#[inline]
#[must_use]
#[allow(clippy::similar_names)]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let mut dot_sum = f32x8::ZERO;
    let mut norm_a_sum = f32x8::ZERO;
    let mut norm_b_sum = f32x8::ZERO;
    let a_chunks = a.chunks_exact(LANES);
    let b_chunks = b.chunks_exact(LANES);
    let (a_rest, b_rest) = (a_chunks.remainder(), b_chunks.remainder());

    for (ca, cb) in a_chunks.zip(b_chunks) {
        let va = f32x8::from(ca);
        let vb = f32x8::from(cb);
        dot_sum = va.mul_add(vb, dot_sum);
        norm_a_sum = va.mul_add(va, norm_a_sum);
        norm_b_sum = vb.mul_add(vb, norm_b_sum);
    }

    let mut dot = dot_sum.reduce_add();
    let mut norm_a_sq = norm_a_sum.reduce_add();
    let mut norm_b_sq = norm_b_sum.reduce_add();
    for (x, y) in a_rest.iter().zip(b_rest) {
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Number of positions where the components differ.
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn hamming(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    a.iter().zip(b).filter(|(x, y)| x != y).count() as f32
}
