//! Search quality metrics for comparing approximate results with exact ones.
//!
//! - **Recall@k**: proportion of true neighbors found in the results
//! - **Precision@k**: proportion of returned results that are true neighbors
//!
//! # Example
//!
//! ```rust
//! use annbm_core::metrics::{precision_at_k, recall_at_k};
//!
//! let ground_truth = vec![1, 2, 3, 4, 5];
//! let results = vec![1, 3, 6, 2, 7];
//!
//! assert!((recall_at_k(&ground_truth, &results) - 0.6).abs() < 1e-9);
//! assert!((precision_at_k(&ground_truth, &results) - 0.6).abs() < 1e-9);
//! ```

use crate::engine::SearchHit;
use std::collections::HashSet;
use std::hash::Hash;

/// Calculates Recall@k: `|ground_truth ∩ results| / |ground_truth|`.
///
/// Returns 0.0 if `ground_truth` is empty.
#[must_use]
pub fn recall_at_k<T: Eq + Hash + Copy>(ground_truth: &[T], results: &[T]) -> f64 {
    if ground_truth.is_empty() {
        return 0.0;
    }

    let truth_set: HashSet<T> = ground_truth.iter().copied().collect();
    let found = results.iter().filter(|id| truth_set.contains(id)).count();

    found as f64 / ground_truth.len() as f64
}

/// Calculates Precision@k: `|ground_truth ∩ results| / |results|`.
///
/// Returns 0.0 if `results` is empty.
#[must_use]
pub fn precision_at_k<T: Eq + Hash + Copy>(ground_truth: &[T], results: &[T]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let truth_set: HashSet<T> = ground_truth.iter().copied().collect();
    let relevant = results.iter().filter(|id| truth_set.contains(id)).count();

    relevant as f64 / results.len() as f64
}

/// Recall of approximate hits against exact hits, compared by identifier.
#[must_use]
pub fn hit_recall(exact: &[SearchHit], approximate: &[SearchHit]) -> f64 {
    let truth: Vec<u32> = exact.iter().map(|h| h.lid).collect();
    let found: Vec<u32> = approximate.iter().map(|h| h.lid).collect();
    recall_at_k(&truth, &found)
}
