//! Ordered float wrapper for use in `BinaryHeap`.
//!
//! Uses `f32::total_cmp`, which defines: -NaN < -inf < ... < -0 < +0 < ... < +inf < +NaN

use std::cmp::Ordering;

/// Wrapper for f32 to implement Ord for `BinaryHeap`.
///
/// Bit equality keeps `Eq` consistent with `total_cmp`, so a NaN distance
/// cannot corrupt the heap during beam search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderedFloat(pub f32);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
