//! Distance metrics for vector similarity calculations.
//!
//! Each metric has two faces:
//!
//! - a **raw** distance used inside the graph, where lower is always closer
//!   (squared L2 for `Euclidean`, negated dot product for `InnerProduct`);
//! - a **reported** distance handed back to callers and compared against
//!   `max_distance` thresholds.
//!
//! The engine, not the metric, decides result ordering: results are always
//! ascending by reported distance, which for `InnerProduct` means descending
//! similarity.

use crate::error::{Error, Result};
use crate::simd;
use serde::{Deserialize, Serialize};

/// Distance metric for vector similarity calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance (L2 norm).
    /// Best for spatial data and when magnitude matters.
    Euclidean,

    /// Angular distance, `1 - cos(a, b)`.
    /// Best for text embeddings where only direction matters.
    #[serde(alias = "cosine")]
    Angular,

    /// Inner product, reported as the negated dot product.
    /// Best for maximum inner product search (MIPS).
    #[serde(alias = "dot_product")]
    InnerProduct,

    /// Number of differing components.
    Hamming,
}

impl DistanceMetric {
    /// All supported metrics.
    pub const ALL: [Self; 4] = [
        Self::Euclidean,
        Self::Angular,
        Self::InnerProduct,
        Self::Hamming,
    ];

    /// Raw ranking distance between two vectors of equal length.
    ///
    /// Lower is closer for every metric. Lengths are not checked; use
    /// [`DistanceMetric::distance`] for untrusted input.
    #[must_use]
    #[inline]
    pub fn raw_distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Euclidean => simd::squared_l2(a, b),
            Self::Angular => 1.0 - simd::cosine_similarity(a, b),
            Self::InnerProduct => -simd::dot_product(a, b),
            Self::Hamming => simd::hamming(a, b),
        }
    }

    /// Converts a raw distance into the distance reported to callers.
    #[must_use]
    #[inline]
    pub fn to_reported(&self, raw: f32) -> f64 {
        match self {
            Self::Euclidean => f64::from(raw.max(0.0)).sqrt(),
            Self::Angular | Self::InnerProduct | Self::Hamming => f64::from(raw),
        }
    }

    /// Reported distance between two vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the vectors differ in length.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(Error::dimension_mismatch(a.len(), b.len()));
        }
        Ok(self.to_reported(self.raw_distance(a, b)))
    }

    /// Converts a reported distance into a similarity score (higher is better).
    ///
    /// - `Euclidean`/`Hamming`: `1 / (1 + d)`
    /// - `Angular`: cosine similarity `1 - d`
    /// - `InnerProduct`: the dot product `-d`
    #[must_use]
    pub fn to_similarity(&self, distance: f64) -> f64 {
        match self {
            Self::Euclidean | Self::Hamming => 1.0 / (1.0 + distance),
            Self::Angular => 1.0 - distance,
            Self::InnerProduct => -distance,
        }
    }

    /// Returns whether reported distances can be negative.
    ///
    /// Only `InnerProduct` can report negative values; for the others a
    /// negative `max_distance` threshold is meaningless.
    #[must_use]
    pub const fn allows_negative_distance(&self) -> bool {
        matches!(self, Self::InnerProduct)
    }

    /// Short lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Angular => "angular",
            Self::InnerProduct => "inner_product",
            Self::Hamming => "hamming",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
