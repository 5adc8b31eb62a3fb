//! HNSW index parameters.
//!
//! This module contains the construction-time configuration of the graph:
//! link budgets, construction beam width, metric and write strategy.

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hard cap on the number of layers a node can be assigned to.
pub const MAX_LEVELS: usize = 16;

/// HNSW index parameters for tuning performance and recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswIndexParams {
    /// Maximum number of links per node per layer (M parameter).
    /// Higher = better recall, more memory, slower insert.
    pub max_links: usize,
    /// Size of the candidate list while inserting (efConstruction).
    /// Higher = better recall, slower indexing.
    pub neighbors_to_explore: usize,
    /// Distance metric used for graph wiring and search.
    pub distance_metric: DistanceMetric,
    /// Allow concurrent `set_value` calls on distinct identifiers.
    pub multi_threaded: bool,
    /// Link budget at layer 0. `None` uses `max_links`.
    #[serde(default)]
    pub max_links_at_level_0: Option<usize>,
    /// Use the diversity heuristic when selecting neighbors.
    /// When false, the nearest candidates are kept.
    #[serde(default = "default_heuristic")]
    pub heuristic_select_neighbors: bool,
    /// Seed for level assignment. `None` uses a fixed default seed.
    #[serde(default)]
    pub level_seed: Option<u64>,
}

fn default_heuristic() -> bool {
    true
}

impl Default for HnswIndexParams {
    fn default() -> Self {
        Self::new(16, 200, DistanceMetric::Euclidean, false)
    }
}

impl HnswIndexParams {
    /// Creates parameters with the four core settings.
    #[must_use]
    pub fn new(
        max_links: usize,
        neighbors_to_explore: usize,
        distance_metric: DistanceMetric,
        multi_threaded: bool,
    ) -> Self {
        Self {
            max_links,
            neighbors_to_explore,
            distance_metric,
            multi_threaded,
            max_links_at_level_0: None,
            heuristic_select_neighbors: true,
            level_seed: None,
        }
    }

    /// Sets a dedicated link budget for layer 0.
    #[must_use]
    pub fn with_max_links_at_level_0(mut self, max_links: usize) -> Self {
        self.max_links_at_level_0 = Some(max_links);
        self
    }

    /// Enables or disables the diversity heuristic.
    #[must_use]
    pub fn with_heuristic_select_neighbors(mut self, enabled: bool) -> Self {
        self.heuristic_select_neighbors = enabled;
        self
    }

    /// Seeds level assignment for a reproducible graph shape.
    #[must_use]
    pub fn with_level_seed(mut self, seed: u64) -> Self {
        self.level_seed = Some(seed);
        self
    }

    /// Returns the link budget for a given layer.
    #[must_use]
    #[inline]
    pub fn max_links_for_level(&self, level: usize) -> usize {
        if level == 0 {
            self.max_links_at_level_0.unwrap_or(self.max_links)
        } else {
            self.max_links
        }
    }

    /// Level multiplier `1 / ln(M)` for the exponential level distribution.
    #[must_use]
    pub fn level_multiplier(&self) -> f64 {
        1.0 / (self.max_links as f64).ln()
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `max_links < 2`,
    /// `neighbors_to_explore == 0` or the level-0 budget is below `max_links`.
    pub fn validate(&self) -> Result<()> {
        match self.invalid_field() {
            Some((field, message)) => Err(Error::InvalidParams(format!("{field} {message}"))),
            None => Ok(()),
        }
    }

    /// First offending field and why, shared with configuration validation.
    pub(crate) fn invalid_field(&self) -> Option<(&'static str, String)> {
        if self.max_links < 2 {
            return Some(("max_links", format!("must be >= 2, got {}", self.max_links)));
        }
        if self.neighbors_to_explore == 0 {
            return Some(("neighbors_to_explore", "must be >= 1".to_string()));
        }
        match self.max_links_at_level_0 {
            Some(level0) if level0 < self.max_links => Some((
                "max_links_at_level_0",
                format!("must be >= max_links ({}), got {level0}", self.max_links),
            )),
            _ => None,
        }
    }
}
