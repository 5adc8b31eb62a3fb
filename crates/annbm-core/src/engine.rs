//! The `AnnBm` engine: identifier-addressed vectors over an HNSW graph.
//!
//! Callers assign every vector a `u32` identifier (`lid`). Setting an
//! existing identifier overwrites its vector and relinks its node in place;
//! there is no deletion.
//!
//! # Example
//!
//! ```rust
//! use annbm_core::{AnnBm, DistanceMetric, HnswIndexParams};
//!
//! let params = HnswIndexParams::new(16, 200, DistanceMetric::Euclidean, false);
//! let index = AnnBm::new(2, params)?;
//! index.set_value(0, &[0.0, 0.0])?;
//! index.set_value(1, &[10.0, 10.0])?;
//!
//! let hits = index.find_top_k(2, &[1.0, 1.0], 10, f64::MAX)?;
//! assert_eq!(hits[0].lid, 0);
//! # Ok::<(), annbm_core::Error>(())
//! ```

use crate::config::{AnnBmConfig, SearchConfig};
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::index::hnsw::{
    GraphStats, HnswGraph, HnswIndexParams, NodeId, ScoredNode, VectorStore, WriteGate,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// One search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit {
    /// Caller-assigned identifier
    pub lid: u32,
    /// Reported distance to the query (lower is closer)
    pub distance: f64,
}

/// Approximate nearest neighbor index keyed by caller identifiers.
///
/// All operations take `&self`; the index is `Send + Sync` and can be shared
/// behind an `Arc`. Locks are always taken in the order
/// write gate, identifier map, vector store, node arena, entry point and
/// per-node links.
#[derive(Debug)]
pub struct AnnBm {
    /// Vector dimension
    dimension: usize,
    /// Construction parameters
    params: HnswIndexParams,
    /// Vector storage, slot = node id
    vectors: VectorStore,
    /// lid -> node id
    ids: RwLock<FxHashMap<u32, NodeId>>,
    /// HNSW graph
    graph: HnswGraph,
    /// Writer serialization
    gate: WriteGate,
    /// Final `(distance, lid)` sort switch
    enable_sort: AtomicBool,
    /// Defaults for `find_top_k_default`
    search: SearchConfig,
}

impl AnnBm {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `dimension == 0` or the parameters
    /// fail validation.
    pub fn new(dimension: usize, params: HnswIndexParams) -> Result<Self> {
        if dimension == 0 {
            return Err(reject(Error::InvalidParams(
                "dimension must be >= 1".to_string(),
            )));
        }
        params.validate().map_err(reject)?;
        let gate = WriteGate::new(params.multi_threaded);

        tracing::debug!(
            dimension,
            max_links = params.max_links,
            max_links_at_level_0 = params.max_links_for_level(0),
            neighbors_to_explore = params.neighbors_to_explore,
            metric = %params.distance_metric,
            concurrent_writers = gate.is_concurrent(),
            heuristic = params.heuristic_select_neighbors,
            "creating index"
        );

        Ok(Self {
            dimension,
            params,
            vectors: VectorStore::new(dimension),
            ids: RwLock::new(FxHashMap::default()),
            graph: HnswGraph::new(params),
            gate,
            enable_sort: AtomicBool::new(true),
            search: SearchConfig::default(),
        })
    }

    /// Creates an empty index from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid, or the
    /// errors of [`AnnBm::new`].
    pub fn from_config(dimension: usize, config: &AnnBmConfig) -> Result<Self> {
        config.validate().map_err(|e| reject(e.into()))?;

        let mut index = Self::new(dimension, config.index_params())?;
        index.search = config.search.clone();
        index.enable_sort = AtomicBool::new(config.search.enable_sort);
        Ok(index)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Returns the vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the construction parameters.
    #[must_use]
    pub fn params(&self) -> &HnswIndexParams {
        &self.params
    }

    /// Returns the distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.params.distance_metric
    }

    /// Number of distinct identifiers stored.
    #[must_use]
    pub fn num_docs(&self) -> usize {
        self.ids.read().len()
    }

    /// Alias of [`AnnBm::num_docs`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.num_docs()
    }

    /// Returns true if no identifier was ever set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_docs() == 0
    }

    /// Returns true if `lid` has a vector.
    #[must_use]
    pub fn contains(&self, lid: u32) -> bool {
        self.ids.read().contains_key(&lid)
    }

    /// Structural statistics of the graph.
    #[must_use]
    pub fn graph_stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// Neighbor identifiers of `lid` at `layer`, or `None` if `lid` is
    /// unknown or its node does not reach that layer.
    #[must_use]
    pub fn links(&self, lid: u32, layer: usize) -> Option<Vec<u32>> {
        let node = self.node_of(lid)?;
        let neighbors = self.graph.links(node, layer)?;
        Some(
            neighbors
                .into_iter()
                .filter_map(|n| self.graph.node_lid(n))
                .collect(),
        )
    }

    /// Enables or disables the final `(distance, lid)` sort of results.
    ///
    /// When disabled, hits keep the graph's order: ascending distance, ties
    /// in insertion order.
    pub fn set_enable_sort(&self, enabled: bool) {
        self.enable_sort.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether the final sort is enabled.
    #[must_use]
    pub fn enable_sort(&self) -> bool {
        self.enable_sort.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Writes and point reads
    // ------------------------------------------------------------------

    /// Stores `vector` under `lid`, inserting a node or relinking the
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `vector` has the wrong length.
    pub fn set_value(&self, lid: u32, vector: &[f32]) -> Result<()> {
        self.check_dimension(vector)?;

        let _gate = self.gate.lock(lid);
        let existing = self.node_of(lid);

        match existing {
            Some(node) => {
                self.vectors.overwrite(node, vector)?;
                let view = self.vectors.read();
                self.graph.reinsert(&view, node);
                tracing::trace!(lid, node, "vector overwritten");
            }
            None => {
                let node = {
                    let mut ids = self.ids.write();
                    let node = self.vectors.push(vector)?;
                    let added = self.graph.add_node(lid, self.graph.draw_level());
                    debug_assert_eq!(node, added, "node ids must follow vector slots");
                    ids.insert(lid, node);
                    node
                };
                let view = self.vectors.read();
                self.graph.insert(&view, node);
                tracing::trace!(lid, node, "vector inserted");
            }
        }

        Ok(())
    }

    /// Returns a copy of the vector stored under `lid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIdentifier`] if `lid` was never set.
    pub fn get_value(&self, lid: u32) -> Result<Vec<f32>> {
        self.node_of(lid)
            .and_then(|node| self.vectors.get(node))
            .ok_or_else(|| reject(Error::UnknownIdentifier(lid)))
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Approximate top-k search.
    ///
    /// Returns at most `k` hits, ascending by distance (ties by `lid`), with
    /// `distance <= max_distance`. The cutoff applies after truncation to
    /// `k`, so it never pulls in results beyond the k best candidates.
    /// A budget of at least [`AnnBm::num_docs`] makes the search exact.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `query` has the wrong length
    /// - [`Error::InvalidArgument`] if `k == 0`, `exploration_budget < k`, or
    ///   `max_distance` is NaN or negative for a non-negative metric
    pub fn find_top_k(
        &self,
        k: usize,
        query: &[f32],
        exploration_budget: usize,
        max_distance: f64,
    ) -> Result<Vec<SearchHit>> {
        self.check_query(k, query, max_distance)?;
        if exploration_budget < k {
            return Err(reject(Error::InvalidArgument(format!(
                "exploration_budget ({exploration_budget}) must be >= k ({k})"
            ))));
        }

        let scored = {
            let view = self.vectors.read();
            // A beam as wide as the index visits every node anyway
            if exploration_budget >= view.len() {
                self.graph.brute_force(&view, query)
            } else {
                self.graph.search(&view, query, exploration_budget)
            }
        };
        tracing::trace!(k, exploration_budget, candidates = scored.len(), "search");

        Ok(self.finish(scored, k, max_distance))
    }

    /// Exact top-k by scanning every stored vector.
    ///
    /// Same ordering and filtering as [`AnnBm::find_top_k`].
    ///
    /// # Errors
    ///
    /// Same as [`AnnBm::find_top_k`], without the budget check.
    pub fn find_top_k_exact(
        &self,
        k: usize,
        query: &[f32],
        max_distance: f64,
    ) -> Result<Vec<SearchHit>> {
        self.check_query(k, query, max_distance)?;

        let scored = {
            let view = self.vectors.read();
            self.graph.brute_force(&view, query)
        };

        Ok(self.finish(scored, k, max_distance))
    }

    /// Top-k search with the configured defaults: beam width
    /// `k + extra_exploration` and the configured `max_distance`.
    ///
    /// # Errors
    ///
    /// Same as [`AnnBm::find_top_k`].
    pub fn find_top_k_default(&self, k: usize, query: &[f32]) -> Result<Vec<SearchHit>> {
        self.find_top_k(
            k,
            query,
            self.search.exploration_budget(k),
            self.search.max_distance,
        )
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn node_of(&self, lid: u32) -> Option<NodeId> {
        self.ids.read().get(&lid).copied()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(reject(Error::dimension_mismatch(
                self.dimension,
                vector.len(),
            )))
        }
    }

    fn check_query(&self, k: usize, query: &[f32], max_distance: f64) -> Result<()> {
        self.check_dimension(query)?;
        if k == 0 {
            return Err(reject(Error::InvalidArgument("k must be >= 1".to_string())));
        }
        if max_distance.is_nan() {
            return Err(reject(Error::InvalidArgument(
                "max_distance must not be NaN".to_string(),
            )));
        }
        if max_distance < 0.0 && !self.metric().allows_negative_distance() {
            return Err(reject(Error::InvalidArgument(format!(
                "max_distance ({max_distance}) must be >= 0 for metric {}",
                self.metric()
            ))));
        }
        Ok(())
    }

    /// Converts raw candidates into hits: report, order, truncate to `k`, then
    /// drop hits beyond `max_distance`.
    fn finish(&self, scored: Vec<ScoredNode>, k: usize, max_distance: f64) -> Vec<SearchHit> {
        let metric = self.metric();
        let mut hits: Vec<SearchHit> = scored
            .into_iter()
            .map(|s| SearchHit {
                lid: s.lid,
                distance: metric.to_reported(s.distance),
            })
            .collect();

        if self.enable_sort() {
            hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.lid.cmp(&b.lid)));
        }
        hits.truncate(k);
        hits.retain(|h| h.distance <= max_distance);
        hits
    }
}

/// Logs a rejected call and hands the error back.
fn reject(err: Error) -> Error {
    tracing::warn!(code = err.code(), error = %err, "request rejected");
    err
}
