//! HNSW Graph Structure
//!
//! Implements the hierarchical navigable small world graph structure
//! as described in the Malkov & Yashunin paper.
//!
//! The graph is an arena of [`Node`]s addressed by dense [`NodeId`]s. Vectors
//! are not owned here: every traversal borrows a [`VectorsRead`] view taken
//! *before* the arena lock, which fixes the lock order
//! `vectors -> nodes -> entry point / node links`.
//!
//! [`VectorsRead`]: super::vector_store::VectorsRead

use super::level::{LevelGenerator, DEFAULT_SEED};
use super::node::{Node, NodeId};
use super::params::HnswIndexParams;
use crate::distance::DistanceMetric;
use parking_lot::RwLock;
use serde::Serialize;

/// Global entry point of the graph: a node on the highest layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Entry node
    pub node: NodeId,
    /// Level of the entry node, which is the top layer of the graph
    pub level: usize,
}

/// Native HNSW graph over the identifiers of an index.
#[derive(Debug)]
pub struct HnswGraph {
    /// Construction parameters
    pub(super) params: HnswIndexParams,
    /// Distance metric (copied out of `params` for the hot path)
    pub(super) metric: DistanceMetric,
    /// Node arena, append-only
    pub(super) nodes: RwLock<Vec<Node>>,
    /// Entry point for search (highest layer node)
    pub(super) entry_point: RwLock<Option<EntryPoint>>,
    /// Level generator for new nodes
    levels: LevelGenerator,
}

/// Structural summary of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Number of nodes (equals the number of stored vectors).
    pub node_count: usize,
    /// `level_histogram[l]` = number of nodes whose top level is `l`.
    pub level_histogram: Vec<usize>,
    /// Level of the entry point, if any.
    pub max_level: Option<usize>,
    /// Identifier of the entry point, if any.
    pub entry_point_lid: Option<u32>,
    /// Directed links over all layers.
    pub total_links: usize,
    /// Directed links whose reverse link is missing.
    pub asymmetric_links: usize,
}

impl HnswGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(params: HnswIndexParams) -> Self {
        Self {
            metric: params.distance_metric,
            levels: LevelGenerator::new(
                params.level_seed.unwrap_or(DEFAULT_SEED),
                params.level_multiplier(),
            ),
            nodes: RwLock::new(Vec::new()),
            entry_point: RwLock::new(None),
            params,
        }
    }

    /// Returns the construction parameters.
    #[must_use]
    pub fn params(&self) -> &HnswIndexParams {
        &self.params
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns true if the graph holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current entry point.
    #[must_use]
    pub fn entry_point(&self) -> Option<EntryPoint> {
        *self.entry_point.read()
    }

    /// Draws a level for a new node.
    pub(crate) fn draw_level(&self) -> usize {
        self.levels.next_level()
    }

    /// Appends an unlinked node and returns its id.
    ///
    /// The caller must already have pushed the node's vector so that node ids
    /// and vector slots stay aligned.
    pub(crate) fn add_node(&self, lid: u32, level: usize) -> NodeId {
        let mut nodes = self.nodes.write();
        nodes.push(Node::new(lid, level));
        nodes.len() - 1
    }

    /// Returns the identifier stored on a node.
    #[must_use]
    pub fn node_lid(&self, node: NodeId) -> Option<u32> {
        self.nodes.read().get(node).map(Node::lid)
    }

    /// Returns the level of a node.
    #[must_use]
    pub fn node_level(&self, node: NodeId) -> Option<usize> {
        self.nodes.read().get(node).map(Node::level)
    }

    /// Returns the neighbors of `node` at `layer`, or `None` if the node does
    /// not exist or is not on that layer.
    #[must_use]
    pub fn links(&self, node: NodeId, layer: usize) -> Option<Vec<NodeId>> {
        let nodes = self.nodes.read();
        let n = nodes.get(node)?;
        (layer <= n.level).then(|| n.get_links(layer))
    }

    /// Collects structural statistics, including link symmetry.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let nodes = self.nodes.read();
        let entry = *self.entry_point.read();

        let mut stats = GraphStats {
            node_count: nodes.len(),
            max_level: entry.map(|e| e.level),
            entry_point_lid: entry.and_then(|e| nodes.get(e.node)).map(Node::lid),
            ..GraphStats::default()
        };

        for (id, node) in nodes.iter().enumerate() {
            if stats.level_histogram.len() <= node.level {
                stats.level_histogram.resize(node.level + 1, 0);
            }
            stats.level_histogram[node.level] += 1;

            for layer in 0..=node.level {
                for neighbor in node.get_links(layer) {
                    stats.total_links += 1;
                    let mutual = nodes
                        .get(neighbor)
                        .is_some_and(|n| n.get_links(layer).contains(&id));
                    if !mutual {
                        stats.asymmetric_links += 1;
                    }
                }
            }
        }

        stats
    }
}
