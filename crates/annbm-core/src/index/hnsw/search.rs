//! HNSW search: greedy descent and bounded beam search.

use super::graph::HnswGraph;
use super::node::{Node, NodeId};
use super::ordered_float::OrderedFloat;
use super::vector_store::VectorsRead;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A node scored against a query, with its raw ranking distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredNode {
    /// Internal node id
    pub node: NodeId,
    /// Caller-assigned identifier
    pub lid: u32,
    /// Raw distance (lower is closer)
    pub distance: f32,
}

impl HnswGraph {
    #[inline]
    pub(super) fn distance_to(&self, vectors: &VectorsRead<'_>, query: &[f32], node: NodeId) -> f32 {
        self.metric.raw_distance(query, vectors.get(node))
    }

    /// Searches for the `ef` nearest nodes to `query`.
    ///
    /// Greedy descent from the entry point down to layer 1, then a beam search
    /// of width `ef` on layer 0. Results are ascending by raw distance, ties
    /// by node id.
    #[must_use]
    pub fn search(&self, vectors: &VectorsRead<'_>, query: &[f32], ef: usize) -> Vec<ScoredNode> {
        let nodes = self.nodes.read();
        let Some(entry) = *self.entry_point.read() else {
            return Vec::new();
        };

        let mut current = (entry.node, self.distance_to(vectors, query, entry.node));
        for layer in (1..=entry.level).rev() {
            current = self.greedy_closest(&nodes, vectors, query, current, layer, None);
        }

        self.search_layer(&nodes, vectors, query, &[current], ef.max(1), 0, None)
            .into_iter()
            .map(|(node, distance)| ScoredNode {
                node,
                lid: nodes[node].lid,
                distance,
            })
            .collect()
    }

    /// Scores every node against `query`, ascending by raw distance then node id.
    #[must_use]
    pub fn brute_force(&self, vectors: &VectorsRead<'_>, query: &[f32]) -> Vec<ScoredNode> {
        let nodes = self.nodes.read();
        let mut scored: Vec<ScoredNode> = nodes
            .iter()
            .enumerate()
            .map(|(node, n)| ScoredNode {
                node,
                lid: n.lid,
                distance: self.distance_to(vectors, query, node),
            })
            .collect();
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.node.cmp(&b.node)));
        scored
    }

    /// Single-path greedy walk on one layer: move to the closest neighbor until
    /// no neighbor improves on the current node.
    pub(super) fn greedy_closest(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        query: &[f32],
        start: (NodeId, f32),
        layer: usize,
        exclude: Option<NodeId>,
    ) -> (NodeId, f32) {
        let (mut best, mut best_dist) = start;

        loop {
            let mut improved = false;

            for neighbor in nodes[best].get_links(layer) {
                if Some(neighbor) == exclude {
                    continue;
                }
                let dist = self.distance_to(vectors, query, neighbor);
                if dist < best_dist {
                    best = neighbor;
                    best_dist = dist;
                    improved = true;
                }
            }

            if !improved {
                break;
            }
        }

        (best, best_dist)
    }

    /// Beam search on a single layer keeping the `ef` best candidates.
    ///
    /// `exclude` is treated as already visited: it is neither expanded nor
    /// returned. Used while (re)inserting a node so it never links to itself.
    pub(super) fn search_layer(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        query: &[f32],
        entry_points: &[(NodeId, f32)],
        ef: usize,
        layer: usize,
        exclude: Option<NodeId>,
    ) -> Vec<(NodeId, f32)> {
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut candidates: BinaryHeap<Reverse<(OrderedFloat, NodeId)>> = BinaryHeap::new();
        let mut results: BinaryHeap<(OrderedFloat, NodeId)> = BinaryHeap::new();

        if let Some(excluded) = exclude {
            visited.insert(excluded);
        }

        for &(ep, dist) in entry_points {
            if visited.insert(ep) {
                candidates.push(Reverse((OrderedFloat(dist), ep)));
                results.push((OrderedFloat(dist), ep));
                if results.len() > ef {
                    results.pop();
                }
            }
        }

        while let Some(Reverse((OrderedFloat(c_dist), c_node))) = candidates.pop() {
            let furthest = results.peek().map_or(f32::MAX, |r| r.0 .0);
            if c_dist > furthest && results.len() >= ef {
                break;
            }

            for neighbor in nodes[c_node].get_links(layer) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let dist = self.distance_to(vectors, query, neighbor);
                let furthest = results.peek().map_or(f32::MAX, |r| r.0 .0);

                if results.len() < ef || dist < furthest {
                    candidates.push(Reverse((OrderedFloat(dist), neighbor)));
                    results.push((OrderedFloat(dist), neighbor));
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        let mut found: Vec<(NodeId, f32)> = results.into_iter().map(|(d, n)| (n, d.0)).collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found
    }
}
