//! HNSW graph wiring: insertion, neighbor selection, pruning and repair.
//!
//! Every routine here runs with the vector view and the node arena read-locked
//! by the caller. Only per-node link lists and the entry point are written.

use super::graph::{EntryPoint, HnswGraph};
use super::node::{Node, NodeId};
use super::vector_store::VectorsRead;

impl HnswGraph {
    /// Links a freshly added node into the graph.
    ///
    /// The first node becomes the entry point and gets no links.
    pub(crate) fn insert(&self, vectors: &VectorsRead<'_>, node: NodeId) {
        let nodes = self.nodes.read();
        let level = nodes[node].level;

        let entry = {
            let mut entry_point = self.entry_point.write();
            match *entry_point {
                Some(entry) => entry,
                None => {
                    *entry_point = Some(EntryPoint { node, level });
                    tracing::trace!(node, level, "first node becomes entry point");
                    return;
                }
            }
        };

        let query = vectors.get(node);
        let seed = (entry.node, self.distance_to(vectors, query, entry.node));
        self.link_from(&nodes, vectors, node, level, &[seed], entry.level);
        self.promote_entry_point(node, level);
    }

    /// Rewires a node whose vector was overwritten. The node keeps its level.
    ///
    /// Former neighbors lose their edge to the node and are reconnected among
    /// themselves, then the node is linked again as if newly inserted.
    pub(crate) fn reinsert(&self, vectors: &VectorsRead<'_>, node: NodeId) {
        let nodes = self.nodes.read();
        let level = nodes[node].level;
        let old_links = nodes[node].take_all_links();

        for (layer, neighbors) in old_links.iter().enumerate() {
            for &neighbor in neighbors {
                nodes[neighbor].remove_link(layer, node);
            }
            self.mutual_reconnect(&nodes, vectors, neighbors, layer);
        }

        let query = vectors.get(node);
        let Some((seeds, seed_level)) =
            self.reinsert_seeds(&nodes, vectors, query, node, &old_links)
        else {
            tracing::trace!(node, "sole node, nothing to relink");
            return;
        };

        self.link_from(&nodes, vectors, node, level, &seeds, seed_level);

        // Former neighbors left without any link hang off the moved node
        for (layer, neighbors) in old_links.iter().enumerate() {
            for &former in neighbors {
                if nodes[former].link_count(layer) == 0 {
                    nodes[former].add_link(layer, node);
                    nodes[node].add_link(layer, former);
                    self.shrink_if_needed(&nodes, vectors, node, layer);
                }
            }
        }

        self.promote_entry_point(node, level);
        tracing::trace!(node, level, "node relinked");
    }

    /// Picks where a relinked node starts its descent.
    ///
    /// Normally the global entry point. When the node *is* the entry point, its
    /// former neighbors on the highest non-empty layer are used, and if it had
    /// none, any other node.
    fn reinsert_seeds(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        query: &[f32],
        node: NodeId,
        old_links: &[Vec<NodeId>],
    ) -> Option<(Vec<(NodeId, f32)>, usize)> {
        let entry = self.entry_point()?;

        if entry.node != node {
            let seed = (entry.node, self.distance_to(vectors, query, entry.node));
            return Some((vec![seed], entry.level));
        }

        if let Some((layer, neighbors)) = old_links
            .iter()
            .enumerate()
            .rev()
            .find(|(_, neighbors)| !neighbors.is_empty())
        {
            let seeds = neighbors
                .iter()
                .map(|&n| (n, self.distance_to(vectors, query, n)))
                .collect();
            return Some((seeds, layer));
        }

        let other = (0..nodes.len()).find(|&n| n != node)?;
        let seed = (other, self.distance_to(vectors, query, other));
        Some((vec![seed], nodes[other].level))
    }

    /// Descends greedily from `seeds` on `seed_level` down to `level + 1`, then
    /// selects and links neighbors on every layer from `min(level, seed_level)`
    /// down to 0.
    fn link_from(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        node: NodeId,
        level: usize,
        seeds: &[(NodeId, f32)],
        seed_level: usize,
    ) {
        let query = vectors.get(node);
        let mut entry_points = seeds.to_vec();

        for layer in (level + 1..=seed_level).rev() {
            let start = entry_points
                .iter()
                .copied()
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some(start) = start {
                let closest = self.greedy_closest(nodes, vectors, query, start, layer, Some(node));
                entry_points = vec![closest];
            }
        }

        for layer in (0..=level.min(seed_level)).rev() {
            let candidates = self.search_layer(
                nodes,
                vectors,
                query,
                &entry_points,
                self.params.neighbors_to_explore,
                layer,
                Some(node),
            );

            let budget = self.params.max_links_for_level(layer);
            let selected = self.select_neighbors(vectors, &candidates, budget);
            // Merge, so reverse links added by concurrent writers survive
            nodes[node].edit_links(layer, |links| {
                for &neighbor in &selected {
                    if !links.contains(&neighbor) {
                        links.push(neighbor);
                    }
                }
            });

            for &neighbor in &selected {
                nodes[neighbor].add_link(layer, node);
                self.shrink_if_needed(nodes, vectors, neighbor, layer);
            }
            self.shrink_if_needed(nodes, vectors, node, layer);

            if !candidates.is_empty() {
                entry_points = candidates;
            }
        }
    }

    /// Chooses at most `budget` neighbors from `candidates`, which must be
    /// sorted ascending by distance to the base vector.
    ///
    /// With the heuristic, a candidate is preferred only if it is at least as
    /// close to the base as to every neighbor already kept. Leftover budget is
    /// then filled with the closest rejected candidates.
    pub(super) fn select_neighbors(
        &self,
        vectors: &VectorsRead<'_>,
        candidates: &[(NodeId, f32)],
        budget: usize,
    ) -> Vec<NodeId> {
        if !self.params.heuristic_select_neighbors || candidates.len() <= budget {
            return candidates.iter().take(budget).map(|&(n, _)| n).collect();
        }

        let mut selected: Vec<NodeId> = Vec::with_capacity(budget);
        for &(candidate, dist_to_base) in candidates {
            if selected.len() >= budget {
                break;
            }
            let vector = vectors.get(candidate);
            let diverse = selected
                .iter()
                .all(|&s| self.metric.raw_distance(vector, vectors.get(s)) >= dist_to_base);
            if diverse {
                selected.push(candidate);
            }
        }

        for &(candidate, _) in candidates {
            if selected.len() >= budget {
                break;
            }
            if !selected.contains(&candidate) {
                selected.push(candidate);
            }
        }
        selected
    }

    /// Prunes the links of `node` at `layer` back to the layer budget.
    ///
    /// Dropped edges are removed in both directions. A neighbor whose only
    /// link is `node` is kept ahead of the selection rule; if there are more
    /// of those than the budget, the surplus is moved onto the closest kept
    /// neighbor with room, so pruning never leaves a node without links.
    pub(super) fn shrink_if_needed(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        node: NodeId,
        layer: usize,
    ) {
        let budget = self.params.max_links_for_level(layer);
        let links = nodes[node].get_links(layer);
        if links.len() <= budget {
            return;
        }

        let base = vectors.get(node);
        let mut candidates: Vec<(NodeId, f32)> = links
            .iter()
            .map(|&n| (n, self.metric.raw_distance(base, vectors.get(n))))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let (sole, shared): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|&(n, _)| nodes[n].link_count(layer) <= 1);
        let mut kept: Vec<NodeId> = sole.iter().take(budget).map(|&(n, _)| n).collect();
        kept.extend(self.select_neighbors(vectors, &shared, budget - kept.len()));
        let stranded: Vec<NodeId> = sole.iter().skip(budget).map(|&(n, _)| n).collect();

        let dropped = nodes[node]
            .edit_links(layer, |current| {
                let dropped: Vec<NodeId> = current
                    .iter()
                    .copied()
                    .filter(|n| links.contains(n) && !kept.contains(n))
                    .collect();
                current.retain(|n| !dropped.contains(n));
                dropped
            })
            .unwrap_or_default();

        for other in dropped {
            if stranded.contains(&other) && !self.rehome(nodes, vectors, other, &kept, layer) {
                tracing::trace!(node, other, layer, "no room to rehome, edge kept one way");
                continue;
            }
            nodes[other].remove_link(layer, node);
        }
    }

    /// Links `orphan` both ways to the closest node of `hosts` that is under
    /// budget. Returns false if none has room.
    fn rehome(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        orphan: NodeId,
        hosts: &[NodeId],
        layer: usize,
    ) -> bool {
        let budget = self.params.max_links_for_level(layer);
        let vector = vectors.get(orphan);

        let host = hosts
            .iter()
            .copied()
            .filter(|&h| h != orphan && nodes[h].link_count(layer) < budget)
            .map(|h| (h, self.metric.raw_distance(vector, vectors.get(h))))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        match host {
            Some((host, _)) => {
                nodes[orphan].add_link(layer, host);
                nodes[host].add_link(layer, orphan);
                true
            }
            None => false,
        }
    }

    /// Reconnects the former neighbors of a relinked node on one layer.
    ///
    /// Pairs are tried closest first and linked both ways while both ends are
    /// under budget.
    fn mutual_reconnect(
        &self,
        nodes: &[Node],
        vectors: &VectorsRead<'_>,
        neighbors: &[NodeId],
        layer: usize,
    ) {
        let budget = self.params.max_links_for_level(layer);

        let mut pairs: Vec<(f32, NodeId, NodeId)> = Vec::new();
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                let dist = self.metric.raw_distance(vectors.get(a), vectors.get(b));
                pairs.push((dist, a, b));
            }
        }
        pairs.sort_by(|x, y| x.0.total_cmp(&y.0).then((x.1, x.2).cmp(&(y.1, y.2))));

        let mut added = 0usize;
        for (_, a, b) in pairs {
            if nodes[a].link_count(layer) >= budget || nodes[b].link_count(layer) >= budget {
                continue;
            }
            if nodes[a].get_links(layer).contains(&b) {
                continue;
            }
            nodes[a].add_link(layer, b);
            nodes[b].add_link(layer, a);
            // Concurrent writers may have filled either list meanwhile
            self.shrink_if_needed(nodes, vectors, a, layer);
            self.shrink_if_needed(nodes, vectors, b, layer);
            added += 1;
        }

        if added > 0 {
            tracing::trace!(layer, added, "reconnected former neighbors");
        }
    }

    /// Makes `node` the entry point if its level exceeds the current one.
    fn promote_entry_point(&self, node: NodeId, level: usize) {
        let mut entry_point = self.entry_point.write();
        match *entry_point {
            Some(entry) if entry.level >= level => {}
            _ => {
                *entry_point = Some(EntryPoint { node, level });
                tracing::debug!(node, level, "entry point promoted");
            }
        }
    }
}
