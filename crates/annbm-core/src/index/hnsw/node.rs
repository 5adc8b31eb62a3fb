//! HNSW graph node.
//!
//! A node owns one neighbor list per layer it belongs to. Each list sits
//! behind its own lock and is only ever replaced or edited whole, so a reader
//! observes either the previous or the next list, never a torn one.

use parking_lot::RwLock;

/// Dense internal identifier of a node in the graph arena.
pub type NodeId = usize;

/// A node in the HNSW arena.
#[derive(Debug)]
pub struct Node {
    /// Caller-assigned identifier
    pub(crate) lid: u32,
    /// Highest layer this node belongs to
    pub(crate) level: usize,
    /// Adjacency per layer: `links[layer]` for `layer in 0..=level`
    links: Vec<RwLock<Vec<NodeId>>>,
}

impl Node {
    /// Creates a node present at layers `0..=level` with empty lists.
    pub(crate) fn new(lid: u32, level: usize) -> Self {
        Self {
            lid,
            level,
            links: (0..=level).map(|_| RwLock::new(Vec::new())).collect(),
        }
    }

    /// Returns the caller-assigned identifier.
    #[must_use]
    pub fn lid(&self) -> u32 {
        self.lid
    }

    /// Returns the highest layer of this node.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Gets the neighbors at a layer. Empty if the node is not on that layer.
    pub(crate) fn get_links(&self, layer: usize) -> Vec<NodeId> {
        self.links
            .get(layer)
            .map(|links| links.read().clone())
            .unwrap_or_default()
    }

    /// Number of neighbors at a layer.
    pub(crate) fn link_count(&self, layer: usize) -> usize {
        self.links.get(layer).map_or(0, |links| links.read().len())
    }

    /// Replaces the neighbor list at a layer.
    #[cfg(test)]
    pub(crate) fn set_links(&self, layer: usize, neighbors: Vec<NodeId>) {
        if let Some(links) = self.links.get(layer) {
            *links.write() = neighbors;
        }
    }

    /// Adds a neighbor unless already present. Returns the resulting list length.
    pub(crate) fn add_link(&self, layer: usize, neighbor: NodeId) -> usize {
        match self.links.get(layer) {
            Some(links) => {
                let mut links = links.write();
                if !links.contains(&neighbor) {
                    links.push(neighbor);
                }
                links.len()
            }
            None => 0,
        }
    }

    /// Removes a neighbor. Returns true if it was present.
    pub(crate) fn remove_link(&self, layer: usize, neighbor: NodeId) -> bool {
        match self.links.get(layer) {
            Some(links) => {
                let mut links = links.write();
                let before = links.len();
                links.retain(|&n| n != neighbor);
                links.len() != before
            }
            None => false,
        }
    }

    /// Clears every layer and returns the former neighbor lists, top layer last.
    pub(crate) fn take_all_links(&self) -> Vec<Vec<NodeId>> {
        self.links
            .iter()
            .map(|links| std::mem::take(&mut *links.write()))
            .collect()
    }

    /// Runs `edit` on the neighbor list at `layer` under its write lock.
    ///
    /// Used for read-modify-write updates such as pruning, so concurrent
    /// link additions are not lost between the read and the write.
    pub(crate) fn edit_links<R>(
        &self,
        layer: usize,
        edit: impl FnOnce(&mut Vec<NodeId>) -> R,
    ) -> Option<R> {
        self.links.get(layer).map(|links| edit(&mut links.write()))
    }
}
