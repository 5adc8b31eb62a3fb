//! HNSW (Hierarchical Navigable Small World) graph.
//!
//! Native implementation used by [`AnnBm`](crate::AnnBm): vectors live in a
//! contiguous [`VectorStore`], the graph in an arena of nodes with one locked
//! neighbor list per layer.
//!
//! # Module Organization
//!
//! - `params`: construction parameters and their validation
//! - `graph`: node arena, entry point, structural statistics
//! - `search`: greedy descent and beam search
//! - `insert`: linking, neighbor selection, pruning, relinking on overwrite
//! - `write_gate`: serialization strategy for writers
//!
//! # References
//!
//! - Paper: "Efficient and robust approximate nearest neighbor search
//!   using Hierarchical Navigable Small World graphs" (Malkov & Yashunin, 2016)
//! - arXiv: <https://arxiv.org/abs/1603.09320>

// ============================================================================
// Core modules
// ============================================================================
mod graph;
mod insert;
mod level;
mod node;
mod ordered_float;
mod params;
mod search;
mod vector_store;
mod write_gate;

#[cfg(test)]
mod level_tests;

// ============================================================================
// Public API
// ============================================================================
pub use graph::{EntryPoint, GraphStats, HnswGraph};
pub use node::NodeId;
pub use params::{HnswIndexParams, MAX_LEVELS};
pub use search::ScoredNode;
pub use vector_store::{VectorStore, VectorsRead};

pub(crate) use write_gate::WriteGate;
