//! Index structures.

pub mod hnsw;

pub use hnsw::{GraphStats, HnswGraph, HnswIndexParams};
