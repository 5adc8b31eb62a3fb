//! Contiguous vector storage for improved cache locality.
//!
//! All vectors live in a single `Vec<f32>` buffer, each occupying `dimension`
//! consecutive elements addressed by node id.
//!
//! # Memory Layout
//!
//! ```text
//! Buffer: [v0_d0, v0_d1, ..., v0_dn, v1_d0, v1_d1, ..., v1_dn, ...]
//! Index:  |<---- vector 0 ---->|    |<---- vector 1 ---->|
//! ```

use super::node::NodeId;
use crate::error::{Error, Result};
use parking_lot::{RwLock, RwLockReadGuard};

/// Contiguous vector storage with O(1) access by node id.
#[derive(Debug)]
pub struct VectorStore {
    /// Contiguous buffer holding all vectors
    buffer: RwLock<Vec<f32>>,
    /// Vector dimension
    dimension: usize,
}

impl VectorStore {
    /// Creates a new vector store with the specified dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            buffer: RwLock::new(Vec::new()),
            dimension,
        }
    }

    /// Returns the vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of vectors stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.read().len() / self.dimension.max(1)
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.dimension {
            Ok(())
        } else {
            Err(Error::dimension_mismatch(self.dimension, vector.len()))
        }
    }

    /// Appends a vector and returns its node id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the length is wrong.
    pub fn push(&self, vector: &[f32]) -> Result<NodeId> {
        self.check(vector)?;
        let mut buffer = self.buffer.write();
        let node = buffer.len() / self.dimension.max(1);
        buffer.extend_from_slice(vector);
        Ok(node)
    }

    /// Replaces the vector stored for `node` in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the length is wrong and
    /// [`Error::InvalidArgument`] if `node` was never allocated.
    pub fn overwrite(&self, node: NodeId, vector: &[f32]) -> Result<()> {
        self.check(vector)?;
        let mut buffer = self.buffer.write();
        let offset = node * self.dimension;
        match buffer.get_mut(offset..offset + self.dimension) {
            Some(slot) => {
                slot.copy_from_slice(vector);
                Ok(())
            }
            None => Err(Error::InvalidArgument(format!(
                "node {node} is not allocated"
            ))),
        }
    }

    /// Returns a copy of the vector for `node`, or `None` if not allocated.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<Vec<f32>> {
        let buffer = self.buffer.read();
        let offset = node * self.dimension;
        buffer
            .get(offset..offset + self.dimension)
            .map(<[f32]>::to_vec)
    }

    /// Acquires a read view over every stored vector.
    ///
    /// The view holds the store's read lock: overwrites wait until it is
    /// dropped, so a search or an insert sees one consistent snapshot.
    #[must_use]
    pub fn read(&self) -> VectorsRead<'_> {
        VectorsRead {
            guard: self.buffer.read(),
            dimension: self.dimension,
        }
    }
}

/// Read-locked view over a [`VectorStore`].
pub struct VectorsRead<'a> {
    guard: RwLockReadGuard<'a, Vec<f32>>,
    dimension: usize,
}

impl VectorsRead<'_> {
    /// Borrows the vector of an allocated node.
    ///
    /// # Panics
    ///
    /// Panics if `node` was never allocated. Graph node ids are always
    /// allocated in the store first.
    #[must_use]
    #[inline]
    pub fn get(&self, node: NodeId) -> &[f32] {
        let offset = node * self.dimension;
        &self.guard[offset..offset + self.dimension]
    }

    /// Number of vectors visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard.len() / self.dimension.max(1)
    }

    /// Returns true if the view holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}
