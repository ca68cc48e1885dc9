//! Thread-safe wrapper for [`VectorIndex`].
//!
//! `VectorIndex` itself carries no synchronization. The intended pattern is
//! a single indexing writer followed by many read-only searches; this
//! wrapper serializes writers and lets readers share the index.

use std::path::Path;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::vector::{VectorIndex, VectorResult};

/// Shared handle to a vector index. Clones refer to the same index.
#[derive(Clone, Default)]
pub struct SharedVectorIndex {
    inner: Arc<RwLock<VectorIndex>>,
}

impl SharedVectorIndex {
    /// Wraps an existing index.
    pub fn new(index: VectorIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Shared access for searches and lookups.
    pub fn read(&self) -> RwLockReadGuard<'_, VectorIndex> {
        self.inner.read()
    }

    /// Exclusive access for mutation.
    pub fn write(&self) -> RwLockWriteGuard<'_, VectorIndex> {
        self.inner.write()
    }

    /// Adds a vector with exclusive access.
    pub fn add(&self, id: impl Into<String>, vector: Vec<f32>) -> VectorResult<()> {
        self.inner.write().add(id, vector)
    }

    /// Searches with shared access.
    pub fn find_similar(
        &self,
        query: &[f32],
        k: usize,
        threshold: f32,
    ) -> VectorResult<Vec<(String, f32)>> {
        self.inner.read().find_similar(query, k, threshold)
    }

    /// Saves with shared access, so writers wait until the snapshot is on disk.
    pub fn save(&self, dir: impl AsRef<Path>) -> VectorResult<()> {
        self.inner.read().save(dir)
    }

    /// Unwraps the index if this is the last handle.
    pub fn try_into_inner(self) -> Result<VectorIndex, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<VectorIndex> for SharedVectorIndex {
    fn from(index: VectorIndex) -> Self {
        Self::new(index)
    }
}

impl std::fmt::Debug for SharedVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Try to acquire read lock for debug output
        match self.inner.try_read() {
            Some(index) => write!(f, "SharedVectorIndex {{ size: {} }}", index.len()),
            None => write!(f, "SharedVectorIndex {{ <locked> }}"),
        }
    }
}
