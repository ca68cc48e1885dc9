//! In-memory, fixed-dimension nearest-neighbor index over string ids.
//!
//! Search is exact brute-force cosine similarity: O(n·d) per query with no
//! acceleration structure. Callers needing sub-linear search must shard or
//! pre-filter before querying.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, trace};

use crate::vector::storage::{self, StoreContents};
use crate::vector::types::{IndexStats, VectorDimension, VectorError, VectorResult};
use crate::vector::cosine_similarity;

/// Vector store keyed by opaque chunk ids.
///
/// The dimension is fixed by the first insertion and is sticky: removing
/// every vector keeps it. Only [`clear`](Self::clear) and
/// [`load`](Self::load) reset it.
///
/// Iteration order is insertion order, tracked by an explicit id list that
/// is independent of the map's own ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorIndex {
    /// Vectors indexed by chunk id
    vectors: HashMap<String, Vec<f32>>,

    /// Ids in insertion order
    ids: Vec<String>,

    /// Fixed once the first vector is added
    dimension: Option<VectorDimension>,
}

impl VectorIndex {
    /// Creates an empty index whose dimension is set by the first `add`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index that only accepts vectors of `dimension`.
    #[must_use]
    pub fn with_dimension(dimension: VectorDimension) -> Self {
        Self {
            dimension: Some(dimension),
            ..Self::default()
        }
    }

    /// Loads a store previously written by [`save`](Self::save).
    pub fn from_dir(dir: impl AsRef<Path>) -> VectorResult<Self> {
        let mut index = Self::new();
        index.load(dir)?;
        Ok(index)
    }

    /// Inserts or replaces the vector for `id`.
    ///
    /// Replacing keeps the id's original position in iteration order.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the index already has a dimension and
    ///   `vector` differs in length; the index is unchanged
    /// - `InvalidDimension` if `vector` is empty and no dimension is set
    pub fn add(&mut self, id: impl Into<String>, vector: Vec<f32>) -> VectorResult<()> {
        match self.dimension {
            Some(dimension) => dimension.validate_vector(&vector)?,
            None => self.dimension = Some(VectorDimension::new(vector.len())?),
        }

        let id = id.into();
        match self.vectors.get_mut(&id) {
            Some(existing) => *existing = vector,
            None => {
                self.ids.push(id.clone());
                self.vectors.insert(id, vector);
            }
        }
        Ok(())
    }

    /// Applies [`add`](Self::add) to each entry in order.
    ///
    /// Not atomic: entries before a failing one stay applied.
    pub fn add_batch<I, S>(&mut self, entries: I) -> VectorResult<()>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        for (id, vector) in entries {
            self.add(id, vector)?;
        }
        Ok(())
    }

    /// Removes `id`, returning whether it was present.
    ///
    /// The dimension is kept even if the index becomes empty.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.vectors.remove(id).is_none() {
            return false;
        }
        if let Some(position) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(position);
        }
        true
    }

    /// Returns the vector for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.vectors.get(id).map(Vec::as_slice)
    }

    /// Returns whether `id` has a vector.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.vectors.contains_key(id)
    }

    /// Finds the `k` stored vectors most similar to `query`.
    ///
    /// Returns `(id, similarity)` pairs with `similarity >= threshold`,
    /// sorted by similarity descending. Equal scores keep insertion order.
    ///
    /// # Errors
    /// `DimensionMismatch` if `query` disagrees with the fixed dimension.
    pub fn find_similar(
        &self,
        query: &[f32],
        k: usize,
        threshold: f32,
    ) -> VectorResult<Vec<(String, f32)>> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        dimension.validate_vector(query)?;

        if k == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<(&str, f32)> = self
            .entries()
            .map(|(id, vector)| (id, cosine_similarity(query, vector)))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        // Stable sort so ties resolve by insertion order
        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        results.truncate(k);

        trace!(
            scanned = self.len(),
            returned = results.len(),
            threshold,
            "find_similar"
        );

        Ok(results
            .into_iter()
            .map(|(id, score)| (id.to_string(), score))
            .collect())
    }

    /// Returns the number of vectors stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether the index holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the fixed dimension, if one has been set.
    #[must_use]
    pub fn dimension(&self) -> Option<VectorDimension> {
        self.dimension
    }

    /// Returns a copy of the ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    /// Removes every vector and resets the dimension.
    pub fn clear(&mut self) {
        self.vectors.clear();
        self.ids.clear();
        self.dimension = None;
    }

    /// Iterates `(id, vector)` pairs in insertion order.
    ///
    /// Each call starts a fresh iteration.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[f32])> + Clone + '_ {
        self.ids.iter().filter_map(|id| {
            self.vectors
                .get(id)
                .map(|vector| (id.as_str(), vector.as_slice()))
        })
    }

    /// Returns size, dimension and an approximate heap footprint.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let vector_bytes = self
            .dimension
            .map_or(0, |dimension| dimension.vector_bytes());
        let per_entry_overhead =
            std::mem::size_of::<Vec<f32>>() + 2 * std::mem::size_of::<String>();
        let id_bytes: usize = self.ids.iter().map(|id| 2 * id.len()).sum();

        IndexStats {
            size: self.len(),
            dimension: self.dimension.map(|dimension| dimension.get()),
            approximate_memory_bytes: self.len() * (vector_bytes + per_entry_overhead) + id_bytes,
        }
    }

    /// Persists the index into `dir` (`ids.json` + `embeddings.bin`).
    ///
    /// Creates `dir` if it does not exist.
    pub fn save(&self, dir: impl AsRef<Path>) -> VectorResult<()> {
        let dir = dir.as_ref();
        let entries: Vec<(&str, &[f32])> = self.entries().collect();
        storage::write_store(dir, self.dimension, &entries)?;

        info!(
            path = %dir.display(),
            vectors = entries.len(),
            dimension = self.dimension.map_or(0, |dimension| dimension.get()),
            "Saved vector index"
        );
        Ok(())
    }

    /// Replaces the whole index with the store in `dir`.
    ///
    /// Both files are read and validated first; on any error the current
    /// contents are left untouched.
    ///
    /// # Errors
    /// - `StoreFilesNotFound` if `ids.json` or `embeddings.bin` is missing
    /// - `CorruptStore` if the binary length disagrees with its header or
    ///   the id list disagrees with the vector count
    pub fn load(&mut self, dir: impl AsRef<Path>) -> VectorResult<()> {
        let dir = dir.as_ref();
        let StoreContents {
            dimension,
            ids,
            vectors: loaded,
        } = storage::read_store(dir)?;

        let mut vectors = HashMap::with_capacity(ids.len());
        for (id, vector) in ids.iter().zip(loaded) {
            vectors.insert(id.clone(), vector);
        }

        self.vectors = vectors;
        self.ids = ids;
        self.dimension = dimension;

        info!(
            path = %dir.display(),
            vectors = self.len(),
            "Loaded vector index"
        );
        Ok(())
    }

    /// Validates `vector` against the index without inserting it.
    ///
    /// Lets callers that write to several stores reject a bad vector
    /// before touching any of them.
    pub fn check_vector(&self, vector: &[f32]) -> VectorResult<()> {
        match self.dimension {
            Some(dimension) => dimension.validate_vector(vector),
            None if vector.is_empty() => Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            }),
            None => Ok(()),
        }
    }
}
