//! [`DuplicateIndex`]: vector and metadata indexes kept in step.
//!
//! Both indexes persist into the same directory:
//!
//! ```text
//! <dir>/ids.json         vector ids, insertion order
//! <dir>/embeddings.bin   header + little-endian f32 payload
//! <dir>/chunks.json      chunk metadata records
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::config::Settings;
use crate::duplicates::{DuplicateGroup, DuplicateGroupFinder, GroupingOptions, SearchOptions};
use crate::error::Result;
use crate::metadata::{ChunkMetadata, MetadataIndex};
use crate::vector::{VectorIndex, VectorResult};

/// Owns the vector and metadata indexes for one workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateIndex {
    vectors: VectorIndex,
    metadata: MetadataIndex,
    grouping: GroupingOptions,
    search: SearchOptions,
}

impl DuplicateIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty index with non-default grouping and search options.
    #[must_use]
    pub fn with_options(grouping: GroupingOptions, search: SearchOptions) -> Self {
        Self {
            grouping,
            search,
            ..Self::default()
        }
    }

    /// Loads both indexes from `dir`, using default options.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let vectors = VectorIndex::from_dir(dir)?;
        let metadata = MetadataIndex::from_dir(dir)?;

        let missing = vectors
            .entries()
            .filter(|(id, _)| !metadata.contains(id))
            .count();
        if missing > 0 {
            debug!(missing, "Vectors without metadata will never be grouped");
        }

        Ok(Self {
            vectors,
            metadata,
            ..Self::default()
        })
    }

    /// Opens the index at the settings' index path with their options.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut index = Self::open(settings.resolved_index_path())?;
        index.grouping = settings.grouping.clone();
        index.search = settings.search;
        Ok(index)
    }

    /// Writes both indexes into `dir`.
    ///
    /// Each file is replaced only after it is fully written. If the metadata
    /// write fails, the vector files are already updated.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        self.vectors.save(dir)?;
        self.metadata.save(dir)?;
        info!(path = %dir.display(), chunks = self.len(), "Saved duplicate index");
        Ok(())
    }

    /// Adds or replaces a chunk in both indexes.
    ///
    /// The vector and line range are validated before either index is
    /// touched, so a rejected chunk leaves the index unchanged.
    pub fn insert_chunk(
        &mut self,
        id: impl Into<String>,
        metadata: ChunkMetadata,
        vector: Vec<f32>,
    ) -> Result<()> {
        let id = id.into();
        self.vectors.check_vector(&vector)?;
        metadata.validate(&id)?;

        self.vectors.add(id.clone(), vector)?;
        self.metadata.insert(id, metadata)?;
        Ok(())
    }

    /// Removes a chunk from both indexes. Returns whether it existed in either.
    pub fn remove_chunk(&mut self, id: &str) -> bool {
        let had_vector = self.vectors.remove(id);
        let had_metadata = self.metadata.remove(id).is_some();
        had_vector || had_metadata
    }

    /// Number of chunks with metadata.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// True when no chunk has metadata; orphan vectors do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn vectors(&self) -> &VectorIndex {
        &self.vectors
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataIndex {
        &self.metadata
    }

    #[must_use]
    pub fn grouping_options(&self) -> &GroupingOptions {
        &self.grouping
    }

    #[must_use]
    pub fn search_options(&self) -> &SearchOptions {
        &self.search
    }

    fn finder(&self) -> DuplicateGroupFinder<'_> {
        DuplicateGroupFinder::new(&self.vectors, &self.metadata)
    }

    /// Groups duplicates with the configured options.
    pub fn find_duplicates(&self) -> VectorResult<Vec<DuplicateGroup>> {
        self.finder().find_duplicate_groups(&self.grouping)
    }

    pub fn find_duplicate_groups(
        &self,
        options: &GroupingOptions,
    ) -> VectorResult<Vec<DuplicateGroup>> {
        self.finder().find_duplicate_groups(options)
    }

    /// Chunks similar to the one at `file_path:line`, with the configured
    /// search options unless `options` is given.
    pub fn find_similar_to_location(
        &self,
        file_path: &str,
        line: u32,
        options: Option<&SearchOptions>,
    ) -> VectorResult<Vec<(String, f32)>> {
        self.finder()
            .find_similar_to_location(file_path, line, options.unwrap_or(&self.search))
    }

    pub fn find_similar_to_query(
        &self,
        query: &[f32],
        options: Option<&SearchOptions>,
    ) -> VectorResult<Vec<(String, f32)>> {
        self.finder()
            .find_similar_to_query(query, options.unwrap_or(&self.search))
    }
}
