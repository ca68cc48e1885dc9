//! Id → source-location index with point lookup by (file, line).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metadata::{ChunkMetadata, MetadataError, MetadataResult};
use crate::vector::storage::staged_path;

/// File holding the persisted metadata records.
pub const CHUNKS_FILE: &str = "chunks.json";

/// Maps chunk ids to their source location and kind.
///
/// Iteration order is insertion order; replacing an id keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataIndex {
    chunks: HashMap<String, ChunkMetadata>,
    ids: Vec<String>,
}

#[derive(Serialize)]
struct ChunkRecordRef<'a> {
    id: &'a str,
    #[serde(flatten)]
    metadata: &'a ChunkMetadata,
}

#[derive(Deserialize)]
struct ChunkRecord {
    id: String,
    #[serde(flatten)]
    metadata: ChunkMetadata,
}

impl MetadataIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an index previously written by [`save`](Self::save).
    pub fn from_dir(dir: impl AsRef<Path>) -> MetadataResult<Self> {
        let mut index = Self::new();
        index.load(dir)?;
        Ok(index)
    }

    /// Inserts or replaces the metadata for `id`, returning the old value.
    ///
    /// # Errors
    /// `InvalidLineRange` if `start_line` is 0 or exceeds `end_line`.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        metadata: ChunkMetadata,
    ) -> MetadataResult<Option<ChunkMetadata>> {
        let id = id.into();
        metadata.validate(&id)?;

        match self.chunks.get_mut(&id) {
            Some(existing) => Ok(Some(std::mem::replace(existing, metadata))),
            None => {
                self.ids.push(id.clone());
                self.chunks.insert(id, metadata);
                Ok(None)
            }
        }
    }

    /// Removes `id`, returning its metadata if it was present.
    pub fn remove(&mut self, id: &str) -> Option<ChunkMetadata> {
        let removed = self.chunks.remove(id)?;
        if let Some(position) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(position);
        }
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ChunkMetadata> {
        self.chunks.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.chunks.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.ids.clear();
    }

    /// Iterates `(id, metadata)` pairs in insertion order.
    ///
    /// Each call starts a fresh iteration.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> + Clone + '_ {
        self.ids
            .iter()
            .filter_map(|id| self.chunks.get(id).map(|metadata| (id.as_str(), metadata)))
    }

    /// Finds the chunk in `file_path` whose line range contains `line`.
    ///
    /// When chunks nest, the one with the smallest `end_line - start_line`
    /// wins; equal spans resolve to the earliest inserted.
    #[must_use]
    pub fn get_at_location(&self, file_path: &str, line: u32) -> Option<(&str, &ChunkMetadata)> {
        self.entries()
            .filter(|(_, metadata)| metadata.file_path == file_path && metadata.contains_line(line))
            // min_by_key keeps the first of equal minimums
            .min_by_key(|(_, metadata)| metadata.span())
    }

    /// Ids of every chunk in `file_path`, in insertion order.
    #[must_use]
    pub fn ids_for_file(&self, file_path: &str) -> Vec<&str> {
        self.entries()
            .filter(|(_, metadata)| metadata.file_path == file_path)
            .map(|(id, _)| id)
            .collect()
    }

    /// Writes every record to `dir/chunks.json`, creating `dir` if needed.
    ///
    /// The file is replaced only once the new contents are fully written.
    pub fn save(&self, dir: impl AsRef<Path>) -> MetadataResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let records: Vec<ChunkRecordRef<'_>> = self
            .entries()
            .map(|(id, metadata)| ChunkRecordRef { id, metadata })
            .collect();

        let path = dir.join(CHUNKS_FILE);
        let staged = staged_path(&path);
        let mut writer = BufWriter::new(File::create(&staged)?);
        serde_json::to_writer(&mut writer, &records)
            .map_err(|e| MetadataError::Serialization(format!("Failed to write metadata: {e}")))?;
        writer.flush()?;
        drop(writer);
        std::fs::rename(&staged, &path)?;

        info!(path = %dir.display(), chunks = records.len(), "Saved metadata index");
        Ok(())
    }

    /// Replaces the index with the records in `dir/chunks.json`.
    ///
    /// The file is parsed and every record validated before the current
    /// contents are replaced.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> MetadataResult<()> {
        let dir = dir.as_ref();
        let path = dir.join(CHUNKS_FILE);
        if !path.is_file() {
            return Err(MetadataError::FileNotFound { path });
        }

        let reader = BufReader::new(File::open(&path)?);
        let records: Vec<ChunkRecord> = serde_json::from_reader(reader)
            .map_err(|e| MetadataError::Serialization(format!("Failed to parse metadata: {e}")))?;

        let mut loaded = Self::new();
        for ChunkRecord { id, metadata } in records {
            loaded.insert(id, metadata)?;
        }
        *self = loaded;

        info!(path = %dir.display(), chunks = self.len(), "Loaded metadata index");
        Ok(())
    }
}
