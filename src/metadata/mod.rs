//! Chunk metadata: where each indexed chunk lives and what kind it is.
//!
//! Ids here are the same opaque ids used by the vector index. Every id in
//! the vector index should have an entry here for grouping to be meaningful;
//! the converse is not required.

mod index;
mod types;

pub use index::{CHUNKS_FILE, MetadataIndex};
pub use types::{ChunkKind, ChunkMetadata, MetadataError, MetadataResult};
