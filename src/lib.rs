//! Semantic duplicate detection over embedded code chunks.
//!
//! Chunks (components, hooks, functions) are stored as fixed-dimension
//! embedding vectors next to their source location. Duplicate groups are
//! computed on demand by greedy anchor-based clustering over exact cosine
//! similarity.

pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod vector;
pub mod workspace;

// Explicit exports for better API clarity
pub use config::{ConfigError, Settings};
pub use duplicates::{
    DuplicateGroup, DuplicateGroupFinder, DuplicateScore, GroupMember, GroupingOptions,
    SearchOptions,
};
pub use error::{Error, Result};
pub use metadata::{ChunkKind, ChunkMetadata, MetadataError, MetadataIndex, MetadataResult};
pub use vector::{
    SharedVectorIndex, VectorDimension, VectorError, VectorIndex, VectorResult, cosine_similarity,
};
pub use workspace::DuplicateIndex;
