//! Vector storage and similarity search for code chunks.
//!
//! This module provides a fixed-dimension, in-memory vector index keyed by
//! opaque chunk ids, with exact cosine-similarity search and a compact
//! two-file on-disk format.
//!
//! # Architecture
//! - [`VectorIndex`]: id → vector map plus an explicit insertion-order id
//!   list, so iteration and persistence are deterministic
//! - [`storage`]: `ids.json` + `embeddings.bin` persistence
//! - [`SharedVectorIndex`]: read/write-lock wrapper for callers that fan
//!   out read-only searches after a single indexing pass

mod concurrent;
mod index;
mod similarity;
pub mod storage;
mod types;

// Re-export core types for public API
pub use concurrent::SharedVectorIndex;
pub use index::VectorIndex;
pub use similarity::cosine_similarity;
pub use types::{BYTES_PER_F32, IndexStats, VectorDimension, VectorError, VectorResult};
