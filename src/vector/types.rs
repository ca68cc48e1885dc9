//! Type-safe wrappers and core types for the vector index.
//!
//! This module provides the dimension newtype, the error taxonomy shared by
//! every vector operation, and the statistics snapshot returned by
//! [`VectorIndex::stats`](crate::vector::VectorIndex::stats).

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Number of bytes per stored vector component (`f32`).
pub const BYTES_PER_F32: usize = 4;

/// Type-safe wrapper for vector dimensions.
///
/// A dimension is never zero: the first vector added to an index fixes it,
/// and zero-length vectors are rejected before that can happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Size in bytes of one vector of this dimension.
    #[must_use]
    pub const fn vector_bytes(&self) -> usize {
        self.0 * BYTES_PER_F32
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational snapshot of a vector index.
///
/// `approximate_memory_bytes` is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub size: usize,
    pub dimension: Option<usize>,
    pub approximate_memory_bytes: usize,
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all vectors use the same embedding model"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error(
        "Vector store not found at '{}': missing {missing}\nSuggestion: Re-run the indexing step to create the store",
        path.display()
    )]
    StoreFilesNotFound { path: PathBuf, missing: String },

    #[error(
        "Vector store at '{}' is corrupted: {reason}\nSuggestion: Re-run the indexing step to rebuild the store",
        path.display()
    )]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Storage error: {0}\nSuggestion: Check disk space and file permissions")]
    Io(#[from] std::io::Error),

    #[error(
        "Serialization error: {0}\nSuggestion: Check that vector data is valid and not corrupted"
    )]
    Serialization(String),
}

/// Result type alias for vector operations
pub type VectorResult<T> = Result<T, VectorError>;
