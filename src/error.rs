//! Crate-level error type.
//!
//! Component errors keep their own enums; [`Error`] wraps them for callers
//! that cross component boundaries (the [`DuplicateIndex`](crate::DuplicateIndex)
//! facade, configuration loading).

use thiserror::Error;

use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::vector::VectorError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier suitable for machine-readable reports.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Vector(e) => match e {
                VectorError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
                VectorError::InvalidDimension { .. } => "INVALID_DIMENSION",
                VectorError::StoreFilesNotFound { .. } => "STORE_NOT_FOUND",
                VectorError::CorruptStore { .. } => "STORE_CORRUPTED",
                VectorError::Io(_) => "VECTOR_IO_ERROR",
                VectorError::Serialization(_) => "VECTOR_SERIALIZATION_ERROR",
            },
            Self::Metadata(e) => match e {
                MetadataError::InvalidLineRange { .. } => "INVALID_LINE_RANGE",
                MetadataError::UnknownKind { .. } => "UNKNOWN_CHUNK_KIND",
                MetadataError::FileNotFound { .. } => "METADATA_NOT_FOUND",
                MetadataError::Io(_) => "METADATA_IO_ERROR",
                MetadataError::Serialization(_) => "METADATA_SERIALIZATION_ERROR",
            },
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Vector(VectorError::StoreFilesNotFound { .. } | VectorError::CorruptStore { .. })
            | Self::Metadata(MetadataError::FileNotFound { .. }) => vec![
                "Re-run the indexing step to rebuild the index directory",
                "Check that index_path points at the directory the index was saved to",
            ],
            Self::Metadata(MetadataError::Serialization(_)) => vec![
                "chunks.json may have been edited by hand; re-run the indexing step",
            ],
            Self::Vector(VectorError::DimensionMismatch { .. } | VectorError::InvalidDimension { .. }) => {
                vec![
                    "Validate embedding output before inserting it",
                    "Use the same embedding model for every chunk and query",
                ]
            }
            Self::Metadata(MetadataError::InvalidLineRange { .. }) => vec![
                "Line numbers are 1-based and start_line must not exceed end_line",
            ],
            Self::Config(_) => vec![
                "Check .codedup/settings.toml for typos",
                "Unset CODEDUP_* environment variables to fall back to defaults",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;
