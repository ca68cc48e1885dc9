//! Source-location metadata for code chunks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Semantic category of a chunk.
///
/// Closed per deployment: grouping prefers same-kind neighbors so a button
/// component is not grouped with an unrelated hook on embedding proximity
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Component,
    Hook,
    Function,
}

impl ChunkKind {
    /// All kinds, in declaration order.
    pub const ALL: [ChunkKind; 3] = [ChunkKind::Component, ChunkKind::Hook, ChunkKind::Function];

    /// Lowercase name used in config files and persisted metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Component => "component",
            ChunkKind::Hook => "hook",
            ChunkKind::Function => "function",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkKind {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ChunkKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| MetadataError::UnknownKind {
                value: s.to_string(),
            })
    }
}

/// Where a chunk lives and what it is.
///
/// Lines are 1-based and inclusive: `start_line <= end_line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub kind: ChunkKind,
}

impl ChunkMetadata {
    pub fn new(file_path: impl Into<String>, start_line: u32, end_line: u32, kind: ChunkKind) -> Self {
        Self {
            file_path: file_path.into(),
            start_line,
            end_line,
            kind,
        }
    }

    /// Number of lines covered, counting both ends.
    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.span().saturating_add(1)
    }

    /// `end_line - start_line`; the tie-breaker for nested chunks.
    #[must_use]
    pub fn span(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line)
    }

    /// Returns whether `line` falls inside this chunk.
    #[must_use]
    pub fn contains_line(&self, line: u32) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }

    /// Returns whether the file path contains any of `patterns`.
    #[must_use]
    pub fn path_matches_any(&self, patterns: &[String]) -> bool {
        patterns
            .iter()
            .any(|pattern| self.file_path.contains(pattern.as_str()))
    }

    /// Checks the line-range invariant.
    pub fn validate(&self, id: &str) -> Result<(), MetadataError> {
        if self.start_line == 0 || self.start_line > self.end_line {
            return Err(MetadataError::InvalidLineRange {
                id: id.to_string(),
                start_line: self.start_line,
                end_line: self.end_line,
            });
        }
        Ok(())
    }
}

/// Errors that can occur during metadata operations.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error(
        "Invalid line range {start_line}..={end_line} for chunk '{id}'\nSuggestion: Lines are 1-based and start_line must not exceed end_line"
    )]
    InvalidLineRange {
        id: String,
        start_line: u32,
        end_line: u32,
    },

    #[error("Unknown chunk kind '{value}'\nSuggestion: Use one of: component, hook, function")]
    UnknownKind { value: String },

    #[error(
        "Metadata file not found: '{}'\nSuggestion: Re-run the indexing step to create it",
        path.display()
    )]
    FileNotFound { path: PathBuf },

    #[error("Storage error: {0}\nSuggestion: Check disk space and file permissions")]
    Io(#[from] std::io::Error),

    #[error(
        "Serialization error: {0}\nSuggestion: The metadata file may be corrupted. Try rebuilding the index."
    )]
    Serialization(String),
}

/// Result type alias for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;
