//! Options and result types for duplicate grouping and similarity queries.

use serde::{Deserialize, Serialize};

use crate::duplicates::scoring::{DuplicateScore, duplicate_score};
use crate::duplicates::thresholds;
use crate::metadata::{ChunkKind, ChunkMetadata};

/// Configuration for [`find_duplicate_groups`](crate::duplicates::DuplicateGroupFinder::find_duplicate_groups).
///
/// Partial config tables fill missing fields from the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingOptions {
    /// Minimum cosine similarity to the anchor (default 0.85)
    #[serde(default = "default_group_threshold")]
    pub threshold: f32,

    /// Minimum members per group, anchor included (default 2)
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    /// Neighbors fetched per anchor before filtering (default 50)
    #[serde(default = "default_max_neighbors")]
    pub max_neighbors: usize,

    /// Only group chunks of this kind; disables kind preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChunkKind>,

    /// Chunks whose file path contains any of these substrings are ignored
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

/// Configuration for the location and query similarity searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum results returned (default 10)
    #[serde(default = "default_top")]
    pub top: usize,

    /// Minimum cosine similarity (default 0.5)
    #[serde(default = "default_search_threshold")]
    pub threshold: f32,
}

fn default_group_threshold() -> f32 {
    thresholds::DUPLICATE
}
fn default_min_group_size() -> usize {
    2
}
fn default_max_neighbors() -> usize {
    50
}
fn default_top() -> usize {
    10
}
fn default_search_threshold() -> f32 {
    thresholds::SEARCH
}

impl Default for GroupingOptions {
    fn default() -> Self {
        Self {
            threshold: default_group_threshold(),
            min_group_size: default_min_group_size(),
            max_neighbors: default_max_neighbors(),
            kind: None,
            exclude_paths: Vec::new(),
        }
    }
}

impl GroupingOptions {
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_min_group_size(mut self, min_group_size: usize) -> Self {
        self.min_group_size = min_group_size;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ChunkKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn exclude_path(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_paths.push(pattern.into());
        self
    }

    /// Returns whether a chunk passes the kind and path filters.
    #[must_use]
    pub fn accepts(&self, metadata: &ChunkMetadata) -> bool {
        self.kind.is_none_or(|kind| metadata.kind == kind)
            && !metadata.path_matches_any(&self.exclude_paths)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top: default_top(),
            threshold: default_search_threshold(),
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn new(top: usize, threshold: f32) -> Self {
        Self { top, threshold }
    }
}

/// One chunk inside a duplicate group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMember {
    pub id: String,
    pub metadata: ChunkMetadata,
    /// Cosine similarity to the anchor; 1.0 for the anchor itself
    pub score: f32,
}

/// Chunks judged to duplicate a common anchor.
///
/// `members[0]` is the anchor. Computed fresh on every grouping run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub members: Vec<GroupMember>,
    /// Mean similarity of the non-anchor members to the anchor
    pub avg_similarity: f32,
    /// Kind of the anchor
    pub kind: ChunkKind,
}

impl DuplicateGroup {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn anchor(&self) -> Option<&GroupMember> {
        self.members.first()
    }

    /// Size-weighted scores between the anchor and each other member.
    #[must_use]
    pub fn pair_scores(&self) -> Vec<(&str, DuplicateScore)> {
        let Some((anchor, others)) = self.members.split_first() else {
            return Vec::new();
        };
        others
            .iter()
            .map(|member| {
                (
                    member.id.as_str(),
                    duplicate_score(member.score, &anchor.metadata, &member.metadata),
                )
            })
            .collect()
    }

    /// Ids of every member, anchor first.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|member| member.id.as_str())
    }
}
