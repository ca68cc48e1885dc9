//! Pure scoring and ranking functions for duplicate groups.

use serde::Serialize;

use crate::duplicates::DuplicateGroup;
use crate::metadata::ChunkMetadata;

/// Weight of embedding similarity in the combined score.
pub const SIMILARITY_WEIGHT: f32 = 0.85;

/// Weight of the line-count ratio in the combined score.
pub const SIZE_WEIGHT: f32 = 0.15;

/// Breakdown of a pairwise duplicate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuplicateScore {
    pub similarity: f32,
    pub size_ratio: f32,
    pub combined: f32,
}

/// Ratio of the shorter chunk's line count to the longer one's, in (0, 1].
///
/// Identical line counts give exactly 1.0.
#[must_use]
pub fn size_ratio(a: &ChunkMetadata, b: &ChunkMetadata) -> f32 {
    let (lines_a, lines_b) = (a.line_count(), b.line_count());
    let longest = lines_a.max(lines_b);
    if longest == 0 {
        return 1.0;
    }
    lines_a.min(lines_b) as f32 / longest as f32
}

/// Combines similarity with size ratio using fixed weights.
#[must_use]
pub fn duplicate_score(similarity: f32, a: &ChunkMetadata, b: &ChunkMetadata) -> DuplicateScore {
    let size_ratio = size_ratio(a, b);
    DuplicateScore {
        similarity,
        size_ratio,
        combined: similarity * SIMILARITY_WEIGHT + size_ratio * SIZE_WEIGHT,
    }
}

/// Arithmetic mean of `scores`; 0.0 when empty.
#[must_use]
pub fn group_average_similarity(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(|&score| f64::from(score)).sum();
    (total / scores.len() as f64) as f32
}

/// Orders groups by member count, then average similarity, both descending.
///
/// Stable: groups tied on both keys keep their input order.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.members
            .len()
            .cmp(&a.members.len())
            .then_with(|| b.avg_similarity.total_cmp(&a.avg_similarity))
    });
}
