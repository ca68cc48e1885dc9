//! Greedy, anchor-centered duplicate grouping.
//!
//! # Algorithm
//! 1. Candidates are the metadata entries passing the kind and path filters,
//!    in metadata insertion order
//! 2. Each candidate not yet grouped and having a vector becomes an anchor
//!    and fetches its nearest neighbors above the threshold
//! 3. Neighbors are filtered (self, already grouped, no metadata, excluded
//!    path, wrong kind). Without an explicit kind filter, same-kind
//!    neighbors win over cross-kind ones whenever any exist
//! 4. Enough survivors form a group and every member is marked as grouped;
//!    otherwise the anchor stays available to later anchors
//!
//! This is not transitive clustering: two chunks both similar to a third can
//! land in different groups if the third was claimed first. The cost is
//! O(anchors × n × d) with no similarity graph built.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::duplicates::scoring::{group_average_similarity, sort_groups};
use crate::duplicates::{DuplicateGroup, GroupMember, GroupingOptions, SearchOptions};
use crate::metadata::{ChunkMetadata, MetadataIndex};
use crate::vector::{VectorIndex, VectorResult};

/// Runs duplicate grouping and similarity queries over a pair of indexes.
///
/// Holds only shared borrows; the indexes must not change while a finder
/// is alive.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGroupFinder<'a> {
    vectors: &'a VectorIndex,
    metadata: &'a MetadataIndex,
}

struct Neighbor<'m> {
    id: String,
    metadata: &'m ChunkMetadata,
    score: f32,
}

impl<'a> DuplicateGroupFinder<'a> {
    pub fn new(vectors: &'a VectorIndex, metadata: &'a MetadataIndex) -> Self {
        Self { vectors, metadata }
    }

    /// Groups chunks whose vectors are near a common anchor.
    ///
    /// Returned groups are ranked by member count then average similarity.
    /// Every group has at least `min_group_size` members and no id appears
    /// in more than one group.
    pub fn find_duplicate_groups(
        &self,
        options: &GroupingOptions,
    ) -> VectorResult<Vec<DuplicateGroup>> {
        let required_neighbors = options.min_group_size.saturating_sub(1);
        let mut processed: HashSet<String> = HashSet::new();
        let mut groups = Vec::new();
        let mut candidate_count = 0usize;
        let mut missing_vectors = 0usize;

        let candidates = self
            .metadata
            .entries()
            .filter(|(_, metadata)| options.accepts(metadata));

        for (anchor_id, anchor) in candidates {
            candidate_count += 1;
            if processed.contains(anchor_id) {
                continue;
            }
            let Some(anchor_vector) = self.vectors.get(anchor_id) else {
                missing_vectors += 1;
                continue;
            };

            let mut neighbors: Vec<Neighbor<'a>> = self
                .vectors
                .find_similar(anchor_vector, options.max_neighbors, options.threshold)?
                .into_iter()
                .filter(|(id, _)| id != anchor_id && !processed.contains(id))
                .filter_map(|(id, score)| {
                    let metadata = self.metadata.get(&id)?;
                    options.accepts(metadata).then_some(Neighbor {
                        id,
                        metadata,
                        score,
                    })
                })
                .collect();

            if options.kind.is_none()
                && neighbors
                    .iter()
                    .any(|neighbor| neighbor.metadata.kind == anchor.kind)
            {
                neighbors.retain(|neighbor| neighbor.metadata.kind == anchor.kind);
            }

            if neighbors.len() < required_neighbors {
                debug!(
                    anchor = anchor_id,
                    neighbors = neighbors.len(),
                    required = required_neighbors,
                    "Anchor left ungrouped"
                );
                continue;
            }

            let scores: Vec<f32> = neighbors.iter().map(|neighbor| neighbor.score).collect();
            let avg_similarity = group_average_similarity(&scores);

            let mut members = Vec::with_capacity(neighbors.len() + 1);
            members.push(GroupMember {
                id: anchor_id.to_string(),
                metadata: anchor.clone(),
                score: 1.0,
            });
            processed.insert(anchor_id.to_string());
            for neighbor in neighbors {
                processed.insert(neighbor.id.clone());
                members.push(GroupMember {
                    id: neighbor.id,
                    metadata: neighbor.metadata.clone(),
                    score: neighbor.score,
                });
            }

            debug!(
                anchor = anchor_id,
                members = members.len(),
                avg_similarity,
                "Formed duplicate group"
            );
            groups.push(DuplicateGroup {
                members,
                avg_similarity,
                kind: anchor.kind,
            });
        }

        if missing_vectors > 0 {
            warn!(
                missing_vectors,
                "Skipped candidate chunks that have metadata but no vector"
            );
        }

        sort_groups(&mut groups);

        info!(
            candidates = candidate_count,
            groups = groups.len(),
            grouped_chunks = processed.len(),
            threshold = options.threshold,
            "Duplicate grouping finished"
        );
        Ok(groups)
    }

    /// Finds chunks similar to the one enclosing `file_path:line`.
    ///
    /// Returns an empty list when no chunk covers the location or the chunk
    /// has no vector. The chunk itself is never part of the result.
    pub fn find_similar_to_location(
        &self,
        file_path: &str,
        line: u32,
        options: &SearchOptions,
    ) -> VectorResult<Vec<(String, f32)>> {
        let Some((id, _)) = self.metadata.get_at_location(file_path, line) else {
            debug!(file_path, line, "No chunk at location");
            return Ok(Vec::new());
        };
        let Some(vector) = self.vectors.get(id) else {
            debug!(id, "Chunk at location has no vector");
            return Ok(Vec::new());
        };

        let mut results =
            self.vectors
                .find_similar(vector, options.top.saturating_add(1), options.threshold)?;
        results.retain(|(other, _)| other != id);
        results.truncate(options.top);
        Ok(results)
    }

    /// Finds chunks similar to an already-embedded query vector.
    pub fn find_similar_to_query(
        &self,
        query: &[f32],
        options: &SearchOptions,
    ) -> VectorResult<Vec<(String, f32)>> {
        self.vectors
            .find_similar(query, options.top, options.threshold)
    }
}
