#![allow(dead_code)]

use codedup::{ChunkKind, ChunkMetadata, DuplicateGroup, DuplicateIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Chunk spanning `lines` lines starting at line 1.
pub fn chunk(path: &str, lines: u32, kind: ChunkKind) -> ChunkMetadata {
    ChunkMetadata::new(path, 1, lines, kind)
}

/// Builds a facade from `(id, kind, vector)` triples, one file per chunk.
pub fn index_from(entries: &[(&str, ChunkKind, Vec<f32>)]) -> DuplicateIndex {
    let mut index = DuplicateIndex::new();
    for (id, kind, vector) in entries {
        index
            .insert_chunk(*id, chunk(&format!("src/{id}.tsx"), 10, *kind), vector.clone())
            .expect("Failed to insert chunk");
    }
    index
}

/// Deterministic pseudo-random vector with components in [-1, 1).
pub fn random_vector(rng: &mut StdRng, dimension: usize) -> Vec<f32> {
    (0..dimension)
        .map(|_| rng.random::<f32>() * 2.0 - 1.0)
        .collect()
}

/// `base` with every component nudged by at most `noise`.
pub fn perturb(rng: &mut StdRng, base: &[f32], noise: f32) -> Vec<f32> {
    base.iter()
        .map(|value| value + (rng.random::<f32>() * 2.0 - 1.0) * noise)
        .collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Asserts size, uniqueness and ranking invariants over a grouping result.
pub fn assert_group_invariants(groups: &[DuplicateGroup], min_group_size: usize) {
    let mut seen = HashSet::new();
    for group in groups {
        assert!(
            group.len() >= min_group_size,
            "group of {} below minimum {min_group_size}",
            group.len()
        );
        for id in group.ids() {
            assert!(seen.insert(id.to_string()), "{id} appears in two groups");
        }
    }

    for pair in groups.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        assert!(
            first.len() > second.len()
                || (first.len() == second.len()
                    && first.avg_similarity >= second.avg_similarity),
            "groups out of order: {} ({}) before {} ({})",
            first.len(),
            first.avg_similarity,
            second.len(),
            second.avg_similarity
        );
    }
}
