//! Grouping over a few thousand chunks finishes and stays consistent.

use crate::common::{assert_group_invariants, perturb, random_vector, seeded_rng};
use codedup::{ChunkKind, ChunkMetadata, DuplicateIndex, GroupingOptions};

const CHUNKS: usize = 2_000;
const DIMENSION: usize = 64;
const PLANTED_GROUPS: usize = 25;

#[test]
fn test_grouping_thousands_of_chunks() {
    let mut rng = seeded_rng(2024);
    let mut index = DuplicateIndex::new();

    // Plant groups of three near-duplicates, fill the rest with random vectors
    let mut planted = Vec::with_capacity(PLANTED_GROUPS);
    for group in 0..PLANTED_GROUPS {
        let base = random_vector(&mut rng, DIMENSION);
        let ids: Vec<String> = (0..3).map(|m| format!("dup-{group}-{m}")).collect();
        for id in &ids {
            let metadata =
                ChunkMetadata::new(format!("src/{id}.tsx"), 1, 30, ChunkKind::Component);
            index
                .insert_chunk(id.clone(), metadata, perturb(&mut rng, &base, 0.01))
                .unwrap();
        }
        planted.push(ids);
    }
    for i in index.len()..CHUNKS {
        let metadata = ChunkMetadata::new(format!("src/f{i}.ts"), 1, 12, ChunkKind::Function);
        index
            .insert_chunk(format!("rand-{i}"), metadata, random_vector(&mut rng, DIMENSION))
            .unwrap();
    }
    assert_eq!(index.len(), CHUNKS);

    let options = GroupingOptions::default();
    let groups = index.find_duplicate_groups(&options).unwrap();
    assert_group_invariants(&groups, options.min_group_size);

    // Random 64-d vectors sit far below 0.85, so only the planted triples group
    assert_eq!(groups.len(), PLANTED_GROUPS);
    for group in &groups {
        assert_eq!(group.len(), 3);
        let mut ids: Vec<String> = group.ids().map(str::to_string).collect();
        ids.sort();
        assert!(planted.contains(&ids), "unexpected group {ids:?}");
    }
}
