//! Invariants that must hold for arbitrary inputs.

use crate::common::{assert_group_invariants, perturb, random_vector, seeded_rng};
use codedup::duplicates::size_ratio;
use codedup::{
    ChunkKind, ChunkMetadata, DuplicateIndex, GroupingOptions, VectorIndex, cosine_similarity,
};
use tempfile::TempDir;

fn random_index(seed: u64, count: usize, dimension: usize) -> VectorIndex {
    let mut rng = seeded_rng(seed);
    let mut index = VectorIndex::new();
    for i in 0..count {
        index
            .add(format!("chunk-{i}"), random_vector(&mut rng, dimension))
            .unwrap();
    }
    index
}

#[test]
fn test_save_load_preserves_order_and_bits() {
    let temp_dir = TempDir::new().unwrap();
    let original = random_index(7, 200, 48);
    original.save(temp_dir.path()).unwrap();

    let loaded = VectorIndex::from_dir(temp_dir.path()).unwrap();
    assert_eq!(loaded.ids(), original.ids());
    for id in original.ids() {
        let expected: Vec<u32> = original.get(&id).unwrap().iter().map(|v| v.to_bits()).collect();
        let actual: Vec<u32> = loaded.get(&id).unwrap().iter().map(|v| v.to_bits()).collect();
        assert_eq!(actual, expected, "vector {id} changed across save/load");
    }
    assert_eq!(loaded.dimension(), original.dimension());
}

#[test]
fn test_empty_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    VectorIndex::new().save(temp_dir.path()).unwrap();

    let loaded = VectorIndex::from_dir(temp_dir.path()).unwrap();
    assert_eq!(loaded.len(), 0);
    assert!(loaded.dimension().is_none());
}

#[test]
fn test_cosine_symmetry_self_similarity_and_zero_safety() {
    let mut rng = seeded_rng(11);
    let zero = vec![0.0f32; 16];
    for _ in 0..200 {
        let a = random_vector(&mut rng, 16);
        let b = random_vector(&mut rng, 16);

        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);

        let with_zero = cosine_similarity(&zero, &a);
        assert_eq!(with_zero, 0.0);
        assert!(!with_zero.is_nan());
    }
    assert_eq!(cosine_similarity(&zero, &zero), 0.0);
}

#[test]
fn test_find_similar_contract() {
    let index = random_index(3, 300, 8);
    let mut rng = seeded_rng(99);

    for (k, threshold) in [(1, -1.0), (5, 0.0), (20, 0.3), (500, 0.5), (10, 0.99)] {
        let query = random_vector(&mut rng, 8);
        let results = index.find_similar(&query, k, threshold).unwrap();

        assert!(results.len() <= k);
        assert!(results.iter().all(|(_, score)| *score >= threshold));
        assert!(results.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    }
}

#[test]
fn test_grouping_invariants_across_options() {
    let mut rng = seeded_rng(21);
    let mut index = DuplicateIndex::new();
    let kinds = ChunkKind::ALL;

    // Clusters of near-identical vectors plus background noise
    for cluster in 0..12 {
        let base = random_vector(&mut rng, 24);
        for member in 0..(cluster % 5 + 1) {
            let id = format!("c{cluster}-m{member}");
            let kind = kinds[(cluster + member) % kinds.len()];
            let metadata = ChunkMetadata::new(format!("src/{id}.ts"), 1, 5 + member as u32, kind);
            index
                .insert_chunk(id, metadata, perturb(&mut rng, &base, 0.05))
                .unwrap();
        }
    }
    for i in 0..40 {
        let metadata = ChunkMetadata::new(format!("src/noise{i}.ts"), 1, 9, ChunkKind::Function);
        index
            .insert_chunk(format!("noise-{i}"), metadata, random_vector(&mut rng, 24))
            .unwrap();
    }

    for min_group_size in [1, 2, 3, 4] {
        for threshold in [0.5, 0.85, 0.95] {
            let options = GroupingOptions::default()
                .with_threshold(threshold)
                .with_min_group_size(min_group_size);
            let groups = index.find_duplicate_groups(&options).unwrap();
            assert_group_invariants(&groups, min_group_size);
            for group in &groups {
                assert_eq!(group.members[0].score, 1.0);
                assert!(group.members[1..].iter().all(|m| m.score >= threshold));
            }
        }
    }

    let hooks_only = GroupingOptions::default().with_kind(ChunkKind::Hook);
    let groups = index.find_duplicate_groups(&hooks_only).unwrap();
    assert!(
        groups
            .iter()
            .flat_map(|group| &group.members)
            .all(|member| member.metadata.kind == ChunkKind::Hook)
    );
}

#[test]
fn test_size_ratio_bounds() {
    for (a, b) in [(1, 1), (1, 500), (40, 3), (7, 7), (100, 99)] {
        let left = ChunkMetadata::new("a.ts", 10, 10 + a - 1, ChunkKind::Function);
        let right = ChunkMetadata::new("b.ts", 1, b, ChunkKind::Function);
        let ratio = size_ratio(&left, &right);
        assert!(ratio > 0.0 && ratio <= 1.0);
        if a == b {
            assert_eq!(ratio, 1.0);
        }
    }
}
