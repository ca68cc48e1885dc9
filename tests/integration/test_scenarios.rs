//! End-to-end scenarios over the public API.

use crate::common::{assert_group_invariants, index_from};
use codedup::vector::storage::{EMBEDDINGS_FILE, HEADER_SIZE};
use codedup::{ChunkKind, GroupingOptions, VectorError, VectorIndex};
use tempfile::TempDir;

#[test]
fn test_threshold_excludes_orthogonal_vector() {
    let mut vectors = VectorIndex::new();
    vectors.add("A", vec![1.0, 0.0]).unwrap();
    vectors.add("B", vec![0.99, 0.1411]).unwrap();
    vectors.add("C", vec![0.0, 1.0]).unwrap();

    let results = vectors.find_similar(&[1.0, 0.0], 10, 0.9).unwrap();
    let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
    // A matches itself; C is below threshold
    assert_eq!(ids, vec!["A", "B"]);
    assert!((results[1].1 - 0.99).abs() < 1e-3);

    let index = index_from(&[
        ("A", ChunkKind::Function, vec![1.0, 0.0]),
        ("B", ChunkKind::Function, vec![0.99, 0.1411]),
        ("C", ChunkKind::Function, vec![0.0, 1.0]),
    ]);
    let options = GroupingOptions::default()
        .with_threshold(0.9)
        .with_min_group_size(2);
    let groups = index.find_duplicate_groups(&options).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].ids().collect::<Vec<_>>(), vec!["A", "B"]);
    assert!(groups.iter().all(|group| group.ids().all(|id| id != "C")));
    assert_group_invariants(&groups, 2);
}

#[test]
fn test_dimension_mismatch_leaves_store_unchanged() {
    let mut vectors = VectorIndex::new();
    vectors.add("a", vec![1.0, 0.0, 0.0]).unwrap();
    vectors.add("b", vec![0.0, 1.0, 0.0]).unwrap();

    let err = vectors.add("c", vec![1.0, 0.0, 0.0, 0.0]).unwrap_err();
    assert!(matches!(
        err,
        VectorError::DimensionMismatch {
            expected: 3,
            actual: 4
        }
    ));
    assert_eq!(vectors.len(), 2);
    assert!(!vectors.contains("c"));
}

#[test]
fn test_same_kind_neighbor_preferred() {
    let index = index_from(&[
        ("Button", ChunkKind::Component, vec![1.0, 0.0, 0.0]),
        ("IconButton", ChunkKind::Component, vec![0.97, 0.1, 0.0]),
        ("useButton", ChunkKind::Hook, vec![0.98, 0.0, 0.1]),
    ]);

    let groups = index
        .find_duplicate_groups(&GroupingOptions::default())
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].ids().collect::<Vec<_>>(),
        vec!["Button", "IconButton"]
    );
    assert_eq!(groups[0].kind, ChunkKind::Component);
}

#[test]
fn test_truncated_embeddings_fail_without_clobbering() {
    let temp_dir = TempDir::new().unwrap();

    let mut saved = VectorIndex::new();
    saved.add("x", vec![1.0, 2.0, 3.0]).unwrap();
    saved.add("y", vec![4.0, 5.0, 6.0]).unwrap();
    saved.save(temp_dir.path()).unwrap();

    // Drop the last vector's final component
    let path = temp_dir.path().join(EMBEDDINGS_FILE);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 2 * 3 * 4);
    std::fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();

    let mut target = VectorIndex::new();
    target.add("keep", vec![0.5, 0.5]).unwrap();
    let before = target.clone();

    let err = target.load(temp_dir.path()).unwrap_err();
    assert!(matches!(err, VectorError::CorruptStore { .. }));
    assert_eq!(target, before);
    assert_eq!(target.get("keep"), Some([0.5, 0.5].as_slice()));
}
