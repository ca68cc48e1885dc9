//! Persistence through the facade and the shared index wrapper.

use crate::common::{chunk, index_from};
use codedup::metadata::CHUNKS_FILE;
use codedup::vector::storage::{EMBEDDINGS_FILE, IDS_FILE};
use codedup::{ChunkKind, DuplicateIndex, Error, SharedVectorIndex, VectorIndex};
use tempfile::TempDir;

#[test]
fn test_facade_round_trip_keeps_groups() {
    let temp_dir = TempDir::new().unwrap();
    let index = index_from(&[
        ("Modal", ChunkKind::Component, vec![0.2, 0.9, 0.1, 0.0]),
        ("Dialog", ChunkKind::Component, vec![0.21, 0.88, 0.12, 0.01]),
        ("useFetch", ChunkKind::Hook, vec![0.9, 0.0, 0.0, 0.4]),
        ("useRequest", ChunkKind::Hook, vec![0.88, 0.02, 0.0, 0.42]),
        ("formatDate", ChunkKind::Function, vec![0.0, 0.0, 1.0, 0.0]),
    ]);
    let groups = index.find_duplicates().unwrap();
    assert_eq!(groups.len(), 2);

    index.save(temp_dir.path()).unwrap();
    for file in [IDS_FILE, EMBEDDINGS_FILE, CHUNKS_FILE] {
        assert!(temp_dir.path().join(file).is_file(), "{file} not written");
    }

    let reopened = DuplicateIndex::open(temp_dir.path()).unwrap();
    assert_eq!(reopened.find_duplicates().unwrap(), groups);
    assert_eq!(
        reopened
            .find_similar_to_location("src/Modal.tsx", 3, None)
            .unwrap()
            .first()
            .map(|(id, _)| id.as_str()),
        Some("Dialog")
    );
}

#[test]
fn test_open_missing_metadata_reports_reindex() {
    let temp_dir = TempDir::new().unwrap();
    let mut vectors = VectorIndex::new();
    vectors.add("a", vec![1.0]).unwrap();
    vectors.save(temp_dir.path()).unwrap();

    let err = DuplicateIndex::open(temp_dir.path()).unwrap_err();
    assert!(matches!(err, Error::Metadata(_)));
    assert_eq!(err.status_code(), "METADATA_NOT_FOUND");
    assert!(!err.recovery_suggestions().is_empty());
}

#[test]
fn test_overwrite_chunk_keeps_position_after_reload() {
    let temp_dir = TempDir::new().unwrap();
    let mut index = index_from(&[
        ("first", ChunkKind::Function, vec![1.0, 0.0]),
        ("second", ChunkKind::Function, vec![0.0, 1.0]),
    ]);
    index
        .insert_chunk("first", chunk("src/moved.ts", 40, ChunkKind::Function), vec![0.5, 0.5])
        .unwrap();
    index.save(temp_dir.path()).unwrap();

    let reopened = DuplicateIndex::open(temp_dir.path()).unwrap();
    assert_eq!(reopened.vectors().ids(), vec!["first", "second"]);
    assert_eq!(reopened.metadata().get("first").unwrap().file_path, "src/moved.ts");
    assert_eq!(reopened.vectors().get("first"), Some([0.5, 0.5].as_slice()));
}

#[test]
fn test_shared_index_readers_after_single_writer() {
    let temp_dir = TempDir::new().unwrap();
    let shared = SharedVectorIndex::default();
    for i in 0..50 {
        let angle = i as f32 / 50.0;
        shared.add(format!("v{i}"), vec![angle.cos(), angle.sin()]).unwrap();
    }

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let reader = shared.clone();
            scope.spawn(move || {
                let results = reader.find_similar(&[1.0, 0.0], 3, 0.0).unwrap();
                assert_eq!(results[0].0, "v0");
                assert_eq!(results.len(), 3);
            });
        }
    });

    shared.save(temp_dir.path()).unwrap();
    assert_eq!(VectorIndex::from_dir(temp_dir.path()).unwrap().len(), 50);
}
