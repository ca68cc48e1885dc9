//! Directory-based persistence for the vector index.
//!
//! # Storage Format
//!
//! A store is a directory holding two files:
//! - `ids.json`: JSON array of ids; entry `i` names the `i`-th vector
//! - `embeddings.bin`: little-endian binary
//!   - Header (8 bytes): `u32` dimension, `u32` vector count
//!   - Vectors: `count * dimension` contiguous `f32` values, in `ids.json` order
//!
//! An empty store writes a zero dimension and a zero count, so its binary
//! file is exactly the 8-byte header. The format carries no version tag;
//! a format change must add one to the header rather than rely on file
//! length to tell versions apart.
//!
//! Reading validates everything (both files present, byte length matches the
//! header, id count matches vector count) before handing back any data, so a
//! failed load never leaves a caller with partial state.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::MmapOptions;

use crate::vector::types::{BYTES_PER_F32, VectorDimension, VectorError, VectorResult};

/// File holding the ordered id list.
pub const IDS_FILE: &str = "ids.json";

/// File holding the binary vector payload.
pub const EMBEDDINGS_FILE: &str = "embeddings.bin";

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Fully validated contents of a store directory.
#[derive(Debug)]
pub(crate) struct StoreContents {
    pub dimension: Option<VectorDimension>,
    pub ids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

/// Writes `entries` into `dir`, creating the directory if needed.
///
/// `entries` must be in insertion order and every vector must have
/// `dimension` components.
pub(crate) fn write_store(
    dir: &Path,
    dimension: Option<VectorDimension>,
    entries: &[(&str, &[f32])],
) -> VectorResult<()> {
    std::fs::create_dir_all(dir)?;

    let count = u32::try_from(entries.len()).map_err(|_| {
        VectorError::Serialization(format!(
            "{} vectors exceed the u32 count field of the store header",
            entries.len()
        ))
    })?;
    let dim = match dimension {
        Some(dim) if count > 0 => u32::try_from(dim.get()).map_err(|_| {
            VectorError::Serialization(format!(
                "Dimension {dim} exceeds the u32 dimension field of the store header"
            ))
        })?,
        _ => 0,
    };

    let ids: Vec<&str> = entries.iter().map(|(id, _)| *id).collect();
    let ids_path = dir.join(IDS_FILE);
    let bin_path = dir.join(EMBEDDINGS_FILE);
    let staged_ids = staged_path(&ids_path);
    let staged_bin = staged_path(&bin_path);

    // Both files are fully written beside the live ones before either is replaced
    let mut ids_writer = BufWriter::new(File::create(&staged_ids)?);
    serde_json::to_writer(&mut ids_writer, &ids)
        .map_err(|e| VectorError::Serialization(format!("Failed to write {IDS_FILE}: {e}")))?;
    ids_writer.flush()?;
    drop(ids_writer);

    let mut writer = BufWriter::new(File::create(&staged_bin)?);
    writer.write_all(&dim.to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;
    for (_, vector) in entries {
        for &value in *vector {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    writer.flush()?;
    drop(writer);

    std::fs::rename(&staged_bin, &bin_path)?;
    std::fs::rename(&staged_ids, &ids_path)?;

    Ok(())
}

/// Sibling path a file is written to before being renamed over `path`.
pub(crate) fn staged_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads and validates the store in `dir`.
pub(crate) fn read_store(dir: &Path) -> VectorResult<StoreContents> {
    let ids_path = dir.join(IDS_FILE);
    let bin_path = dir.join(EMBEDDINGS_FILE);

    let missing: Vec<&str> = [(IDS_FILE, &ids_path), (EMBEDDINGS_FILE, &bin_path)]
        .into_iter()
        .filter(|(_, path)| !path.is_file())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        return Err(VectorError::StoreFilesNotFound {
            path: dir.to_path_buf(),
            missing: missing.join(" and "),
        });
    }

    let ids = read_ids(&ids_path)?;

    let file = File::open(&bin_path)?;
    let file_len = file.metadata()?.len();
    if file_len < HEADER_SIZE as u64 {
        return Err(corrupt(
            &bin_path,
            format!("file is {file_len} bytes, smaller than the {HEADER_SIZE}-byte header"),
        ));
    }

    // The store file is only read while mapped.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    let (dim, count) = read_header(&mmap);

    let expected_len = (count as u64)
        .checked_mul(dim as u64)
        .and_then(|n| n.checked_mul(BYTES_PER_F32 as u64))
        .and_then(|n| n.checked_add(HEADER_SIZE as u64))
        .ok_or_else(|| {
            corrupt(
                &bin_path,
                format!("header declares an impossible size ({count} x {dim})"),
            )
        })?;
    if expected_len != mmap.len() as u64 {
        return Err(corrupt(
            &bin_path,
            format!(
                "header declares {count} vectors of dimension {dim} ({expected_len} bytes) but the file is {} bytes",
                mmap.len()
            ),
        ));
    }

    if count as usize != ids.len() {
        return Err(corrupt(
            &bin_path,
            format!(
                "{IDS_FILE} lists {} ids but the header declares {count} vectors",
                ids.len()
            ),
        ));
    }

    if count > 0 && dim == 0 {
        return Err(corrupt(
            &bin_path,
            format!("header declares {count} vectors of dimension 0"),
        ));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(corrupt(
            &ids_path,
            format!("id '{duplicate}' appears more than once"),
        ));
    }

    let dimension = if dim == 0 {
        None
    } else {
        Some(VectorDimension::new(dim as usize)?)
    };

    let vectors = match dimension {
        Some(dimension) => mmap[HEADER_SIZE..]
            .chunks_exact(dimension.vector_bytes())
            .map(decode_vector)
            .collect(),
        None => Vec::new(),
    };

    Ok(StoreContents {
        dimension,
        ids,
        vectors,
    })
}

/// Returns whether both store files exist in `dir`.
pub fn store_exists(dir: &Path) -> bool {
    dir.join(IDS_FILE).is_file() && dir.join(EMBEDDINGS_FILE).is_file()
}

fn read_ids(path: &Path) -> VectorResult<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| corrupt(path, format!("not a JSON array of string ids: {e}")))
}

fn read_header(bytes: &[u8]) -> (u32, u32) {
    let dim = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    (dim, count)
}

fn decode_vector(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(BYTES_PER_F32)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn corrupt(path: &Path, reason: String) -> VectorError {
    VectorError::CorruptStore {
        path: PathBuf::from(path),
        reason,
    }
}
