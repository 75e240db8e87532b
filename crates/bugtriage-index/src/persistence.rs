use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use bugtriage_core::errors::{BugtriageResult, IndexError};

use crate::snapshot::Snapshot;

/// Where a `VectorIndex`'s snapshot is persisted: `<stem>.index` holds the
/// raw little-endian `f32` matrix, `<stem>.mapping` holds the length-
/// prefixed external-id list. Both are written via a temp file plus
/// `rename` so a reader never observes a partially-written file.
pub struct PersistencePaths {
    index_path: PathBuf,
    mapping_path: PathBuf,
}

impl PersistencePaths {
    pub fn new(stem: impl AsRef<Path>) -> Self {
        let stem = stem.as_ref();
        Self {
            index_path: stem.with_extension("index"),
            mapping_path: stem.with_extension("mapping"),
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> BugtriageResult<()> {
        write_atomic(&self.index_path, |f| {
            for value in &snapshot.vectors {
                f.write_all(&value.to_le_bytes())?;
            }
            Ok(())
        })
        .map_err(|reason| IndexError::SnapshotFailed {
            path: self.index_path.display().to_string(),
            reason,
        })?;

        write_atomic(&self.mapping_path, |f| {
            f.write_all(&(snapshot.dimensions as u64).to_le_bytes())?;
            f.write_all(&(snapshot.ids.len() as u64).to_le_bytes())?;
            for id in &snapshot.ids {
                f.write_all(id.as_bytes())?;
            }
            Ok(())
        })
        .map_err(|reason| IndexError::SnapshotFailed {
            path: self.mapping_path.display().to_string(),
            reason,
        })?;

        Ok(())
    }

    /// Load a previously-saved snapshot, or `None` if no files exist yet.
    pub fn load(&self) -> BugtriageResult<Option<Snapshot>> {
        if !self.mapping_path.exists() || !self.index_path.exists() {
            return Ok(None);
        }

        let mapping_bytes = fs::read(&self.mapping_path).map_err(|e| IndexError::LoadFailed {
            path: self.mapping_path.display().to_string(),
            reason: e.to_string(),
        })?;
        if mapping_bytes.len() < 16 {
            return Err(IndexError::CorruptMapping {
                details: format!("mapping file too short: {} bytes", mapping_bytes.len()),
            }
            .into());
        }
        let dimensions = u64::from_le_bytes(mapping_bytes[0..8].try_into().unwrap()) as usize;
        let count = u64::from_le_bytes(mapping_bytes[8..16].try_into().unwrap()) as usize;

        let expected_mapping_len = 16 + count * 16;
        if mapping_bytes.len() != expected_mapping_len {
            return Err(IndexError::CorruptMapping {
                details: format!(
                    "expected {expected_mapping_len} mapping bytes for {count} ids, got {}",
                    mapping_bytes.len()
                ),
            }
            .into());
        }

        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let start = 16 + i * 16;
            let bytes: [u8; 16] = mapping_bytes[start..start + 16].try_into().unwrap();
            ids.push(Uuid::from_bytes(bytes));
        }

        let index_bytes = fs::read(&self.index_path).map_err(|e| IndexError::LoadFailed {
            path: self.index_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let expected_index_len = count * dimensions * 4;
        if index_bytes.len() != expected_index_len {
            return Err(IndexError::CorruptMapping {
                details: format!(
                    "expected {expected_index_len} vector bytes for {count} rows of {dimensions}-d, got {}",
                    index_bytes.len()
                ),
            }
            .into());
        }

        let vectors: Vec<f32> = index_bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
            .collect();

        Ok(Some(Snapshot {
            dimensions,
            ids,
            vectors,
        }))
    }
}

fn write_atomic<F>(path: &Path, writer: F) -> Result<(), String>
where
    F: FnOnce(&mut fs::File) -> std::io::Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = dir.join(format!(
        ".{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("snapshot")
    ));

    let mut file = fs::File::create(&tmp_path).map_err(|e| e.to_string())?;
    writer(&mut file).map_err(|e| e.to_string())?;
    file.sync_all().map_err(|e| e.to_string())?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| e.to_string())?;
    Ok(())
}
