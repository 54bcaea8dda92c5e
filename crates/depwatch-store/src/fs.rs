use std::path::Path;

use serde::{Deserialize, Serialize};

use depwatch_core::Snapshot;

use crate::traits::{SnapshotStore, StoreError};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// On-disk form: a versioned JSON document wrapping the dependency mapping.
/// The version tag lets a later format evolve without silently
/// misinterpreting old files.
#[derive(Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    #[serde(flatten)]
    snapshot: Snapshot,
}

/// Stores one snapshot per file as versioned JSON.
///
/// Saves go through a sibling temp file followed by a rename, so a crash
/// mid-write cannot leave a truncated document behind.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSnapshotStore;

impl FsSnapshotStore {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn save(&self, snapshot: &Snapshot, destination: &Path) -> Result<(), StoreError> {
        let doc = SnapshotDocument {
            version: SNAPSHOT_FORMAT_VERSION,
            snapshot: snapshot.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = destination.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, destination)?;
        Ok(())
    }

    fn load(&self, source: &Path) -> Result<Snapshot, StoreError> {
        let bytes = std::fs::read(source)?;
        let doc: SnapshotDocument = serde_json::from_slice(&bytes)?;
        if doc.version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(doc.version));
        }
        Ok(doc.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depwatch_core::{ArtifactRecord, DependencyRecord, ModuleId};
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            ModuleId::new("org#lib", "1.0"),
            DependencyRecord::new("1.0", vec![ArtifactRecord::new("lib-1.0.jar", Some(100))]),
        );
        snapshot.insert(
            ModuleId::new("org#other", "2.3"),
            DependencyRecord::new("2.3", vec![ArtifactRecord::new("other-2.3.jar", None)]),
        );
        snapshot
    }

    #[test]
    fn round_trips_a_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.snapshot");
        let store = FsSnapshotStore::new();

        let snapshot = sample_snapshot();
        store.save(&snapshot, &path).unwrap();
        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn save_creates_missing_parent_dirs_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("context.snapshot");
        let store = FsSnapshotStore::new();

        store.save(&sample_snapshot(), &path).unwrap();
        store.save(&Snapshot::new(), &path).unwrap();
        assert!(store.load(&path).unwrap().is_empty());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = FsSnapshotStore::new().load(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.snapshot");
        std::fs::write(&path, b"not json").unwrap();
        let err = FsSnapshotStore::new().load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.snapshot");
        std::fs::write(&path, br#"{"version": 99, "dependencies": {}}"#).unwrap();
        let err = FsSnapshotStore::new().load(&path).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion(99)));
    }

    #[test]
    fn no_temp_file_remains_after_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.snapshot");
        FsSnapshotStore::new().save(&sample_snapshot(), &path).unwrap();
        assert!(!path.with_extension("tmp").exists());
    }
}
