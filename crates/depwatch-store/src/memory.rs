use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use depwatch_core::Snapshot;

use crate::traits::{SnapshotStore, StoreError};

/// In-memory store for tests and non-durable runs. Not durable, but keeps
/// the same path-keyed contract as the filesystem store.
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<HashMap<PathBuf, Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, snapshot: &Snapshot, destination: &Path) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(destination.to_path_buf(), snapshot.clone());
        Ok(())
    }

    fn load(&self, source: &Path) -> Result<Snapshot, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.get(source).cloned().ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no snapshot stored at {}", source.display()),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depwatch_core::{DependencyRecord, ModuleId};

    #[test]
    fn save_then_load_round_trips() {
        let store = MemorySnapshotStore::new();
        let mut snapshot = Snapshot::new();
        snapshot.insert(ModuleId::new("lib", "1.0"), DependencyRecord::new("1.0", vec![]));

        let path = Path::new("/entity/context.snapshot");
        store.save(&snapshot, path).unwrap();
        assert_eq!(store.load(path).unwrap(), snapshot);
    }

    #[test]
    fn load_unknown_path_is_not_found() {
        let store = MemorySnapshotStore::new();
        let err = store.load(Path::new("/missing")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn save_replaces_previous_contents() {
        let store = MemorySnapshotStore::new();
        let path = Path::new("/entity/context.snapshot");

        let mut first = Snapshot::new();
        first.insert(ModuleId::new("lib", "1.0"), DependencyRecord::new("1.0", vec![]));
        store.save(&first, path).unwrap();
        store.save(&Snapshot::new(), path).unwrap();
        assert!(store.load(path).unwrap().is_empty());
    }
}
