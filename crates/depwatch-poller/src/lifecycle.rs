use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use depwatch_core::Snapshot;
use depwatch_store::SnapshotStore;

/// Authoritative holder of the previous snapshot for one monitored entity.
///
/// Every access goes through the mutex, so overlapping polls and
/// out-of-band resets serialize on the cell. Entities are independent:
/// each owns its lifecycle, its snapshot path, and its store handle.
pub struct ContextLifecycle {
    cell: Mutex<Option<Snapshot>>,
    store: Arc<dyn SnapshotStore>,
    snapshot_path: PathBuf,
    persist: bool,
}

impl ContextLifecycle {
    pub fn new(store: Arc<dyn SnapshotStore>, snapshot_path: PathBuf, persist: bool) -> Self {
        Self {
            cell: Mutex::new(None),
            store,
            snapshot_path,
            persist,
        }
    }

    /// Sets the current snapshot. Always safe to call.
    pub fn replace(&self, snapshot: Snapshot) {
        let mut cell = self.cell.lock().unwrap();
        *cell = Some(snapshot);
    }

    /// Rolls the current snapshot back to a previously held value, so the
    /// entity does not forget its last known-good state when a comparison
    /// could not complete meaningfully.
    pub fn restore(&self, snapshot: Option<Snapshot>) {
        let mut cell = self.cell.lock().unwrap();
        *cell = snapshot;
    }

    pub fn current(&self) -> Option<Snapshot> {
        let cell = self.cell.lock().unwrap();
        cell.clone()
    }

    /// Attempts to restore the previous snapshot from the durable store.
    /// Returns whether one was loaded. Read and decode failures leave the
    /// cell unchanged; they only mean no prior context is available.
    pub fn try_load_from_store(&self) -> bool {
        if !self.persist {
            info!("persistence is disabled for this entity; not reading a snapshot from disk");
            return false;
        }
        match self.store.load(&self.snapshot_path) {
            Ok(snapshot) => {
                info!(
                    path = %self.snapshot_path.display(),
                    dependencies = snapshot.len(),
                    "restored previous snapshot from disk"
                );
                self.replace(snapshot);
                true
            }
            Err(err) => {
                warn!(
                    path = %self.snapshot_path.display(),
                    "no prior snapshot available from disk: {err}"
                );
                false
            }
        }
    }

    /// Persists the held snapshot when persistence is enabled. A failed
    /// save is logged and swallowed; it never fails the poll.
    pub fn save_current(&self) {
        if !self.persist {
            return;
        }
        let snapshot = self.current();
        if let Some(snapshot) = snapshot {
            if let Err(err) = self.store.save(&snapshot, &self.snapshot_path) {
                error!(
                    path = %self.snapshot_path.display(),
                    "failed to persist snapshot: {err}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depwatch_core::{DependencyRecord, ModuleId};
    use depwatch_store::{FsSnapshotStore, MemorySnapshotStore};
    use std::path::Path;
    use tempfile::tempdir;

    fn snapshot_with(name: &str, revision: &str) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(ModuleId::new(name, revision), DependencyRecord::new(revision, vec![]));
        snapshot
    }

    #[test]
    fn replace_and_current() {
        let lifecycle = ContextLifecycle::new(
            Arc::new(MemorySnapshotStore::new()),
            PathBuf::from("/entity/context.snapshot"),
            false,
        );
        assert!(lifecycle.current().is_none());

        let snapshot = snapshot_with("lib", "1.0");
        lifecycle.replace(snapshot.clone());
        assert_eq!(lifecycle.current(), Some(snapshot));
    }

    #[test]
    fn restore_rolls_back() {
        let lifecycle = ContextLifecycle::new(
            Arc::new(MemorySnapshotStore::new()),
            PathBuf::from("/entity/context.snapshot"),
            false,
        );
        let old = snapshot_with("lib", "1.0");
        lifecycle.replace(old.clone());
        lifecycle.replace(snapshot_with("lib", "2.0"));
        lifecycle.restore(Some(old.clone()));
        assert_eq!(lifecycle.current(), Some(old));
    }

    #[test]
    fn try_load_is_false_when_persistence_disabled() {
        let store = Arc::new(MemorySnapshotStore::new());
        let path = Path::new("/entity/context.snapshot");
        store.save(&snapshot_with("lib", "1.0"), path).unwrap();

        let lifecycle = ContextLifecycle::new(store, path.to_path_buf(), false);
        assert!(!lifecycle.try_load_from_store());
        assert!(lifecycle.current().is_none());
    }

    #[test]
    fn try_load_is_false_when_nothing_stored() {
        let lifecycle = ContextLifecycle::new(
            Arc::new(MemorySnapshotStore::new()),
            PathBuf::from("/entity/context.snapshot"),
            true,
        );
        assert!(!lifecycle.try_load_from_store());
        assert!(lifecycle.current().is_none());
    }

    #[test]
    fn save_then_load_through_a_fresh_lifecycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.snapshot");
        let snapshot = snapshot_with("lib", "1.0");

        let first = ContextLifecycle::new(Arc::new(FsSnapshotStore::new()), path.clone(), true);
        first.replace(snapshot.clone());
        first.save_current();

        // A fresh, memoryless lifecycle falls back to the file.
        let second = ContextLifecycle::new(Arc::new(FsSnapshotStore::new()), path, true);
        assert!(second.try_load_from_store());
        let restored = second.current().unwrap();
        assert!(!depwatch_core::compare(&snapshot, &restored).changed());
    }

    #[test]
    fn save_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        // Destination parent is a file, so the save cannot succeed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("context.snapshot");

        let lifecycle = ContextLifecycle::new(Arc::new(FsSnapshotStore::new()), path, true);
        lifecycle.replace(snapshot_with("lib", "1.0"));
        lifecycle.save_current();
        // Still holds the snapshot; no panic, no propagated error.
        assert!(lifecycle.current().is_some());
    }
}
