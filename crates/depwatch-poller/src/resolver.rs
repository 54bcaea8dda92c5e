use std::path::PathBuf;

use anyhow::{Context, Result};

use depwatch_core::Snapshot;
use depwatch_store::{FsSnapshotStore, SnapshotStore};

/// Boundary to the external resolution step.
///
/// Implementations carry their own descriptor locations, properties and
/// environment; a poll only needs the resolved snapshot. A resolution
/// failure propagates as an error and is converted to "absent" at the poll
/// boundary, never adopted as state.
pub trait Resolver: Send + Sync {
    fn resolve(&self) -> Result<Snapshot>;
}

/// Reads the snapshot document an external resolution step wrote to disk
/// (same versioned JSON schema the snapshot store uses). This is the
/// narrow hand-off to the out-of-process resolver: it re-resolves the
/// descriptor on its own schedule and replaces the file atomically.
pub struct FileResolver {
    path: PathBuf,
    store: FsSnapshotStore,
}

impl FileResolver {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            store: FsSnapshotStore::new(),
        }
    }
}

impl Resolver for FileResolver {
    fn resolve(&self) -> Result<Snapshot> {
        let snapshot = self
            .store
            .load(&self.path)
            .with_context(|| format!("read resolved output {}", self.path.display()))?;
        Ok(snapshot)
    }
}
