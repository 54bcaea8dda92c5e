use std::path::Path;

use depwatch_core::Snapshot;

/// Why a snapshot could not be saved or loaded. Both kinds are recoverable
/// for callers: a failed load means "no prior context available" and a
/// failed save must not fail the poll.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),
}

/// Durable round-trip of one snapshot to a single destination. Used only as
/// a crash/restart fallback when the in-memory snapshot is unavailable.
pub trait SnapshotStore: Send + Sync {
    /// Replaces whatever the destination previously held.
    fn save(&self, snapshot: &Snapshot, destination: &Path) -> Result<(), StoreError>;

    fn load(&self, source: &Path) -> Result<Snapshot, StoreError>;
}
