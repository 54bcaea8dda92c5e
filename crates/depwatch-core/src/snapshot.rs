use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{DependencyRecord, ModuleId};

/// The full resolved dependency graph captured at one poll.
///
/// Entries keep the order the resolver emitted them in. The fuzzy name-part
/// fallback in `detect::compare` takes the first match in insertion order,
/// which keeps the fallback deterministic even if a buggy resolver emits
/// two entries with the same name-part.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub dependencies: IndexMap<ModuleId, DependencyRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ModuleId, record: DependencyRecord) {
        self.dependencies.insert(id, record);
    }

    pub fn get(&self, id: &ModuleId) -> Option<&DependencyRecord> {
        self.dependencies.get(id)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
