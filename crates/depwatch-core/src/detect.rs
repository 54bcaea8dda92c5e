use std::fmt;

use crate::model::{ArtifactRecord, DependencyRecord, ModuleId};
use crate::snapshot::Snapshot;

/// One observed difference between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    DependencyRemoved {
        id: ModuleId,
    },
    RevisionChanged {
        name: String,
        previous: String,
        current: String,
    },
    ArtifactRemoved {
        dependency: ModuleId,
        artifact: String,
    },
    ArtifactTimestampChanged {
        dependency: ModuleId,
        artifact: String,
        previous: Option<i64>,
        current: Option<i64>,
    },
    DependencyAdded {
        name: String,
        revision: String,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DependencyRemoved { id } => {
                write!(f, "the previous dependency {} doesn't exist anymore", id.as_str())
            }
            Finding::RevisionChanged { name, previous, current } => {
                write!(f, "the revision of {} has changed: {} -> {}", name, previous, current)
            }
            Finding::ArtifactRemoved { dependency, artifact } => {
                write!(
                    f,
                    "the previous artifact {} of {} doesn't exist anymore",
                    artifact,
                    dependency.as_str()
                )
            }
            Finding::ArtifactTimestampChanged { dependency, artifact, previous, current } => {
                write!(
                    f,
                    "the publication date of artifact {} of {} has changed: {:?} -> {:?}",
                    artifact,
                    dependency.as_str(),
                    previous,
                    current
                )
            }
            Finding::DependencyAdded { name, revision } => {
                write!(f, "the new dependency {} ({}) did not exist before", name, revision)
            }
        }
    }
}

/// Outcome of comparing two snapshots. Each finding is one tallied change;
/// the verdict is simply "any findings at all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub findings: Vec<Finding>,
}

impl ChangeReport {
    pub fn changed(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Compare a previously recorded snapshot against a freshly resolved one.
///
/// Pure and order-independent: no I/O, no locking, and the verdict does not
/// depend on map iteration order. Two asymmetric passes are required
/// because a plain size or key-set comparison would miss same-count
/// substitutions (one dependency removed and another added in the same
/// poll):
///
/// 1. keyed off the previous set: removals, revision changes and, for
///    revision-equal matches, per-artifact differences;
/// 2. keyed off the new set: genuinely new dependency names.
///
/// A revision bump is counted once by pass 1 and not re-counted by pass 2,
/// since its name-part is still present in the previous set.
pub fn compare(previous: &Snapshot, current: &Snapshot) -> ChangeReport {
    let mut findings = Vec::new();

    for (id, previous_record) in &previous.dependencies {
        match find_match(current, id) {
            None => findings.push(Finding::DependencyRemoved { id: id.clone() }),
            Some(new_record) => {
                if new_record.revision != previous_record.revision {
                    // Artifacts are not inspected further: the revision
                    // change already accounts for the dependency.
                    findings.push(Finding::RevisionChanged {
                        name: id.name_part().to_string(),
                        previous: previous_record.revision.clone(),
                        current: new_record.revision.clone(),
                    });
                } else {
                    compare_artifacts(id, previous_record, new_record, &mut findings);
                }
            }
        }
    }

    for (id, record) in &current.dependencies {
        let known = previous
            .dependencies
            .keys()
            .any(|previous_id| previous_id.name_part() == id.name_part());
        if !known {
            findings.push(Finding::DependencyAdded {
                name: id.name_part().to_string(),
                revision: record.revision.clone(),
            });
        }
    }

    ChangeReport { findings }
}

/// Exact identity-key lookup, falling back to the first entry (insertion
/// order) whose name-part matches case-insensitively.
///
/// The fallback keeps a dependency pinned to a floating revision marker
/// (e.g. `latest.integration`) recognizable as the same logical dependency
/// when the resolver pins it to a different concrete revision.
fn find_match<'a>(current: &'a Snapshot, id: &ModuleId) -> Option<&'a DependencyRecord> {
    if let Some(record) = current.dependencies.get(id) {
        return Some(record);
    }
    current
        .dependencies
        .iter()
        .find(|(candidate, _)| candidate.name_part().eq_ignore_ascii_case(id.name_part()))
        .map(|(_, record)| record)
}

/// Artifact-level comparison for a revision-equal match. Every previous
/// artifact is checked; differences are tallied individually rather than
/// capped at one per dependency.
fn compare_artifacts(
    id: &ModuleId,
    previous: &DependencyRecord,
    current: &DependencyRecord,
    findings: &mut Vec<Finding>,
) {
    for artifact in &previous.artifacts {
        match current.artifacts.iter().find(|a| a.full_name == artifact.full_name) {
            None => findings.push(Finding::ArtifactRemoved {
                dependency: id.clone(),
                artifact: artifact.full_name.clone(),
            }),
            Some(new_artifact) => {
                if modified_epoch(new_artifact) != modified_epoch(artifact) {
                    findings.push(Finding::ArtifactTimestampChanged {
                        dependency: id.clone(),
                        artifact: artifact.full_name.clone(),
                        previous: artifact.last_modified_unix,
                        current: new_artifact.last_modified_unix,
                    });
                }
            }
        }
    }
}

// Unknown timestamps take part in the comparison as 0 on both sides.
fn modified_epoch(artifact: &ArtifactRecord) -> i64 {
    artifact.last_modified_unix.unwrap_or(0)
}
