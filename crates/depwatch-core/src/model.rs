use serde::{Deserialize, Serialize};

/// Composite identity key for a resolved dependency: `"<name>;<revision>"`.
///
/// The name-part is stable across revisions of the same logical dependency
/// and is what the fuzzy fallback match in `detect` keys on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(name: impl AsRef<str>, revision: impl AsRef<str>) -> Self {
        debug_assert!(!name.as_ref().contains(';'), "module name must not contain ';'");
        Self(format!("{};{}", name.as_ref(), revision.as_ref()))
    }

    /// Wraps an already composed identity key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `;`. A key without a separator is all name.
    pub fn name_part(&self) -> &str {
        self.0.split(';').next().unwrap_or(&self.0)
    }

    /// Text after the first `;`, if the key carries one.
    pub fn revision_part(&self) -> Option<&str> {
        self.0.split_once(';').map(|(_, rev)| rev)
    }
}

/// One resolved artifact of a dependency. `full_name` combines name, type
/// and extension into the single comparable identity used by the diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub full_name: String,
    /// Publication timestamp; `None` when the repository did not report one.
    pub last_modified_unix: Option<i64>,
}

impl ArtifactRecord {
    pub fn new(full_name: impl Into<String>, last_modified_unix: Option<i64>) -> Self {
        Self {
            full_name: full_name.into(),
            last_modified_unix,
        }
    }
}

/// One resolved dependency. Artifact order is irrelevant for comparison and
/// only kept for deterministic reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub revision: String,
    pub artifacts: Vec<ArtifactRecord>,
}

impl DependencyRecord {
    pub fn new(revision: impl Into<String>, artifacts: Vec<ArtifactRecord>) -> Self {
        Self {
            revision: revision.into(),
            artifacts,
        }
    }
}
