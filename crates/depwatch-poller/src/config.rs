use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot file name inside an entity's state directory.
pub const SNAPSHOT_FILE_NAME: &str = "context.snapshot";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollConfig {
    pub entity: EntityConfig,
    pub polling: PollingConfig,
    pub resolver: ResolverConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityConfig {
    pub id: String,
    pub state_dir: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Enables the disk fallback: the snapshot survives process restarts.
    #[serde(default = "default_true")]
    pub persist_to_disk: bool,
    /// Verbose per-dependency and per-artifact logging.
    #[serde(default)]
    pub debug_logging: bool,
    /// When false (the default), overlapping poll cycles for this entity
    /// are serialized; when true they may overlap and only the snapshot
    /// cell itself is protected.
    #[serde(default)]
    pub allow_concurrent_polls: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Where the external resolution step writes its output.
    pub resolved_path: String,
}

fn default_true() -> bool {
    true
}

impl PollConfig {
    pub fn default_for(entity_id: &str) -> Self {
        Self {
            entity: EntityConfig {
                id: entity_id.to_string(),
                state_dir: ".depwatch".to_string(),
            },
            polling: PollingConfig {
                persist_to_disk: true,
                debug_logging: false,
                allow_concurrent_polls: false,
            },
            resolver: ResolverConfig {
                resolved_path: "resolved.json".to_string(),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: PollConfig = toml::from_str(&s).with_context(|| "parse depwatch.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join("depwatch.toml")
    }

    pub fn state_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.entity.state_dir)
    }

    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.state_dir(root).join(SNAPSHOT_FILE_NAME)
    }

    pub fn resolved_path(&self, root: &Path) -> PathBuf {
        root.join(&self.resolver.resolved_path)
    }
}
