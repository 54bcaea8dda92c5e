use std::sync::Mutex;

use tracing::{debug, error, info};

use depwatch_core::{compare, Snapshot};

use crate::config::PollingConfig;
use crate::lifecycle::ContextLifecycle;
use crate::resolver::Resolver;

/// Runs one poll cycle at a time for one monitored entity: resolve, fall
/// back to disk when memory is empty, apply the guard clauses, diff, and
/// hand back the boolean verdict that drives the downstream action.
pub struct Poller {
    lifecycle: ContextLifecycle,
    resolver: Box<dyn Resolver>,
    debug_logging: bool,
    allow_concurrent_polls: bool,
    cycle: Mutex<()>,
}

impl Poller {
    pub fn new(lifecycle: ContextLifecycle, resolver: Box<dyn Resolver>, polling: &PollingConfig) -> Self {
        Self {
            lifecycle,
            resolver,
            debug_logging: polling.debug_logging,
            allow_concurrent_polls: polling.allow_concurrent_polls,
            cycle: Mutex::new(()),
        }
    }

    pub fn lifecycle(&self) -> &ContextLifecycle {
        &self.lifecycle
    }

    /// Runs one poll cycle. Returns true when the resolved state changed in
    /// a way that should trigger the downstream action.
    ///
    /// Nothing escapes as an error: resolution failures, empty resolutions
    /// and store failures are all absorbed into a false verdict plus log
    /// lines, and none of them is fatal to future polls.
    pub fn poll(&self) -> bool {
        let _cycle = if self.allow_concurrent_polls {
            None
        } else {
            Some(self.cycle.lock().unwrap())
        };

        let new_snapshot = match self.resolver.resolve() {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                error!("resolution failed: {err:#}");
                None
            }
        };

        self.check_modified(new_snapshot)
    }

    fn check_modified(&self, new_snapshot: Option<Snapshot>) -> bool {
        let previous = match self.lifecycle.current() {
            Some(snapshot) => Some(snapshot),
            None => {
                info!("no previous snapshot in memory; attempting to load one from disk");
                if self.lifecycle.try_load_from_store() {
                    self.lifecycle.current()
                } else {
                    None
                }
            }
        };

        let Some(previous) = previous else {
            match new_snapshot {
                Some(snapshot) => {
                    info!(
                        dependencies = snapshot.len(),
                        "recording first snapshot; changes will be detected from the next poll on"
                    );
                    self.lifecycle.replace(snapshot);
                    self.lifecycle.save_current();
                }
                None => error!("no previous snapshot and resolution produced nothing to record"),
            }
            return false;
        };

        let Some(new_snapshot) = new_snapshot else {
            error!("resolution produced no snapshot; keeping the previous one");
            self.lifecycle.restore(Some(previous));
            return false;
        };

        if new_snapshot.is_empty() {
            error!("resolution produced zero dependencies; check the descriptor settings. Keeping the previous snapshot");
            self.lifecycle.restore(Some(previous));
            return false;
        }

        for (id, record) in &new_snapshot.dependencies {
            info!("resolved dependency {} (revision {})", id.as_str(), record.revision);
            if self.debug_logging {
                for artifact in &record.artifacts {
                    debug!("..resolved artifact {}", artifact.full_name);
                }
            }
        }

        // Record what we saw before reporting on it; only the guard paths
        // above roll back.
        self.lifecycle.replace(new_snapshot.clone());
        self.lifecycle.save_current();

        let report = compare(&previous, &new_snapshot);
        for finding in &report.findings {
            info!("..{finding}");
        }
        info!(
            findings = report.len(),
            changed = report.changed(),
            "poll cycle complete"
        );

        report.changed()
    }
}
