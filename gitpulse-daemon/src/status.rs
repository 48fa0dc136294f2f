//! Status publishing: the scheduler's only window to the outside world.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use gitpulse_core::{SyncOutcome, SyncStatus};

/// Sink the scheduler reports to once per repository per cycle.
///
/// Implementations must tolerate being invoked from the worker's execution
/// context while the control surface reads concurrently. Only the most
/// recent outcome per repository matters — no history is retained.
pub trait StatusPublisher: Send + Sync {
    fn publish(&self, outcome: SyncOutcome);
}

/// Last-write-wins map of the most recent outcome per repository, plus a
/// tracing event per publish. The presentation layer polls this; it never
/// shares mutable fields with the worker.
#[derive(Debug, Default)]
pub struct StatusBoard {
    outcomes: RwLock<HashMap<PathBuf, SyncOutcome>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent outcome for one repository, if it has been attempted yet.
    pub fn latest(&self, path: &Path) -> Option<SyncOutcome> {
        read_lock(&self.outcomes).get(path).cloned()
    }

    /// Most recent outcome for every attempted repository, ordered by
    /// display name for stable presentation.
    pub fn all(&self) -> Vec<SyncOutcome> {
        let mut outcomes: Vec<SyncOutcome> =
            read_lock(&self.outcomes).values().cloned().collect();
        outcomes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        outcomes
    }
}

impl StatusPublisher for StatusBoard {
    fn publish(&self, outcome: SyncOutcome) {
        match outcome.status {
            SyncStatus::Synced => {
                tracing::info!(repo = %outcome.name, "synced");
            }
            SyncStatus::Error => {
                tracing::warn!(
                    repo = %outcome.name,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "sync failed",
                );
            }
        }
        write_lock(&self.outcomes).insert(outcome.path.clone(), outcome);
    }
}

// Poisoning can only come from a panic inside the map operations above;
// the map stays structurally valid, so recover it.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
