//! Domain types for GitPulse.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RepoHandle
// ---------------------------------------------------------------------------

/// One registered local-working-directory/remote pair.
///
/// `path` is the identity of the handle: the registry enforces uniqueness on
/// it and no handle is ever aliased by two entries. The remote is not stored
/// here — it is whatever the working directory's git configuration resolves
/// at action time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoHandle {
    /// Absolute path of the working directory.
    pub path: PathBuf,
    /// Display name, derived from the final path component.
    pub name: String,
}

impl RepoHandle {
    pub fn new(path: PathBuf) -> Self {
        let name = display_name(&path);
        Self { path, name }
    }
}

impl fmt::Display for RepoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_else(|| path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

// ---------------------------------------------------------------------------
// Sync outcomes
// ---------------------------------------------------------------------------

/// Terminal status of one sync attempt for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "Synced"),
            SyncStatus::Error => write!(f, "Error"),
        }
    }
}

/// The result of one sync attempt for one repository in one cycle.
///
/// Immutable once produced; consumed by the status publisher and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub path: PathBuf,
    pub name: String,
    pub status: SyncStatus,
    /// Human-readable cause; present iff `status == Error`.
    pub detail: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl SyncOutcome {
    pub fn synced(handle: &RepoHandle) -> Self {
        Self {
            path: handle.path.clone(),
            name: handle.name.clone(),
            status: SyncStatus::Synced,
            detail: None,
            finished_at: Utc::now(),
        }
    }

    pub fn error(handle: &RepoHandle, detail: impl Into<String>) -> Self {
        Self {
            path: handle.path.clone(),
            name: handle.name.clone(),
            status: SyncStatus::Error,
            detail: Some(detail.into()),
            finished_at: Utc::now(),
        }
    }

    pub fn is_synced(&self) -> bool {
        self.status == SyncStatus::Synced
    }
}
