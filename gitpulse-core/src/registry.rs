//! Persistent repository registry.
//!
//! # Storage layout
//!
//! ```text
//! ~/.gitpulse/
//!   repos.json    (JSON array of absolute path strings — mode 0600)
//! ```
//!
//! The file is the whole registry: it is read once at open and rewritten
//! wholesale on every add/remove, before the mutation becomes visible to
//! readers. File absent ⇒ empty registry.
//!
//! # API pattern
//!
//! `Registry::open_at(home)` takes an explicit home directory; used in tests
//! with `TempDir`. `Registry::open()` derives home from `dirs::home_dir()`
//! and delegates. Tests must NEVER call `open()`; always use `open_at`.
//!
//! # Concurrency
//!
//! The in-memory set sits behind an `RwLock` so the sync worker can take
//! snapshots while the control surface mutates. `snapshot()` is a
//! point-in-time copy: a cycle already iterating one is unaffected by a
//! concurrent add/remove.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{io_err, RegistryError};
use crate::types::RepoHandle;

pub const CONFIG_FILE: &str = "repos.json";

/// `<home>/.gitpulse/`
pub fn gitpulse_root(home: &Path) -> PathBuf {
    home.join(".gitpulse")
}

/// `<home>/.gitpulse/repos.json` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    gitpulse_root(home).join(CONFIG_FILE)
}

/// Ordered, path-unique set of registered repositories, persisted to
/// `repos.json` synchronously on every mutation.
#[derive(Debug)]
pub struct Registry {
    config_path: PathBuf,
    repos: RwLock<Vec<RepoHandle>>,
}

impl Registry {
    /// Open the registry under an explicit home directory.
    ///
    /// Reads `repos.json` if present; an absent file yields an empty
    /// registry. Returns `RegistryError::Parse` (with path context) on
    /// malformed JSON.
    pub fn open_at(home: &Path) -> Result<Self, RegistryError> {
        let config_path = config_path_at(home);
        let repos = read_config(&config_path)?;
        Ok(Self {
            config_path,
            repos: RwLock::new(repos),
        })
    }

    /// `open_at` convenience wrapper — uses `dirs::home_dir()`.
    pub fn open() -> Result<Self, RegistryError> {
        Self::open_at(&home()?)
    }

    /// Replace the in-memory set with whatever `repos.json` holds now.
    ///
    /// Mutations made by another process (or another `Registry` over the
    /// same home) become visible only through this; the sync worker calls
    /// it at each cycle boundary. On error the previous set is kept.
    pub fn reload(&self) -> Result<(), RegistryError> {
        let repos = read_config(&self.config_path)?;
        *write_lock(&self.repos) = repos;
        Ok(())
    }

    /// Register a working directory.
    ///
    /// Returns `Ok(false)` without touching disk if the path is already
    /// present. Otherwise appends, persists the new list, and only then
    /// makes the entry visible; a persistence failure leaves both the file
    /// and the in-memory set unchanged and surfaces to the caller.
    pub fn add(&self, path: PathBuf) -> Result<bool, RegistryError> {
        let mut repos = write_lock(&self.repos);
        if repos.iter().any(|r| r.path == path) {
            return Ok(false);
        }
        let mut next: Vec<RepoHandle> = repos.clone();
        next.push(RepoHandle::new(path));
        self.persist(&next)?;
        *repos = next;
        Ok(true)
    }

    /// Unregister a working directory.
    ///
    /// Returns `Ok(false)` without touching disk if the path is absent.
    pub fn remove(&self, path: &Path) -> Result<bool, RegistryError> {
        let mut repos = write_lock(&self.repos);
        if !repos.iter().any(|r| r.path == path) {
            return Ok(false);
        }
        let next: Vec<RepoHandle> = repos.iter().filter(|r| r.path != path).cloned().collect();
        self.persist(&next)?;
        *repos = next;
        Ok(true)
    }

    /// Point-in-time ordered copy of the registered handles, for one sync
    /// cycle to iterate.
    pub fn snapshot(&self) -> Vec<RepoHandle> {
        read_lock(&self.repos).clone()
    }

    pub fn is_empty(&self) -> bool {
        read_lock(&self.repos).is_empty()
    }

    /// Atomically rewrite `repos.json` with the given set.
    ///
    /// Write flow: serialize → `.tmp` sibling → `chmod 0600` → `rename`.
    /// The `.tmp` lives in the target directory (same filesystem — no EXDEV).
    fn persist(&self, repos: &[RepoHandle]) -> Result<(), RegistryError> {
        let dir = self
            .config_path
            .parent()
            .unwrap_or_else(|| Path::new("."));
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }

        let paths: Vec<&Path> = repos.iter().map(|r| r.path.as_path()).collect();
        let json = serde_json::to_string_pretty(&paths)?;

        let tmp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| io_err(&tmp_path, e))?;
        set_file_permissions(&tmp_path)?;
        std::fs::rename(&tmp_path, &self.config_path)
            .map_err(|e| io_err(&self.config_path, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

fn read_config(config_path: &Path) -> Result<Vec<RepoHandle>, RegistryError> {
    if !config_path.exists() {
        return Ok(Vec::new());
    }
    let contents =
        std::fs::read_to_string(config_path).map_err(|e| io_err(config_path, e))?;
    let paths: Vec<PathBuf> =
        serde_json::from_str(&contents).map_err(|e| RegistryError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;
    Ok(paths.into_iter().map(RepoHandle::new).collect())
}

// A poisoned lock means a writer panicked between mutating memory and disk;
// the data itself is still a valid Vec, so recover it rather than propagate.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
