//! The version-control capability seam.

use std::path::Path;

use crate::error::GitError;

/// The capability set the sync engine needs from a version-control backend.
///
/// Every call takes the repository path explicitly; implementations hold no
/// per-repository state between calls. Any backend exposing these operations
/// (a command-line tool, a linked library, a remote API) satisfies the
/// contract — the engine and scheduler only ever see this trait.
pub trait GitBackend: Send + Sync {
    /// Fetch remote commits and integrate them into the current branch.
    fn pull(&self, repo: &Path) -> Result<(), GitError>;

    /// File names present on disk but unknown to version control
    /// (ignore rules applied).
    fn untracked_files(&self, repo: &Path) -> Result<Vec<String>, GitError>;

    /// Stage exactly the named files.
    fn stage(&self, repo: &Path, files: &[String]) -> Result<(), GitError>;

    /// Stage every modification, rename, and deletion of tracked files.
    fn stage_tracked(&self, repo: &Path) -> Result<(), GitError>;

    /// Create a commit from the index.
    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    /// Push the current branch to its upstream.
    fn push(&self, repo: &Path) -> Result<(), GitError>;

    /// Whether the index or tracked worktree differs from HEAD. Untracked
    /// files never make a repository dirty on their own.
    fn is_dirty(&self, repo: &Path) -> Result<bool, GitError>;
}
