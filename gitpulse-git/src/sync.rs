//! Per-repository sync executor.

use gitpulse_core::RepoHandle;

use crate::backend::GitBackend;
use crate::error::GitError;
use crate::policy::{plan, Action, WorktreeState};

/// Run one full sync attempt for one repository: pull, observe the worktree,
/// then execute the policy's plan in order.
///
/// The first failing action aborts the remainder and is returned; the caller
/// (the scheduler) owns turning that into a per-repository outcome. A pull
/// failure in particular means no stage/commit/push is attempted this cycle.
pub fn sync_repository(git: &dyn GitBackend, repo: &RepoHandle) -> Result<(), GitError> {
    git.pull(&repo.path)?;

    let state = WorktreeState {
        untracked: git.untracked_files(&repo.path)?,
        dirty: git.is_dirty(&repo.path)?,
    };

    for action in plan(&state) {
        match action {
            Action::Stage(files) => {
                tracing::debug!(repo = %repo.name, count = files.len(), "staging untracked files");
                git.stage(&repo.path, &files)?;
            }
            Action::StageTracked => git.stage_tracked(&repo.path)?,
            Action::Commit(message) => {
                tracing::info!(repo = %repo.name, "committing local changes");
                git.commit(&repo.path, &message)?;
            }
            Action::Push => git.push(&repo.path)?,
        }
    }

    Ok(())
}
