//! Error types for gitpulse-git.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// All failures a version-control action can surface.
///
/// `classify` maps git's stderr text onto this taxonomy; anything it does
/// not recognize becomes [`GitError::Command`].
#[derive(Debug, Error)]
pub enum GitError {
    /// The path does not name an initialized git working directory.
    #[error("not a git repository: {path}")]
    NotARepository { path: PathBuf },

    /// Remote unreachable or credentials rejected.
    #[error("network or authentication failure: {detail}")]
    NetworkOrAuth { detail: String },

    /// Pull could not integrate remote commits.
    #[error("merge conflict: {detail}")]
    MergeConflict { detail: String },

    /// Commit was asked for with an empty index and clean tree.
    #[error("nothing to commit")]
    NothingToCommit,

    /// Any other non-zero git exit.
    #[error("git {command} failed: {detail}")]
    Command { command: String, detail: String },

    /// The `git` binary could not be launched at all.
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
}

impl GitError {
    /// Classify a failed git invocation from its combined stderr/stdout text.
    pub fn classify(command: &str, repo: &Path, output: &str) -> Self {
        let haystack = output.to_ascii_lowercase();
        let detail = first_meaningful_line(output);

        if haystack.contains("not a git repository") {
            return GitError::NotARepository {
                path: repo.to_path_buf(),
            };
        }
        if NETWORK_MARKERS.iter().any(|m| haystack.contains(m)) {
            return GitError::NetworkOrAuth { detail };
        }
        if CONFLICT_MARKERS.iter().any(|m| haystack.contains(m)) {
            return GitError::MergeConflict { detail };
        }
        if haystack.contains("nothing to commit") || haystack.contains("nothing added to commit")
        {
            return GitError::NothingToCommit;
        }
        GitError::Command {
            command: command.to_string(),
            detail,
        }
    }
}

const NETWORK_MARKERS: &[&str] = &[
    "could not resolve host",
    "could not read from remote repository",
    "connection refused",
    "connection timed out",
    "operation timed out",
    "authentication failed",
    "permission denied",
    "invalid credentials",
];

const CONFLICT_MARKERS: &[&str] = &[
    "merge conflict",
    "automatic merge failed",
    "fix conflicts",
    "needs merge",
    "unmerged files",
    "would be overwritten by merge",
];

/// First non-empty line of the tool output, or a placeholder when git said
/// nothing at all.
fn first_meaningful_line(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output from git")
        .to_string()
}
