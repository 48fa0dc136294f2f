//! [`GitBackend`] implementation that shells out to the `git` binary.

use std::path::Path;
use std::process::Command;

use crate::backend::GitBackend;
use crate::error::GitError;

/// Runs `git -C <repo> …` per operation. Stateless; safe to share.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Run one git subcommand, returning captured stdout on success and a
    /// classified [`GitError`] on a non-zero exit.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        tracing::debug!(repo = %repo.display(), command = %args.join(" "), "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(args)
            .output()
            .map_err(GitError::Spawn)?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        // git reports the interesting part on stderr, but e.g. `commit`
        // prints "nothing to commit" on stdout; classify over both.
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let combined = format!("{stderr}\n{stdout}");
        Err(GitError::classify(args[0], repo, &combined))
    }
}

impl GitBackend for GitCli {
    fn pull(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["pull"]).map(|_| ())
    }

    fn untracked_files(&self, repo: &Path) -> Result<Vec<String>, GitError> {
        // -z gives NUL-delimited, unquoted names; without it core.quotepath
        // C-quotes anything non-ASCII and the real file name is lost.
        let out = self.run(repo, &["ls-files", "-z", "--others", "--exclude-standard"])?;
        Ok(out
            .split('\0')
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn stage(&self, repo: &Path, files: &[String]) -> Result<(), GitError> {
        if files.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(files.iter().map(String::as_str));
        self.run(repo, &args).map(|_| ())
    }

    fn stage_tracked(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["add", "--update"]).map(|_| ())
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.run(repo, &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["push"]).map(|_| ())
    }

    fn is_dirty(&self, repo: &Path) -> Result<bool, GitError> {
        let out = self.run(repo, &["status", "--porcelain", "--untracked-files=no"])?;
        Ok(!out.trim().is_empty())
    }
}
