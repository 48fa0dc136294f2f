//! The fixed-interval sync loop.
//!
//! Per cycle, per repository the state machine is
//! `Idle → Pulling → Staging → Committing → Pushing → Synced`, with a jump
//! to `Errored` from any step; both terminal states return to `Idle` at the
//! next cycle boundary. The step sequencing lives in
//! [`gitpulse_git::sync_repository`]; this module owns the loop around it:
//! cycle timing, per-repository failure isolation, stop handling, and
//! outcome publication.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use gitpulse_core::{Registry, SyncOutcome};
use gitpulse_git::{sync_repository, GitBackend};

use crate::error::DaemonError;
use crate::status::StatusPublisher;

/// Time between cycle starts (not between repository completions).
pub const DEFAULT_SYNC_PERIOD: Duration = Duration::from_secs(60);

/// Drives the sync loop over the registry's current handle set.
///
/// Repositories are processed strictly sequentially within a cycle; a
/// failure (or panic) while processing one is converted to an Error outcome
/// and never prevents the repositories after it from being processed.
/// Registry mutations made while a cycle is running take effect at the next
/// cycle boundary.
pub struct SyncScheduler {
    registry: Arc<Registry>,
    git: Arc<dyn GitBackend>,
    publisher: Arc<dyn StatusPublisher>,
    period: Duration,
    active: AtomicBool,
}

impl SyncScheduler {
    pub fn new(
        registry: Arc<Registry>,
        git: Arc<dyn GitBackend>,
        publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        Self {
            registry,
            git,
            publisher,
            period: DEFAULT_SYNC_PERIOD,
            active: AtomicBool::new(false),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Run the loop until `stop` flips to `true` (or its sender is dropped).
    ///
    /// At most one loop may be active per scheduler: a second concurrent
    /// `run` returns [`DaemonError::AlreadyRunning`] without looping. The
    /// stop signal is honored between cycles and between repositories — a
    /// git call already in flight is allowed to finish (no per-action
    /// timeout; the next cycle is the only retry).
    pub async fn run(&self, mut stop: watch::Receiver<bool>) -> Result<(), DaemonError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DaemonError::AlreadyRunning);
        }

        tracing::info!(period_secs = self.period.as_secs(), "sync loop started");
        self.run_loop(&mut stop).await;
        tracing::info!("sync loop stopped");

        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn run_loop(&self, stop: &mut watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.period);
        // An overlong cycle shifts the next start instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_cycle(stop).await;
                    if *stop.borrow() {
                        break;
                    }
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    }

    /// One pass over the registry snapshot. Public so the control surface
    /// can run a single foreground cycle.
    ///
    /// The persisted list is re-read first, so `gitpulse add`/`remove` run
    /// from another process take effect at the next cycle boundary, never
    /// mid-cycle.
    pub async fn run_cycle(&self, stop: &watch::Receiver<bool>) {
        if let Err(err) = self.registry.reload() {
            tracing::warn!(error = %err, "could not reload repository list; keeping last known set");
        }
        let snapshot = self.registry.snapshot();
        tracing::debug!(repos = snapshot.len(), "sync cycle started");

        for handle in snapshot {
            if *stop.borrow() {
                tracing::info!("stop requested; abandoning remainder of cycle");
                break;
            }

            let git = Arc::clone(&self.git);
            let repo = handle.clone();
            let result =
                tokio::task::spawn_blocking(move || sync_repository(git.as_ref(), &repo)).await;

            // Per-repository isolation boundary: errors and panics both end
            // here, as an outcome, never as an unwinding of the loop.
            let outcome = match result {
                Ok(Ok(())) => SyncOutcome::synced(&handle),
                Ok(Err(err)) => SyncOutcome::error(&handle, err.to_string()),
                Err(join_err) => {
                    SyncOutcome::error(&handle, format!("sync task panicked: {join_err}"))
                }
            };
            self.publisher.publish(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use gitpulse_core::SyncStatus;
    use gitpulse_git::GitError;
    use tempfile::TempDir;

    use super::*;
    use crate::status::StatusBoard;

    /// Backend that fails every action for paths whose name starts with
    /// "fail" and records pull invocations.
    #[derive(Default)]
    struct FakeGit {
        pulls: Mutex<Vec<PathBuf>>,
    }

    impl FakeGit {
        fn pulls(&self) -> Vec<PathBuf> {
            self.pulls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        fn should_fail(repo: &Path) -> bool {
            repo.file_name()
                .map(|n| n.to_string_lossy().starts_with("fail"))
                .unwrap_or(false)
        }
    }

    impl GitBackend for FakeGit {
        fn pull(&self, repo: &Path) -> Result<(), GitError> {
            self.pulls
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(repo.to_path_buf());
            if Self::should_fail(repo) {
                return Err(GitError::NetworkOrAuth {
                    detail: "Could not resolve host: example.com".into(),
                });
            }
            Ok(())
        }

        fn untracked_files(&self, _repo: &Path) -> Result<Vec<String>, GitError> {
            Ok(vec![])
        }

        fn stage(&self, _repo: &Path, _files: &[String]) -> Result<(), GitError> {
            Ok(())
        }

        fn stage_tracked(&self, _repo: &Path) -> Result<(), GitError> {
            Ok(())
        }

        fn commit(&self, _repo: &Path, _message: &str) -> Result<(), GitError> {
            Ok(())
        }

        fn push(&self, _repo: &Path) -> Result<(), GitError> {
            Ok(())
        }

        fn is_dirty(&self, _repo: &Path) -> Result<bool, GitError> {
            Ok(false)
        }
    }

    struct Fixture {
        scheduler: Arc<SyncScheduler>,
        registry: Arc<Registry>,
        board: Arc<StatusBoard>,
        git: Arc<FakeGit>,
    }

    fn make_scheduler(home: &Path) -> Fixture {
        let registry = Arc::new(Registry::open_at(home).expect("open registry"));
        let board = Arc::new(StatusBoard::new());
        let git = Arc::new(FakeGit::default());
        let scheduler = Arc::new(SyncScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&git) as Arc<dyn GitBackend>,
            Arc::clone(&board) as Arc<dyn StatusPublisher>,
        ));
        Fixture {
            scheduler,
            registry,
            board,
            git,
        }
    }

    #[tokio::test]
    async fn failure_in_one_repo_does_not_block_the_next() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());
        f.registry.add(PathBuf::from("/code/fail_api")).expect("add");
        f.registry.add(PathBuf::from("/code/web")).expect("add");

        let (_stop_tx, stop_rx) = watch::channel(false);
        f.scheduler.run_cycle(&stop_rx).await;

        let failed = f.board.latest(Path::new("/code/fail_api")).expect("outcome");
        assert_eq!(failed.status, SyncStatus::Error);
        assert!(
            failed.detail.as_deref().unwrap_or("").contains("Could not resolve host"),
            "pull's failure detail must be preserved"
        );

        let ok = f.board.latest(Path::new("/code/web")).expect("outcome");
        assert_eq!(ok.status, SyncStatus::Synced);

        // Both repositories were attempted, in registration order.
        assert_eq!(
            f.git.pulls(),
            vec![PathBuf::from("/code/fail_api"), PathBuf::from("/code/web")]
        );
    }

    #[tokio::test]
    async fn repos_added_between_cycles_are_picked_up_next_cycle() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());
        f.registry.add(PathBuf::from("/code/web")).expect("add");

        let (_stop_tx, stop_rx) = watch::channel(false);
        f.scheduler.run_cycle(&stop_rx).await;
        assert!(f.board.latest(Path::new("/code/api")).is_none());

        f.registry.add(PathBuf::from("/code/api")).expect("add");
        f.scheduler.run_cycle(&stop_rx).await;
        assert!(f.board.latest(Path::new("/code/api")).is_some());
    }

    #[tokio::test]
    async fn repos_added_by_another_process_are_seen_next_cycle() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());

        // A second registry over the same home stands in for a separate
        // `gitpulse add` process writing repos.json while the loop runs.
        let other = Registry::open_at(home.path()).expect("open other");
        other.add(PathBuf::from("/code/web")).expect("add");

        let (_stop_tx, stop_rx) = watch::channel(false);
        f.scheduler.run_cycle(&stop_rx).await;
        let outcome = f.board.latest(Path::new("/code/web")).expect("outcome");
        assert_eq!(outcome.status, SyncStatus::Synced);

        other.remove(Path::new("/code/web")).expect("remove");
        f.scheduler.run_cycle(&stop_rx).await;
        assert_eq!(f.git.pulls().len(), 1, "removed repo must not be pulled again");
    }

    #[tokio::test]
    async fn pre_stopped_loop_processes_nothing() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());
        f.registry.add(PathBuf::from("/code/web")).expect("add");

        let (_stop_tx, stop_rx) = watch::channel(true);
        f.scheduler.run(stop_rx).await.expect("run");
        assert!(f.board.all().is_empty());
    }

    #[tokio::test]
    async fn second_run_is_rejected_while_one_is_active() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());

        let (stop_tx, stop_rx) = watch::channel(false);
        let running = Arc::clone(&f.scheduler);
        let task = tokio::spawn(async move { running.run(stop_rx).await });

        // Let the first loop arm its guard.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (_stop_tx2, stop_rx2) = watch::channel(false);
        let second = f.scheduler.run(stop_rx2).await;
        assert!(matches!(second, Err(DaemonError::AlreadyRunning)));

        stop_tx.send(true).expect("send stop");
        task.await.expect("join").expect("first run");
    }

    #[tokio::test]
    async fn stop_signal_ends_the_loop_and_frees_the_guard() {
        let home = TempDir::new().expect("home");
        let f = make_scheduler(home.path());
        f.registry.add(PathBuf::from("/code/web")).expect("add");

        let (stop_tx, stop_rx) = watch::channel(false);
        let running = Arc::clone(&f.scheduler);
        let task = tokio::spawn(async move { running.run(stop_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        stop_tx.send(true).expect("send stop");
        task.await.expect("join").expect("run");

        // First cycle ran before the stop; guard is released for a rerun.
        assert!(f.board.latest(Path::new("/code/web")).is_some());
        let (_tx, rx) = watch::channel(true);
        f.scheduler.run(rx).await.expect("rerun after stop");
    }
}
