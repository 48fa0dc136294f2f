use thiserror::Error;

/// Error surface for the daemon runtime.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// A second `run` was attempted while a loop is already active.
    #[error("sync scheduler is already running")]
    AlreadyRunning,

    /// The tokio runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
