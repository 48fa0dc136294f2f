//! Blocking entrypoint used by the CLI to host the worker.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::DaemonError;
use crate::scheduler::SyncScheduler;

/// Start the sync worker and block the current thread until it stops.
///
/// `once` runs a single cycle and returns — used by `gitpulse run --once`.
/// Otherwise the loop runs until ctrl-c, which flips the stop signal; the
/// repository being processed at that moment is allowed to finish.
pub fn start_blocking(scheduler: Arc<SyncScheduler>, once: bool) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DaemonError::Runtime)?;

    runtime.block_on(async move {
        let (stop_tx, stop_rx) = watch::channel(false);

        if once {
            scheduler.run_cycle(&stop_rx).await;
            return Ok(());
        }

        let signal = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received ctrl-c, stopping after the current repository");
                    let _ = stop_tx.send(true);
                }
                Err(err) => {
                    tracing::error!(error = %err, "ctrl-c handler failed; stopping");
                    let _ = stop_tx.send(true);
                }
            }
        });

        let result = scheduler.run(stop_rx).await;
        signal.abort();
        result
    })
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
