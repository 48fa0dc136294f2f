//! `gitpulse run` — host the sync worker in the foreground.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use gitpulse_core::{Registry, SyncOutcome, SyncStatus};
use gitpulse_daemon::{start_blocking, StatusBoard, StatusPublisher, SyncScheduler};
use gitpulse_git::GitCli;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Seconds between cycle starts.
    #[arg(long, default_value_t = 60)]
    pub interval: u64,

    /// Run a single cycle, print the outcomes, and exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(Tabled)]
struct OutcomeTableRow {
    #[tabled(rename = "repository")]
    repository: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
    #[tabled(rename = "finished")]
    finished: String,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let registry =
            Arc::new(Registry::open().context("failed to load repository list")?);
        if registry.is_empty() {
            println!("No repositories registered; nothing to sync.");
            println!("Run: gitpulse add <path>");
            return Ok(());
        }

        let board = Arc::new(StatusBoard::new());
        let scheduler = Arc::new(
            SyncScheduler::new(
                registry,
                Arc::new(GitCli::new()),
                Arc::clone(&board) as Arc<dyn StatusPublisher>,
            )
            .with_period(Duration::from_secs(self.interval)),
        );

        start_blocking(scheduler, self.once).context("sync worker failed")?;

        if self.once {
            print_outcomes(&board.all());
        }
        Ok(())
    }
}

fn print_outcomes(outcomes: &[SyncOutcome]) {
    let rows: Vec<OutcomeTableRow> = outcomes
        .iter()
        .map(|outcome| OutcomeTableRow {
            repository: outcome.name.clone(),
            status: match outcome.status {
                SyncStatus::Synced => outcome.status.to_string().green().to_string(),
                SyncStatus::Error => outcome.status.to_string().red().to_string(),
            },
            detail: outcome.detail.clone().unwrap_or_default(),
            finished: outcome
                .finished_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
