//! GitPulse — keep local git repositories auto-synced with their remotes.
//!
//! # Usage
//!
//! ```text
//! gitpulse add <path>
//! gitpulse remove <path>
//! gitpulse list
//! gitpulse run [--interval <secs>] [--once]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{repo, run::RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "gitpulse",
    version,
    about = "Periodically pull, auto-commit, and push a set of local git repositories",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a working directory for auto-sync.
    Add(repo::AddArgs),

    /// Unregister a working directory.
    Remove(repo::RemoveArgs),

    /// List registered repositories.
    List,

    /// Run the sync loop in the foreground (ctrl-c to stop).
    Run(RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Add(args) => repo::add(args),
        Commands::Remove(args) => repo::remove(args),
        Commands::List => repo::list(),
        Commands::Run(args) => args.run(),
    }
}
