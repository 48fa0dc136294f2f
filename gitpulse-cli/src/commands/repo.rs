//! `gitpulse add`, `gitpulse remove`, `gitpulse list`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use gitpulse_core::Registry;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Working directory to register (must exist; stored canonicalized).
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Working directory to unregister.
    pub path: PathBuf,
}

#[derive(Tabled)]
struct RepoTableRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "path")]
    path: String,
}

pub fn add(args: AddArgs) -> Result<()> {
    let path = std::fs::canonicalize(&args.path)
        .with_context(|| format!("cannot resolve {}", args.path.display()))?;

    let registry = Registry::open().context("failed to load repository list")?;
    if registry
        .add(path.clone())
        .context("failed to save repository list")?
    {
        println!("{} {}", "Registered".green(), path.display());
    } else {
        println!("{} is already registered", path.display());
    }
    Ok(())
}

pub fn remove(args: RemoveArgs) -> Result<()> {
    // The directory may already be gone from disk; fall back to the raw path
    // so stale entries can still be removed.
    let path = std::fs::canonicalize(&args.path).unwrap_or(args.path);

    let registry = Registry::open().context("failed to load repository list")?;
    if registry
        .remove(&path)
        .context("failed to save repository list")?
    {
        println!("{} {}", "Removed".green(), path.display());
    } else {
        println!("{} was not registered", path.display());
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let registry = Registry::open().context("failed to load repository list")?;
    let snapshot = registry.snapshot();

    if snapshot.is_empty() {
        println!("No repositories registered.");
        println!("Run: gitpulse add <path>");
        return Ok(());
    }

    let rows: Vec<RepoTableRow> = snapshot
        .into_iter()
        .map(|handle| RepoTableRow {
            name: handle.name,
            path: handle.path.display().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
