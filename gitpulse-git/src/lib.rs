//! Version-control backend and per-repository sync engine.
//!
//! The capability seam is [`GitBackend`]; [`GitCli`] is the shipped
//! implementation (shells out to `git`). [`policy`] decides what a cycle
//! does; [`sync_repository`] executes it for one repository.

pub mod backend;
pub mod cli;
pub mod error;
pub mod policy;
mod sync;

pub use backend::GitBackend;
pub use cli::GitCli;
pub use error::GitError;
pub use policy::{eligible_untracked, plan, Action, WorktreeState, AUTO_COMMIT_MESSAGE};
pub use sync::sync_repository;
