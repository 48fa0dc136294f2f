//! GitPulse core library — domain types, registry persistence, errors.
//!
//! Public API surface:
//! - [`types`] — [`RepoHandle`], [`SyncStatus`], [`SyncOutcome`]
//! - [`error`] — [`RegistryError`]
//! - [`registry`] — the persistent, concurrency-safe [`Registry`]

pub mod error;
pub mod registry;
pub mod types;

pub use error::RegistryError;
pub use registry::Registry;
pub use types::{RepoHandle, SyncOutcome, SyncStatus};
