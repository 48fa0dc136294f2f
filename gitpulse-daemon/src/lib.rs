//! Background sync worker: fixed-interval scheduler + status publishing.

mod error;
mod runtime;
pub mod scheduler;
pub mod status;

pub use error::DaemonError;
pub use runtime::start_blocking;
pub use scheduler::{SyncScheduler, DEFAULT_SYNC_PERIOD};
pub use status::{StatusBoard, StatusPublisher};
