//! Podium Sync Library
//!
//! Dual-write synchronization between the local snapshot store and the
//! remote mirror.
//!
//! Every mutation commits to the local store unconditionally. When the
//! remote store was reachable at the last probe, the same mutation is also
//! queued for the remote mirror. Remote failures are logged and dropped;
//! the local store stays authoritative.

mod engine;
pub mod error;
mod mirror;
pub mod state;

pub use engine::SyncEngine;
pub use error::{Result, SyncError};
pub use mirror::SyncReport;
pub use state::BoardState;
