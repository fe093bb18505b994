//! Podium Core Library
//!
//! Scoring model, ranking, invariant guards and the local snapshot store
//! for the Podium judging board.

pub mod error;
pub mod invariants;
pub mod models;
pub mod ranking;
pub mod storage;

pub use error::{Error, Result};
pub use models::*;
pub use ranking::{dimension_score, leader, rank, total_score, Standing};
pub use storage::{Database, LocalStore, SnapshotStore};
