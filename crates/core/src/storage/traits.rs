//! Local store interface
//!
//! The engine only talks to the local store through this trait. Every
//! operation is infallible from the caller's point of view: unreadable data
//! is reported as absent and failed writes are logged.

use crate::models::{Entry, Round, RoundId};

pub trait LocalStore: Send {
    /// Persisted rounds, or empty if none
    fn load_rounds(&self) -> Vec<Round>;

    /// Overwrite the round snapshot
    fn save_rounds(&self, rounds: &[Round]);

    /// Persisted entries of a round, or empty if none
    fn load_entries(&self, round_id: &RoundId) -> Vec<Entry>;

    /// Overwrite the entry snapshot of a round
    fn save_entries(&self, round_id: &RoundId, entries: &[Entry]);

    /// Drop the entry snapshot of a round
    fn remove_entries(&self, round_id: &RoundId);

    /// Drop entry snapshots of rounds not in `keep`, except local-only
    /// rounds; returns how many were removed
    fn prune_entries(&self, keep: &[RoundId]) -> usize;
}
