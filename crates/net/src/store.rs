//! Remote store contract

use async_trait::async_trait;
use podium_core::{Entry, EntryId, Round, RoundId, Scores};

use crate::error::Result;

/// CRUD against the hosted rounds/entries tables.
///
/// Every call is a single attempt: no retries, no partial success.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Minimal read used to decide reachability
    async fn ping(&self) -> Result<()>;

    /// All rounds, newest first
    async fn list_rounds(&self) -> Result<Vec<Round>>;

    /// Insert an active round after clearing every other active flag
    async fn create_round(&self, name: &str) -> Result<Round>;

    /// Clear every active flag, then set it on `id`
    async fn set_active_round(&self, id: &RoundId) -> Result<()>;

    async fn rename_round(&self, id: &RoundId, name: &str) -> Result<()>;

    /// Remove the round record only; entries are not touched
    async fn delete_round(&self, id: &RoundId) -> Result<()>;

    async fn list_entries(&self, round_id: &RoundId) -> Result<Vec<Entry>>;

    /// Insert an entry with the all-zero score matrix
    async fn create_entry(&self, round_id: &RoundId, name: &str) -> Result<Entry>;

    /// Replace the full score matrix of an entry
    async fn update_entry_scores(&self, id: &EntryId, scores: &Scores) -> Result<()>;

    async fn delete_entry(&self, id: &EntryId) -> Result<()>;

    /// Remove every entry owned by a round
    async fn delete_entries_for_round(&self, round_id: &RoundId) -> Result<()>;
}
