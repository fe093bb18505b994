//! SQLite storage layer for Podium

mod migrations;
mod snapshots;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::{error, instrument, warn};

use crate::error::Result;
use crate::invariants::{assert_entry_invariants, assert_round_invariants};
use crate::models::{Entry, Round, RoundId};

pub use snapshots::{entries_key, SnapshotStore, ENTRIES_PREFIX, ROUNDS_KEY};
pub use traits::LocalStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::current_version(&self.conn)
    }

    /// Get the snapshot store
    pub fn snapshots(&self) -> SnapshotStore<'_> {
        SnapshotStore::new(&self.conn)
    }

    /// Round ids that currently have an entry snapshot
    pub fn entry_round_ids(&self) -> Result<Vec<RoundId>> {
        let keys = self.snapshots().keys_with_prefix(ENTRIES_PREFIX)?;
        Ok(keys
            .into_iter()
            .map(|k| RoundId(k[ENTRIES_PREFIX.len()..].to_string()))
            .collect())
    }

    /// Load a snapshot, treating unreadable data as absent
    fn load_or_empty<T>(&self, key: &str) -> Vec<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.snapshots().load::<Vec<T>>(key) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "Unreadable snapshot, treating as empty");
                Vec::new()
            }
        }
    }
}

impl LocalStore for Database {
    fn load_rounds(&self) -> Vec<Round> {
        self.load_or_empty(ROUNDS_KEY)
    }

    fn save_rounds(&self, rounds: &[Round]) {
        assert_round_invariants(rounds);
        if let Err(e) = self.snapshots().save(ROUNDS_KEY, rounds) {
            error!(error = %e, "Failed to persist rounds");
        }
    }

    fn load_entries(&self, round_id: &RoundId) -> Vec<Entry> {
        self.load_or_empty(&entries_key(round_id))
    }

    fn save_entries(&self, round_id: &RoundId, entries: &[Entry]) {
        assert_entry_invariants(round_id, entries);
        if let Err(e) = self.snapshots().save(&entries_key(round_id), entries) {
            error!(round_id = %round_id, error = %e, "Failed to persist entries");
        }
    }

    fn remove_entries(&self, round_id: &RoundId) {
        if let Err(e) = self.snapshots().remove(&entries_key(round_id)) {
            error!(round_id = %round_id, error = %e, "Failed to remove entries");
        }
    }

    fn prune_entries(&self, keep: &[RoundId]) -> usize {
        let stored = match self.entry_round_ids() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Failed to list entry snapshots");
                return 0;
            }
        };

        let mut removed = 0;
        // Placeholder rounds never reached the remote store; their data stays
        for round_id in stored
            .iter()
            .filter(|id| !id.is_local() && !keep.contains(id))
        {
            self.remove_entries(round_id);
            removed += 1;
        }
        removed
    }
}
