//! Snapshot persistence
//!
//! Key/value table of JSON documents. The round list lives under one fixed
//! key; each round's entries live under a per-round key.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::RoundId;

/// Key holding the round snapshot
pub const ROUNDS_KEY: &str = "podium.rounds";

/// Prefix of the per-round entry snapshot keys
pub const ENTRIES_PREFIX: &str = "podium.entries.";

/// Key holding the entry snapshot of one round
pub fn entries_key(round_id: &RoundId) -> String {
    format!("{}{}", ENTRIES_PREFIX, round_id)
}

/// Snapshot store
pub struct SnapshotStore<'a> {
    conn: &'a Connection,
}

impl<'a> SnapshotStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Raw JSON stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Overwrite the document under `key`
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove the document under `key`; true if one existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM snapshots WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// All keys starting with `prefix`, sorted
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM snapshots WHERE substr(key, 1, ?2) = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix, prefix.len() as i64], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Decode the document under `key`
    #[instrument(skip(self))]
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`
    #[instrument(skip(self, value))]
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.put(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Round;
    use crate::storage::Database;

    #[test]
    fn test_snapshot_put_get() {
        let db = Database::open_in_memory().unwrap();
        let store = db.snapshots();

        store.put("k", "[1,2]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2]"));

        store.put("k", "[3]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[3]"));
    }

    #[test]
    fn test_snapshot_not_found() {
        let db = Database::open_in_memory().unwrap();
        let store = db.snapshots();

        assert!(store.get("missing").unwrap().is_none());
        assert!(store.load::<Vec<Round>>("missing").unwrap().is_none());
        assert!(!store.remove("missing").unwrap());
    }

    #[test]
    fn test_snapshot_corrupt_json_is_error() {
        let db = Database::open_in_memory().unwrap();
        let store = db.snapshots();

        store.put(ROUNDS_KEY, "{not json").unwrap();
        assert!(store.load::<Vec<Round>>(ROUNDS_KEY).is_err());
    }

    #[test]
    fn test_keys_with_prefix() {
        let db = Database::open_in_memory().unwrap();
        let store = db.snapshots();

        store.put(ROUNDS_KEY, "[]").unwrap();
        store.put(&entries_key(&RoundId::from("b")), "[]").unwrap();
        store.put(&entries_key(&RoundId::from("a")), "[]").unwrap();

        let keys = store.keys_with_prefix(ENTRIES_PREFIX).unwrap();
        assert_eq!(keys, vec!["podium.entries.a", "podium.entries.b"]);
    }
}
