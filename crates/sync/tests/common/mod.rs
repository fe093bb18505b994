//! In-process remote store used by the engine tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use podium_core::{Database, Entry, EntryId, Round, RoundId, Scores};
use podium_net::{RemoteError, RemoteStore, Result};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ping,
    ListRounds,
    CreateRound(String),
    SetActiveRound(RoundId),
    RenameRound(RoundId, String),
    DeleteRound(RoundId),
    ListEntries(RoundId),
    CreateEntry(RoundId, String),
    UpdateScores(EntryId, Scores),
    DeleteEntry(EntryId),
    DeleteEntriesForRound(RoundId),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    reachable: bool,
    fail_every: Option<usize>,
    fail_counter: usize,
    fail_list_rounds: bool,
    fail_creates: bool,
    next_id: usize,
    rounds: Vec<Round>,
    entries: Vec<Entry>,
}

/// Records every call and keeps rows in memory
pub struct FakeRemote {
    inner: Mutex<Inner>,
}

impl FakeRemote {
    pub fn reachable() -> Self {
        Self {
            inner: Mutex::new(Inner {
                reachable: true,
                ..Default::default()
            }),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.inner.lock().unwrap().reachable = reachable;
    }

    /// Fail every `n`th call from now on (ping excluded)
    pub fn fail_every_nth(&self, n: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_every = Some(n);
        inner.fail_counter = 0;
    }

    pub fn fail_list_rounds(&self) {
        self.inner.lock().unwrap().fail_list_rounds = true;
    }

    pub fn fail_creates(&self) {
        self.inner.lock().unwrap().fail_creates = true;
    }

    pub fn seed_round(&self, id: &str, name: &str, is_active: bool) {
        self.inner.lock().unwrap().rounds.push(Round {
            id: RoundId::from(id),
            name: name.to_string(),
            created_at: Utc::now(),
            is_active,
        });
    }

    pub fn seed_entry(&self, id: &str, round_id: &str, name: &str, scores: Scores) {
        self.inner.lock().unwrap().entries.push(Entry {
            id: EntryId::from(id),
            round_id: RoundId::from(round_id),
            name: name.to_string(),
            scores,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Calls other than the connectivity probe
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Ping))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn rounds(&self) -> Vec<Round> {
        self.inner.lock().unwrap().rounds.clone()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.inner.lock().unwrap().entries.clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let is_ping = matches!(call, Call::Ping);
        inner.calls.push(call);

        if !inner.reachable {
            return Err(RemoteError::Unavailable);
        }
        if is_ping {
            return Ok(());
        }
        if let Some(n) = inner.fail_every {
            inner.fail_counter += 1;
            if inner.fail_counter % n == 0 {
                return Err(RemoteError::Status {
                    status: 503,
                    body: "injected".to_string(),
                });
            }
        }
        Ok(())
    }

    fn mint(&self, prefix: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        format!("remote-{}{}", prefix, inner.next_id)
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn ping(&self) -> Result<()> {
        self.record(Call::Ping)
    }

    async fn list_rounds(&self) -> Result<Vec<Round>> {
        self.record(Call::ListRounds)?;
        let inner = self.inner.lock().unwrap();
        if inner.fail_list_rounds {
            return Err(RemoteError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        let mut rounds = inner.rounds.clone();
        rounds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rounds)
    }

    async fn create_round(&self, name: &str) -> Result<Round> {
        self.record(Call::CreateRound(name.to_string()))?;
        if self.inner.lock().unwrap().fail_creates {
            return Err(RemoteError::EmptyResponse);
        }
        let round = Round {
            id: RoundId(self.mint("r")),
            name: name.to_string(),
            created_at: Utc::now(),
            is_active: true,
        };
        let mut inner = self.inner.lock().unwrap();
        for r in inner.rounds.iter_mut() {
            r.is_active = false;
        }
        inner.rounds.push(round.clone());
        Ok(round)
    }

    async fn set_active_round(&self, id: &RoundId) -> Result<()> {
        self.record(Call::SetActiveRound(id.clone()))?;
        let mut inner = self.inner.lock().unwrap();
        for r in inner.rounds.iter_mut() {
            r.is_active = r.id == *id;
        }
        Ok(())
    }

    async fn rename_round(&self, id: &RoundId, name: &str) -> Result<()> {
        self.record(Call::RenameRound(id.clone(), name.to_string()))?;
        let mut inner = self.inner.lock().unwrap();
        for r in inner.rounds.iter_mut().filter(|r| r.id == *id) {
            r.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_round(&self, id: &RoundId) -> Result<()> {
        self.record(Call::DeleteRound(id.clone()))?;
        self.inner.lock().unwrap().rounds.retain(|r| r.id != *id);
        Ok(())
    }

    async fn list_entries(&self, round_id: &RoundId) -> Result<Vec<Entry>> {
        self.record(Call::ListEntries(round_id.clone()))?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.round_id == *round_id)
            .cloned()
            .collect())
    }

    async fn create_entry(&self, round_id: &RoundId, name: &str) -> Result<Entry> {
        self.record(Call::CreateEntry(round_id.clone(), name.to_string()))?;
        if self.inner.lock().unwrap().fail_creates {
            return Err(RemoteError::EmptyResponse);
        }
        let entry = Entry::new(round_id.clone(), name.to_string());
        let entry = Entry {
            id: EntryId(self.mint("e")),
            ..entry
        };
        self.inner.lock().unwrap().entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry_scores(&self, id: &EntryId, scores: &Scores) -> Result<()> {
        self.record(Call::UpdateScores(id.clone(), *scores))?;
        let mut inner = self.inner.lock().unwrap();
        for e in inner.entries.iter_mut().filter(|e| e.id == *id) {
            e.scores = *scores;
        }
        Ok(())
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.record(Call::DeleteEntry(id.clone()))?;
        self.inner.lock().unwrap().entries.retain(|e| e.id != *id);
        Ok(())
    }

    async fn delete_entries_for_round(&self, round_id: &RoundId) -> Result<()> {
        self.record(Call::DeleteEntriesForRound(round_id.clone()))?;
        self.inner
            .lock()
            .unwrap()
            .entries
            .retain(|e| e.round_id != *round_id);
        Ok(())
    }
}

/// On-disk database in a fresh temp dir; keep the dir alive for the test
pub fn temp_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("podium.db");
    Database::open(&path).unwrap();
    (dir, path)
}

pub fn open_db(path: &std::path::Path) -> Box<Database> {
    Box::new(Database::open(path).unwrap())
}
