//! Synchronization engine
//!
//! Every operation follows the same shape: optionally mirror to the remote
//! store (only when the last probe succeeded), commit to the local store
//! unconditionally, then publish the new board state.

use std::sync::Arc;

use podium_core::{
    activate_exclusive, clamp_score, Dimension, Entry, EntryId, Judge, LocalStore, Round,
    RoundId, Scores, Standing,
};
use podium_net::{probe, RemoteStore};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::{normalize_name, Result, SyncError};
use crate::mirror::{Mirror, SyncReport};
use crate::state::BoardState;

/// Keep only the first active flag (collections are newest first)
fn normalize_active(rounds: &mut [Round]) {
    if let Some(id) = rounds.iter().find(|r| r.is_active).map(|r| r.id.clone()) {
        activate_exclusive(rounds, &id);
    }
}

/// Remote rows plus the local-only records the remote store has never seen
fn with_local_only<T>(
    mut remote: Vec<T>,
    local: Vec<T>,
    is_local: impl Fn(&T) -> bool,
) -> Vec<T> {
    remote.extend(local.into_iter().filter(|item| is_local(item)));
    remote
}

/// Active round, or the first one if none is flagged
fn pick_current(rounds: &[Round]) -> Option<RoundId> {
    rounds
        .iter()
        .find(|r| r.is_active)
        .or_else(|| rounds.first())
        .map(|r| r.id.clone())
}

/// Owns the board state and drives both stores
pub struct SyncEngine {
    local: Box<dyn LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    mirror: Option<Mirror>,
    state: BoardState,
    publisher: watch::Sender<BoardState>,
}

impl SyncEngine {
    /// Create an engine. Must be called inside a tokio runtime when a
    /// remote store is given.
    pub fn new(local: Box<dyn LocalStore>, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        let mirror = remote.clone().map(Mirror::spawn);
        let (publisher, _) = watch::channel(BoardState::default());

        Self {
            local,
            remote,
            mirror,
            state: BoardState::default(),
            publisher,
        }
    }

    /// Engine with no remote store; always local-only
    pub fn local_only(local: Box<dyn LocalStore>) -> Self {
        Self::new(local, None)
    }

    /// Receive every published state change
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online
    }

    /// Current entries ranked by total score
    pub fn standings(&self) -> Vec<Standing<'_>> {
        self.state.standings()
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    /// Mirror handle, only while the last probe said online
    fn mirror(&self) -> Option<&Mirror> {
        if self.state.is_online {
            self.mirror.as_ref()
        } else {
            None
        }
    }

    fn commit_rounds(&self) {
        self.local.save_rounds(&self.state.rounds);
    }

    fn commit_entries(&self) {
        if let Some(round_id) = &self.state.current_round {
            self.local.save_entries(round_id, &self.state.entries);
        }
    }

    /// Wait until every queued remote write has been attempted
    pub async fn flush(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.flush().await;
        }
    }

    /// Probe the remote store and cache the result
    #[instrument(skip(self))]
    pub async fn refresh_connectivity(&mut self) -> bool {
        let online = probe(self.remote.as_deref()).await;
        if online != self.state.is_online {
            info!(online, "Connectivity changed");
        }
        self.state.is_online = online;
        self.publish();
        online
    }

    /// Load the board: from the remote store when reachable, otherwise (or
    /// when the remote read fails) from the local store.
    #[instrument(skip(self))]
    pub async fn start(&mut self) {
        if self.refresh_connectivity().await {
            if let Some(remote) = self.remote.clone() {
                match self.hydrate(remote.as_ref()).await {
                    Ok(()) => {
                        self.publish();
                        return;
                    }
                    Err(e) => warn!(error = %e, "Failed to load remote board, using local data"),
                }
            }
        }

        self.load_local();
        self.publish();
    }

    /// Replace the local snapshot with the remote one, keeping records that
    /// only exist locally
    async fn hydrate(&mut self, remote: &dyn RemoteStore) -> podium_net::Result<()> {
        let mut rounds = with_local_only(
            remote.list_rounds().await?,
            self.local.load_rounds(),
            |r: &Round| r.id.is_local(),
        );
        rounds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        normalize_active(&mut rounds);

        let current = pick_current(&rounds);
        let entries = match &current {
            Some(round_id) if round_id.is_local() => self.local.load_entries(round_id),
            Some(round_id) => {
                let fetched = remote.list_entries(round_id).await?;
                self.with_local_entries(round_id, fetched)
            }
            None => Vec::new(),
        };

        self.local.save_rounds(&rounds);
        if let Some(round_id) = &current {
            self.local.save_entries(round_id, &entries);
        }
        let keep: Vec<RoundId> = rounds.iter().map(|r| r.id.clone()).collect();
        let pruned = self.local.prune_entries(&keep);

        info!(
            rounds = rounds.len(),
            entries = entries.len(),
            pruned,
            "Loaded board from remote store"
        );

        self.state.rounds = rounds;
        self.state.current_round = current;
        self.state.entries = entries;
        Ok(())
    }

    /// Fetched remote entries plus the round's local-only entries
    fn with_local_entries(&self, round_id: &RoundId, fetched: Vec<Entry>) -> Vec<Entry> {
        with_local_only(fetched, self.local.load_entries(round_id), |e: &Entry| {
            e.id.is_local()
        })
    }

    fn load_local(&mut self) {
        let mut rounds = self.local.load_rounds();
        normalize_active(&mut rounds);

        let current = pick_current(&rounds);
        let entries = current
            .as_ref()
            .map(|id| self.local.load_entries(id))
            .unwrap_or_default();

        info!(
            rounds = rounds.len(),
            entries = entries.len(),
            "Loaded board from local store"
        );

        self.state.rounds = rounds;
        self.state.current_round = current;
        self.state.entries = entries;
    }

    /// Create a round, make it the only active one and select it
    #[instrument(skip(self))]
    pub async fn create_round(&mut self, name: &str) -> Result<Round> {
        let name = normalize_name(name)?;
        let mut round = Round::new(name.clone());

        // Optimistic view keyed on the placeholder id
        activate_exclusive(&mut self.state.rounds, &round.id);
        self.state.rounds.insert(0, round.clone());
        self.state.current_round = Some(round.id.clone());
        self.state.entries.clear();
        self.publish();

        let created = match self.mirror() {
            Some(mirror) => Some(mirror.create_round(&name).await),
            None => None,
        };
        match created {
            Some(Ok(remote)) => {
                self.state.rewrite_round_id(&round.id, &remote.id);
                round.id = remote.id;
            }
            Some(Err(e)) => {
                warn!(round_id = %round.id, error = %e, "Remote round create failed, keeping local id");
            }
            None => debug!(round_id = %round.id, "Offline, round kept local"),
        }

        self.commit_rounds();
        self.local.save_entries(&round.id, &[]);
        self.publish();
        Ok(round)
    }

    #[instrument(skip(self))]
    pub fn rename_round(&mut self, id: &RoundId, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let round = self
            .state
            .rounds
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| SyncError::UnknownRound(id.clone()))?;
        round.name = name.clone();

        if let Some(mirror) = self.mirror() {
            mirror.rename_round(id, &name);
        }

        self.commit_rounds();
        self.publish();
        Ok(())
    }

    /// Delete a round and every entry it owns
    #[instrument(skip(self))]
    pub fn delete_round(&mut self, id: &RoundId) -> Result<()> {
        let index = self
            .state
            .rounds
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| SyncError::UnknownRound(id.clone()))?;

        if let Some(mirror) = self.mirror() {
            mirror.delete_round(id);
        }

        self.state.rounds.remove(index);
        self.commit_rounds();
        self.local.remove_entries(id);

        if self.state.current_round.as_ref() == Some(id) {
            let next = self.state.rounds.first().map(|r| r.id.clone());
            self.state.entries = next
                .as_ref()
                .map(|next| self.local.load_entries(next))
                .unwrap_or_default();
            self.state.current_round = next;
        }

        self.publish();
        Ok(())
    }

    /// Make `id` the only active round and load its entries
    #[instrument(skip(self))]
    pub async fn switch_active_round(&mut self, id: &RoundId) -> Result<()> {
        if self.state.round(id).is_none() {
            return Err(SyncError::UnknownRound(id.clone()));
        }

        // A local-only round is unknown to the remote store
        let fetched = match self.mirror() {
            Some(mirror) if !id.is_local() => {
                mirror.set_active_round(id);
                Some(mirror.list_entries(id).await)
            }
            _ => None,
        };
        let entries = match fetched {
            Some(Ok(fetched)) => {
                let entries = self.with_local_entries(id, fetched);
                self.local.save_entries(id, &entries);
                entries
            }
            Some(Err(e)) => {
                warn!(round_id = %id, error = %e, "Failed to fetch remote entries, using local data");
                self.local.load_entries(id)
            }
            None => self.local.load_entries(id),
        };

        activate_exclusive(&mut self.state.rounds, id);
        self.state.current_round = Some(id.clone());
        self.state.entries = entries;

        self.commit_rounds();
        self.publish();
        Ok(())
    }

    /// Add an entry with all-zero scores to the current round
    #[instrument(skip(self))]
    pub async fn create_entry(&mut self, name: &str) -> Result<Entry> {
        let name = normalize_name(name)?;
        let round_id = self
            .state
            .current_round
            .clone()
            .ok_or(SyncError::NoActiveRound)?;
        let mut entry = Entry::new(round_id.clone(), name.clone());

        self.state.entries.push(entry.clone());
        self.publish();

        let created = match self.mirror() {
            Some(mirror) => Some(mirror.create_entry(&round_id, &name).await),
            None => None,
        };
        match created {
            Some(Ok(remote)) => {
                self.state.rewrite_entry_id(&entry.id, &remote.id);
                entry.id = remote.id;
            }
            Some(Err(e)) => {
                warn!(entry_id = %entry.id, error = %e, "Remote entry create failed, keeping local id");
            }
            None => debug!(entry_id = %entry.id, "Offline, entry kept local"),
        }

        self.commit_entries();
        self.publish();
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub fn delete_entry(&mut self, id: &EntryId) -> Result<()> {
        let index = self
            .state
            .entries
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| SyncError::UnknownEntry(id.clone()))?;

        if let Some(mirror) = self.mirror() {
            mirror.delete_entry(id);
        }

        self.state.entries.remove(index);
        self.commit_entries();
        self.publish();
        Ok(())
    }

    /// Set one score cell. The value is clamped into [0, 100] and the
    /// stored value is returned. The remote push is not awaited.
    #[instrument(skip(self))]
    pub fn update_score(
        &mut self,
        entry_id: &EntryId,
        judge: Judge,
        dimension: Dimension,
        value: i64,
    ) -> Result<u8> {
        let value = clamp_score(value);
        let entry = self
            .state
            .entries
            .iter_mut()
            .find(|e| e.id == *entry_id)
            .ok_or_else(|| SyncError::UnknownEntry(entry_id.clone()))?;
        entry.scores.set(judge, dimension, value);
        let scores = entry.scores;

        if let Some(mirror) = self.mirror() {
            mirror.update_scores(entry_id, scores);
        }

        self.commit_entries();
        self.publish();
        Ok(value)
    }

    /// Push every loaded entry's score matrix to the remote store.
    ///
    /// Returns `None` when offline or when no round is selected.
    #[instrument(skip(self))]
    pub async fn sync_all(&mut self) -> Option<SyncReport> {
        if self.state.current_round.is_none() {
            debug!("No round selected, nothing to sync");
            return None;
        }
        if self.mirror().is_none() {
            debug!("Offline, skipping sync");
            return None;
        }

        let batch: Vec<(EntryId, Scores)> = self
            .state
            .entries
            .iter()
            .map(|e| (e.id.clone(), e.scores))
            .collect();

        self.state.is_syncing = true;
        self.publish();

        let report = match self.mirror() {
            Some(mirror) => mirror.resync(batch).await,
            None => SyncReport::default(),
        };

        info!(
            attempted = report.attempted,
            failed = report.failed,
            "Manual sync finished"
        );
        self.state.is_syncing = false;
        self.publish();
        Some(report)
    }
}
