//! Remote mirror worker
//!
//! All remote calls run on one background task fed by an unbounded channel,
//! so they reach the remote store in the order the engine issued them.
//! Mutations are fire-and-forget. Creates and reads carry a reply channel.

use std::sync::Arc;

use podium_core::{Entry, EntryId, Round, RoundId, Scores};
use podium_net::{RemoteError, RemoteStore};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Outcome of a manual resync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries a push was attempted for
    pub attempted: usize,
    /// Pushes that failed
    pub failed: usize,
}

type Reply<T> = oneshot::Sender<podium_net::Result<T>>;

enum MirrorCommand {
    CreateRound {
        name: String,
        reply: Reply<Round>,
    },
    SetActiveRound(RoundId),
    RenameRound {
        id: RoundId,
        name: String,
    },
    /// Entries first, then the round record
    DeleteRound(RoundId),
    ListEntries {
        round_id: RoundId,
        reply: Reply<Vec<Entry>>,
    },
    CreateEntry {
        round_id: RoundId,
        name: String,
        reply: Reply<Entry>,
    },
    UpdateScores {
        id: EntryId,
        scores: Scores,
    },
    DeleteEntry(EntryId),
    Resync {
        batch: Vec<(EntryId, Scores)>,
        reply: oneshot::Sender<SyncReport>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the mirror worker
pub(crate) struct Mirror {
    cmd_tx: mpsc::UnboundedSender<MirrorCommand>,
}

impl Mirror {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(remote: Arc<dyn RemoteStore>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(mirror_task(remote, cmd_rx));
        Self { cmd_tx }
    }

    fn enqueue(&self, cmd: MirrorCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("Mirror worker stopped, dropping remote write");
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> MirrorCommand,
    ) -> podium_net::Result<T> {
        let (reply, rx) = oneshot::channel();
        self.enqueue(build(reply));
        rx.await.unwrap_or(Err(RemoteError::Unavailable))
    }

    pub async fn create_round(&self, name: &str) -> podium_net::Result<Round> {
        let name = name.to_string();
        self.request(|reply| MirrorCommand::CreateRound { name, reply })
            .await
    }

    pub async fn create_entry(&self, round_id: &RoundId, name: &str) -> podium_net::Result<Entry> {
        let round_id = round_id.clone();
        let name = name.to_string();
        self.request(|reply| MirrorCommand::CreateEntry {
            round_id,
            name,
            reply,
        })
        .await
    }

    pub async fn list_entries(&self, round_id: &RoundId) -> podium_net::Result<Vec<Entry>> {
        let round_id = round_id.clone();
        self.request(|reply| MirrorCommand::ListEntries { round_id, reply })
            .await
    }

    pub fn set_active_round(&self, id: &RoundId) {
        self.enqueue(MirrorCommand::SetActiveRound(id.clone()));
    }

    pub fn rename_round(&self, id: &RoundId, name: &str) {
        self.enqueue(MirrorCommand::RenameRound {
            id: id.clone(),
            name: name.to_string(),
        });
    }

    pub fn delete_round(&self, id: &RoundId) {
        self.enqueue(MirrorCommand::DeleteRound(id.clone()));
    }

    pub fn update_scores(&self, id: &EntryId, scores: Scores) {
        self.enqueue(MirrorCommand::UpdateScores {
            id: id.clone(),
            scores,
        });
    }

    pub fn delete_entry(&self, id: &EntryId) {
        self.enqueue(MirrorCommand::DeleteEntry(id.clone()));
    }

    /// Push every matrix in `batch` once, in order
    pub async fn resync(&self, batch: Vec<(EntryId, Scores)>) -> SyncReport {
        let total = batch.len();
        let (reply, rx) = oneshot::channel();
        self.enqueue(MirrorCommand::Resync { batch, reply });
        rx.await.unwrap_or(SyncReport {
            attempted: 0,
            failed: total,
        })
    }

    /// Wait until everything queued so far has been applied
    pub async fn flush(&self) {
        let (reply, rx) = oneshot::channel();
        self.enqueue(MirrorCommand::Flush(reply));
        let _ = rx.await;
    }
}

/// Log a failed fire-and-forget write
fn log_failure(op: &'static str, result: podium_net::Result<()>) {
    if let Err(e) = result {
        warn!(op, error = %e, "Remote mirror write failed, local state kept");
    }
}

async fn mirror_task(
    remote: Arc<dyn RemoteStore>,
    mut cmd_rx: mpsc::UnboundedReceiver<MirrorCommand>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            MirrorCommand::CreateRound { name, reply } => {
                let _ = reply.send(remote.create_round(&name).await);
            }
            MirrorCommand::SetActiveRound(id) => {
                log_failure("set_active_round", remote.set_active_round(&id).await);
            }
            MirrorCommand::RenameRound { id, name } => {
                log_failure("rename_round", remote.rename_round(&id, &name).await);
            }
            MirrorCommand::DeleteRound(id) => {
                log_failure(
                    "delete_entries_for_round",
                    remote.delete_entries_for_round(&id).await,
                );
                log_failure("delete_round", remote.delete_round(&id).await);
            }
            MirrorCommand::ListEntries { round_id, reply } => {
                let _ = reply.send(remote.list_entries(&round_id).await);
            }
            MirrorCommand::CreateEntry {
                round_id,
                name,
                reply,
            } => {
                let _ = reply.send(remote.create_entry(&round_id, &name).await);
            }
            MirrorCommand::UpdateScores { id, scores } => {
                log_failure(
                    "update_entry_scores",
                    remote.update_entry_scores(&id, &scores).await,
                );
            }
            MirrorCommand::DeleteEntry(id) => {
                log_failure("delete_entry", remote.delete_entry(&id).await);
            }
            MirrorCommand::Resync { batch, reply } => {
                let mut report = SyncReport::default();
                for (id, scores) in batch {
                    report.attempted += 1;
                    if let Err(e) = remote.update_entry_scores(&id, &scores).await {
                        warn!(entry_id = %id, error = %e, "Resync push failed");
                        report.failed += 1;
                    }
                }
                debug!(
                    attempted = report.attempted,
                    failed = report.failed,
                    "Resync complete"
                );
                let _ = reply.send(report);
            }
            MirrorCommand::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }

    debug!("Mirror worker shutting down");
}
