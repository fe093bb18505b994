//! Line-oriented console front end
//!
//! Reads one command per line, runs it against the engine and prints the
//! resulting view. Bad input and rejected operations are reported, never
//! fatal.

use std::fmt::Write as _;
use std::io::Write;

use podium_core::{Dimension, EntryId, Judge, RoundId, Standing};
use podium_sync::{BoardState, SyncEngine};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  rounds                              list rounds
  round new <name>                    create a round and make it active
  round rename <id> <name>            rename a round
  round delete <id>                   delete a round and its entries
  round switch <id>                   make a round active
  entries                             list entries of the current round
  entry new <name>                    add an entry to the current round
  entry delete <id>                   delete an entry
  score <entry> <judge> <dim> <value> set one score (judge1-3, strategy|acquisition|private)
  rank                                show standings
  sync                                push every score to the remote store
  refresh                             re-check the remote connection
  status                              show connection state
  help                                show this help
  quit                                exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Rounds,
    RoundNew(String),
    RoundRename(RoundId, String),
    RoundDelete(RoundId),
    RoundSwitch(RoundId),
    Entries,
    EntryNew(String),
    EntryDelete(EntryId),
    Score {
        entry: EntryId,
        judge: Judge,
        dimension: Dimension,
        value: i64,
    },
    Rank,
    Sync,
    Refresh,
    Status,
    Help,
    Quit,
}

/// Words after the first `skip`, joined back with single spaces
fn rest(parts: &[&str], skip: usize) -> Option<String> {
    let words = parts.get(skip..)?;
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

/// Parse one input line. Blank lines yield `Ok(None)`; errors carry a
/// usage message.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(None);
    }

    let cmd = match (parts[0], parts.get(1).copied()) {
        ("rounds", _) => Command::Rounds,
        ("entries", _) => Command::Entries,
        ("rank", _) => Command::Rank,
        ("sync", _) => Command::Sync,
        ("refresh", _) => Command::Refresh,
        ("status", _) => Command::Status,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        ("round", Some("new")) => {
            Command::RoundNew(rest(&parts, 2).ok_or("Usage: round new <name>")?)
        }
        ("round", Some("rename")) => match (parts.get(2), rest(&parts, 3)) {
            (Some(id), Some(name)) => Command::RoundRename(RoundId::from(*id), name),
            _ => return Err("Usage: round rename <id> <name>".to_string()),
        },
        ("round", Some("delete")) => match parts.get(2) {
            Some(id) => Command::RoundDelete(RoundId::from(*id)),
            None => return Err("Usage: round delete <id>".to_string()),
        },
        ("round", Some("switch")) => match parts.get(2) {
            Some(id) => Command::RoundSwitch(RoundId::from(*id)),
            None => return Err("Usage: round switch <id>".to_string()),
        },
        ("entry", Some("new")) => {
            Command::EntryNew(rest(&parts, 2).ok_or("Usage: entry new <name>")?)
        }
        ("entry", Some("delete")) => match parts.get(2) {
            Some(id) => Command::EntryDelete(EntryId::from(*id)),
            None => return Err("Usage: entry delete <id>".to_string()),
        },
        ("score", _) => {
            if parts.len() != 5 {
                return Err("Usage: score <entry> <judge> <dimension> <value>".to_string());
            }
            let judge = parts[2].parse::<Judge>()?;
            let dimension = parts[3].parse::<Dimension>()?;
            let value = parts[4]
                .parse::<i64>()
                .map_err(|_| format!("Invalid score '{}'", parts[4]))?;
            Command::Score {
                entry: EntryId::from(parts[1]),
                judge,
                dimension,
                value,
            }
        }
        (other, _) => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };

    Ok(Some(cmd))
}

pub fn render_rounds(state: &BoardState) -> String {
    if state.rounds.is_empty() {
        return "No rounds yet.".to_string();
    }
    let mut out = String::new();
    for round in &state.rounds {
        let marker = if state.current_round.as_ref() == Some(&round.id) {
            '>'
        } else {
            ' '
        };
        let active = if round.is_active { " (active)" } else { "" };
        let _ = writeln!(
            out,
            "{} {}  {}{}  {}",
            marker,
            round.id,
            round.name,
            active,
            round.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    out.trim_end().to_string()
}

pub fn render_entries(state: &BoardState) -> String {
    let Some(round) = state.active_round() else {
        return "No round selected.".to_string();
    };
    if state.entries.is_empty() {
        return format!("{}: no entries.", round.name);
    }
    let mut out = format!("{}:\n", round.name);
    for entry in &state.entries {
        let cells: Vec<String> = Dimension::ALL
            .iter()
            .map(|d| format!("{}={}", d.key(), entry.scores.get(d.judge(), *d)))
            .collect();
        let _ = writeln!(out, "  {}  {}  {}", entry.id, entry.name, cells.join(" "));
    }
    out.trim_end().to_string()
}

pub fn render_standings(standings: &[Standing<'_>]) -> String {
    if standings.is_empty() {
        return "No entries to rank.".to_string();
    }
    let mut out = String::new();
    for standing in standings {
        let _ = writeln!(
            out,
            "{:>2}. {:<24} {:>3}",
            standing.position, standing.entry.name, standing.total
        );
    }
    out.trim_end().to_string()
}

pub fn render_status(state: &BoardState) -> String {
    let connection = if state.is_online { "online" } else { "offline" };
    let round = state
        .active_round()
        .map(|r| r.name.as_str())
        .unwrap_or("none");
    format!(
        "Remote: {}. Current round: {}. Rounds: {}, entries: {}.",
        connection,
        round,
        state.rounds.len(),
        state.entries.len()
    )
}

/// Run one command and describe the outcome
pub async fn execute(engine: &mut SyncEngine, cmd: Command) -> String {
    let outcome = match cmd {
        Command::Rounds => Ok(render_rounds(engine.state())),
        Command::Entries => Ok(render_entries(engine.state())),
        Command::Rank => Ok(render_standings(&engine.standings())),
        Command::Status => Ok(render_status(engine.state())),
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
        Command::RoundNew(name) => engine
            .create_round(&name)
            .await
            .map(|r| format!("Created round {} ({}).", r.name, r.id)),
        Command::RoundRename(id, name) => engine
            .rename_round(&id, &name)
            .map(|()| format!("Renamed round {}.", id)),
        Command::RoundDelete(id) => engine
            .delete_round(&id)
            .map(|()| format!("Deleted round {}.", id)),
        Command::RoundSwitch(id) => engine
            .switch_active_round(&id)
            .await
            .map(|()| render_entries(engine.state())),
        Command::EntryNew(name) => engine
            .create_entry(&name)
            .await
            .map(|e| format!("Added {} ({}).", e.name, e.id)),
        Command::EntryDelete(id) => engine
            .delete_entry(&id)
            .map(|()| format!("Deleted entry {}.", id)),
        Command::Score {
            entry,
            judge,
            dimension,
            value,
        } => engine
            .update_score(&entry, judge, dimension, value)
            .map(|stored| format!("{} {} = {}", judge, dimension.display_name(), stored)),
        Command::Sync => Ok(match engine.sync_all().await {
            Some(report) => format!(
                "Synced {} entries, {} failed.",
                report.attempted, report.failed
            ),
            None => "Nothing to sync (offline or no round selected).".to_string(),
        }),
        Command::Refresh => {
            let online = engine.refresh_connectivity().await;
            Ok(if online { "Online." } else { "Offline." }.to_string())
        }
    };

    outcome.unwrap_or_else(|e| format!("Error: {}", e))
}

/// Read commands until end of input or `quit`, then wait for queued
/// remote writes
pub async fn run<R, W>(engine: &mut SyncEngine, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", render_status(engine.state()))?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => execute(engine, cmd).await,
            Err(usage) => usage,
        };
        writeln!(out, "{}", reply)?;
        out.flush()?;
    }

    engine.flush().await;
    Ok(())
}
