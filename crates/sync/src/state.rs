//! Observable board state
//!
//! One value owned by the engine and republished after every change.

use podium_core::{rank, Entry, EntryId, Round, RoundId, Standing};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// All rounds, newest first
    pub rounds: Vec<Round>,
    /// Round whose entries are loaded
    pub current_round: Option<RoundId>,
    /// Entries of the current round
    pub entries: Vec<Entry>,
    /// Reachability at the last probe
    pub is_online: bool,
    /// True while a manual resync is running
    pub is_syncing: bool,
}

impl BoardState {
    pub fn round(&self, id: &RoundId) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == *id)
    }

    pub fn active_round(&self) -> Option<&Round> {
        self.current_round.as_ref().and_then(|id| self.round(id))
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    /// Current entries ranked by total score
    pub fn standings(&self) -> Vec<Standing<'_>> {
        rank(&self.entries)
    }

    /// Replace a placeholder round id everywhere it is referenced
    pub(crate) fn rewrite_round_id(&mut self, old: &RoundId, new: &RoundId) {
        for round in self.rounds.iter_mut().filter(|r| r.id == *old) {
            round.id = new.clone();
        }
        if self.current_round.as_ref() == Some(old) {
            self.current_round = Some(new.clone());
        }
        for entry in self.entries.iter_mut().filter(|e| e.round_id == *old) {
            entry.round_id = new.clone();
        }
    }

    /// Replace a placeholder entry id
    pub(crate) fn rewrite_entry_id(&mut self, old: &EntryId, new: &EntryId) {
        for entry in self.entries.iter_mut().filter(|e| e.id == *old) {
            entry.id = new.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_round_id() {
        let round = Round::new("Week 1".to_string());
        let old = round.id.clone();
        let mut state = BoardState {
            rounds: vec![round],
            current_round: Some(old.clone()),
            entries: vec![Entry::new(old.clone(), "Acme".to_string())],
            ..Default::default()
        };

        let new = RoundId::from("srv-1");
        state.rewrite_round_id(&old, &new);

        assert_eq!(state.rounds[0].id, new);
        assert_eq!(state.current_round, Some(new.clone()));
        assert_eq!(state.entries[0].round_id, new);
        assert_eq!(state.active_round().unwrap().name, "Week 1");
    }

    #[test]
    fn test_rewrite_entry_id() {
        let entry = Entry::new(RoundId::from("r1"), "Acme".to_string());
        let old = entry.id.clone();
        let mut state = BoardState {
            entries: vec![entry],
            ..Default::default()
        };

        state.rewrite_entry_id(&old, &EntryId::from("srv-e1"));

        assert!(state.entry(&old).is_none());
        assert_eq!(state.entry(&EntryId::from("srv-e1")).unwrap().name, "Acme");
    }
}
