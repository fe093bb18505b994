//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Entry, Round, RoundId};

/// At most one round in the collection may be active
pub fn assert_round_invariants(rounds: &[Round]) {
    let active = rounds.iter().filter(|r| r.is_active).count();
    debug_assert!(
        active <= 1,
        "{} rounds are active, expected 0 or 1",
        active
    );

    let mut seen = HashSet::new();
    for round in rounds {
        debug_assert!(
            seen.insert(&round.id),
            "Round id {} appears more than once",
            round.id
        );
    }
}

/// Every entry in a per-round collection belongs to that round
pub fn assert_entry_invariants(round_id: &RoundId, entries: &[Entry]) {
    let mut seen = HashSet::new();
    for entry in entries {
        debug_assert!(
            entry.round_id == *round_id,
            "Entry {} belongs to round {} but is stored under {}",
            entry.id,
            entry.round_id,
            round_id
        );

        debug_assert!(
            seen.insert(&entry.id),
            "Entry id {} appears more than once",
            entry.id
        );
    }
}
