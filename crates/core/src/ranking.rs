//! Aggregation and ranking
//!
//! Totals only read the owned cell of each judge (judge1.strategy,
//! judge2.acquisition, judge3.private). Cells outside that diagonal are
//! ignored here, and reported at debug level when they are non-zero.

use tracing::debug;

use crate::models::{Dimension, Entry, Judge};

/// An entry's place in the ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    /// 1-based position in sorted order
    pub position: usize,
    pub entry: &'a Entry,
    pub total: u32,
}

/// Score of one dimension, taken from its owning judge
pub fn dimension_score(entry: &Entry, dimension: Dimension) -> u8 {
    entry.scores.get(dimension.judge(), dimension)
}

/// Sum of the three owned cells; range [0, 300]
pub fn total_score(entry: &Entry) -> u32 {
    Dimension::ALL
        .iter()
        .map(|&d| dimension_score(entry, d) as u32)
        .sum()
}

/// Non-zero cells written outside the owning-judge convention
pub fn off_convention_cells(entry: &Entry) -> Vec<(Judge, Dimension)> {
    let mut cells = Vec::new();
    for judge in Judge::ALL {
        for dimension in Dimension::ALL {
            if judge.dimension() != dimension && entry.scores.get(judge, dimension) != 0 {
                cells.push((judge, dimension));
            }
        }
    }
    cells
}

/// Rank entries by total score, highest first.
///
/// The sort is stable: entries with equal totals keep their input order.
pub fn rank(entries: &[Entry]) -> Vec<Standing<'_>> {
    for entry in entries {
        let stray = off_convention_cells(entry);
        if !stray.is_empty() {
            debug!(entry_id = %entry.id, cells = ?stray, "Entry has scores outside owned cells");
        }
    }

    let mut scored: Vec<(u32, &Entry)> = entries.iter().map(|e| (total_score(e), e)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (total, entry))| Standing {
            position: i + 1,
            entry,
            total,
        })
        .collect()
}

/// Highest scorer in one dimension; first in input order on ties
pub fn leader(entries: &[Entry], dimension: Dimension) -> Option<&Entry> {
    entries.iter().fold(None, |best: Option<&Entry>, e| match best {
        Some(b) if dimension_score(b, dimension) >= dimension_score(e, dimension) => Some(b),
        _ => Some(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoundId, Scores};

    fn entry(name: &str, strategy: u8, acquisition: u8, private: u8) -> Entry {
        let mut e = Entry::new(RoundId::from("r1"), name.to_string());
        e.scores = Scores::default()
            .with(Judge::Judge1, Dimension::Strategy, strategy)
            .with(Judge::Judge2, Dimension::Acquisition, acquisition)
            .with(Judge::Judge3, Dimension::Private, private);
        e
    }

    #[test]
    fn total_sums_owned_cells() {
        let e = entry("A", 80, 90, 70);
        assert_eq!(total_score(&e), 240);
        assert_eq!(dimension_score(&e, Dimension::Acquisition), 90);
    }

    #[test]
    fn total_ignores_unowned_cells() {
        let mut e = entry("A", 10, 20, 30);
        let before = total_score(&e);

        e.scores.set(Judge::Judge1, Dimension::Acquisition, 99);
        e.scores.set(Judge::Judge3, Dimension::Strategy, 50);

        assert_eq!(total_score(&e), before);
        assert_eq!(off_convention_cells(&e).len(), 2);
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let entries = vec![
            entry("A", 100, 100, 50),
            entry("B", 50, 100, 100),
            entry("C", 100, 100, 100),
        ];

        let names: Vec<_> = rank(&entries)
            .iter()
            .map(|s| s.entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn rank_positions_are_one_based() {
        let entries = vec![entry("A", 1, 0, 0), entry("B", 2, 0, 0)];
        let standings = rank(&entries);
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[0].entry.name, "B");
        assert_eq!(standings[1].position, 2);
        assert_eq!(standings[1].total, 1);
    }

    #[test]
    fn leader_prefers_first_on_tie() {
        let entries = vec![entry("A", 60, 0, 0), entry("B", 60, 0, 0), entry("C", 10, 90, 0)];
        assert_eq!(leader(&entries, Dimension::Strategy).unwrap().name, "A");
        assert_eq!(leader(&entries, Dimension::Acquisition).unwrap().name, "C");
        assert!(leader(&[], Dimension::Private).is_none());
    }
}
