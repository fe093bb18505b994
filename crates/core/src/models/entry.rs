//! Entry model - a competitor ("brand") scored within one Round

use serde::{Deserialize, Serialize};

use super::scores::null_as_default;
use super::{EntryId, RoundId, Scores};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Owning round; stored as `episode_id` on the wire
    #[serde(rename = "episode_id")]
    pub round_id: RoundId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scores: Scores,
}

impl Entry {
    /// New entry with all-zero scores and a locally minted id
    pub fn new(round_id: RoundId, name: String) -> Self {
        Self {
            id: EntryId::mint_local(),
            round_id,
            name,
            scores: Scores::default(),
        }
    }
}
