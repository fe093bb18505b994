//! Round model - one scoring session ("episode")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RoundId;

/// A Round groups the entries scored in one session.
///
/// At most one Round in a collection is active; the engine enforces that,
/// not the stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

impl Round {
    /// New active round with a locally minted id
    pub fn new(name: String) -> Self {
        Self {
            id: RoundId::mint_local(),
            name,
            created_at: Utc::now(),
            is_active: true,
        }
    }
}

/// Clear every active flag, then set it on `id` (if present)
pub fn activate_exclusive(rounds: &mut [Round], id: &RoundId) {
    for round in rounds.iter_mut() {
        round.is_active = round.id == *id;
    }
}
