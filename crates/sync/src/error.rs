//! Caller-contract errors
//!
//! Remote failures never show up here; they are logged by the mirror.

use podium_core::{EntryId, RoundId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Name must not be blank")]
    BlankName,

    #[error("Unknown round: {0}")]
    UnknownRound(RoundId),

    #[error("Unknown entry: {0}")]
    UnknownEntry(EntryId),

    #[error("No round selected")]
    NoActiveRound,
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Trimmed name, or `BlankName` if nothing is left
pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SyncError::BlankName);
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Week 3 ").unwrap(), "Week 3");
        assert_eq!(normalize_name(" \t"), Err(SyncError::BlankName));
    }
}
