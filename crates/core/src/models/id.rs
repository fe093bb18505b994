//! Opaque record identifiers
//!
//! Identifiers are assigned by the remote store when a record is created
//! online. Offline (or when the remote create fails) a placeholder is minted
//! locally and kept for the lifetime of the record.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix carried by every locally minted identifier
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Mint a placeholder identifier: `local-<unix-millis>-<8 hex>`
fn mint_local() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}-{}",
        LOCAL_ID_PREFIX,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Mint a fresh local placeholder
            pub fn mint_local() -> Self {
                Self(mint_local())
            }

            /// True if this identifier was never replaced by a remote one
            pub fn is_local(&self) -> bool {
                self.0.starts_with(LOCAL_ID_PREFIX)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

record_id!(
    /// Identifier of a Round (an "episode" on the remote side)
    RoundId
);

record_id!(
    /// Identifier of an Entry (a "brand" on the remote side)
    EntryId
);
