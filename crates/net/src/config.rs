//! Remote endpoint configuration

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    10
}

fn default_rounds_table() -> String {
    "episodes".to_string()
}

fn default_entries_table() -> String {
    "brands".to_string()
}

/// Where the hosted store lives and how to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous API key, sent as `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_rounds_table")]
    pub rounds_table: String,
    #[serde(default = "default_entries_table")]
    pub entries_table: String,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_secs: default_timeout_secs(),
            rounds_table: default_rounds_table(),
            entries_table: default_entries_table(),
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
