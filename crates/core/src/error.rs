//! Error types for Podium Core

use thiserror::Error;

/// Local store errors. The `LocalStore` trait never surfaces these; they are
/// logged and read as absent data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
