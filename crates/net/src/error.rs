//! Remote store error types

/// Remote result type
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Failure of a single remote call. Callers never assume partial success.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote store returned no row")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid remote configuration: {0}")]
    Config(String),

    #[error("Remote store unavailable")]
    Unavailable,
}
