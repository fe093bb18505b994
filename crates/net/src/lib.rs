//! Podium Network Library
//!
//! Remote mirror of the judging board.
//!
//! # Architecture
//!
//! - **RemoteStore**: async CRUD contract over rounds and entries
//! - **RestStore**: PostgREST-style HTTP implementation (`<url>/rest/v1/<table>`)
//! - **probe**: single-attempt reachability check
//!
//! # Usage
//!
//! ```ignore
//! let store = RestStore::new(RemoteConfig::new(url, api_key))?;
//! if probe(Some(&store)).await {
//!     let rounds = store.list_rounds().await?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod probe;
pub mod rest;
pub mod store;
mod wire;

pub use config::RemoteConfig;
pub use error::{RemoteError, Result};
pub use probe::probe;
pub use rest::RestStore;
pub use store::RemoteStore;

/// Path prefix of the REST endpoint on the remote host
pub const REST_PATH: &str = "/rest/v1";
