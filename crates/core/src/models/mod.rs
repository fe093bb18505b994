//! Data models for Podium

mod entry;
mod id;
mod round;
mod scores;

pub use entry::*;
pub use id::*;
pub use round::*;
pub use scores::*;
