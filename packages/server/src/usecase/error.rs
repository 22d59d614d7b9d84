//! Error types of the use-case layer.

use thiserror::Error;

/// Failures of the relay fan-out operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// `start-raffle` requires a non-empty participant list.
    #[error("cannot start a raffle with an empty participant list")]
    EmptyRoster,

    /// Fan-out to the room failed as a whole.
    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}
