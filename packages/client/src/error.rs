//! Error types for the raffle client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay rejected the connection (e.g. malformed room id)
    #[error("Connection rejected by the relay: {0}")]
    ConnectionRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
