//! Error types of the domain layer.

use thiserror::Error;

/// Validation failures when constructing value objects from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id too long: {0} bytes")]
    RoomIdTooLong(usize),

    #[error("entrant name must not be empty")]
    EmptyEntrantName,

    #[error("entrant name too long: {0} bytes")]
    EntrantNameTooLong(usize),
}

/// Failures of the room store.
///
/// Absence of a room is not an error for reads: `snapshot` answers an
/// empty triple so a late joiner on an unknown room gets a valid state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// Failures when pushing events to connections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("connection '{0}' not registered")]
    ConnectionNotFound(String),

    #[error("failed to push event: {0}")]
    PushFailed(String),
}
