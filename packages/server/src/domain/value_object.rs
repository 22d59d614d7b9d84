//! Value objects for the raffle domain.
//!
//! 不正な値を型レベルで排除する。`RoomId` はクライアント生成の不透明な
//! 文字列であり、中身は解釈しない（長さと空文字列のみ検証する）。

use super::error::ValidationError;

/// Maximum accepted length of a room identifier (untrusted input).
const ROOM_ID_MAX_LEN: usize = 128;

/// Maximum accepted length of an entrant name.
const ENTRANT_NAME_MAX_LEN: usize = 256;

/// Sentinel group assigned when an entrant has no group.
pub const UNSPECIFIED_GROUP: &str = "unspecified";

/// Opaque room identifier, generated client-side and carried as a URL
/// query parameter. Uninterpreted beyond basic validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyRoomId);
        }
        if value.len() > ROOM_ID_MAX_LEN {
            return Err(ValidationError::RoomIdTooLong(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-generated identifier of one transport connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Generate a fresh connection id for a new transport session.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty display name of a raffle entrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrantName(String);

impl EntrantName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyEntrantName);
        }
        if trimmed.len() > ENTRANT_NAME_MAX_LEN {
            return Err(ValidationError::EntrantNameTooLong(trimmed.len()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Case-insensitive equality, the uniqueness rule of a roster.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

/// Group (department, team, ...) an entrant belongs to. Absent groups
/// collapse to the `UNSPECIFIED_GROUP` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::unspecified()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn unspecified() -> Self {
        Self(UNSPECIFIED_GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for GroupName {
    fn default() -> Self {
        Self::unspecified()
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
