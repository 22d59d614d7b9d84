//! Conversion logic between DTOs and domain entities.
//!
//! インバウンド（DTO → ドメイン）は best-effort：不正な要素は警告して
//! 読み飛ばし、残りを受け入れる。アウトバウンド（ドメイン → DTO）は
//! 常に成功する。

use crate::domain::{EntrantName, GroupName, Participant, Timestamp, WinnerRecord};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity (best-effort)
// ========================================

impl TryFrom<dto::ParticipantDto> for Participant {
    type Error = crate::domain::ValidationError;

    fn try_from(dto: dto::ParticipantDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            sequence: dto.sequence,
            name: EntrantName::new(dto.name)?,
            group: GroupName::new(dto.group),
            added_at: Timestamp::new(dto.added_at),
        })
    }
}

impl TryFrom<dto::WinnerDto> for WinnerRecord {
    type Error = crate::domain::ValidationError;

    fn try_from(dto: dto::WinnerDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            name: EntrantName::new(dto.name)?,
            group: GroupName::new(dto.group),
            won_at: Timestamp::new(dto.won_at),
            position: dto.position,
        })
    }
}

/// Convert an inbound participant list, skipping invalid entries.
pub fn participants_from_dto(dtos: Vec<dto::ParticipantDto>) -> Vec<Participant> {
    dtos.into_iter()
        .filter_map(|dto| match Participant::try_from(dto) {
            Ok(participant) => Some(participant),
            Err(e) => {
                tracing::warn!("Skipping invalid participant in payload: {}", e);
                None
            }
        })
        .collect()
}

/// Convert an inbound winner list, skipping invalid entries.
pub fn winners_from_dto(dtos: Vec<dto::WinnerDto>) -> Vec<WinnerRecord> {
    dtos.into_iter()
        .filter_map(|dto| match WinnerRecord::try_from(dto) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping invalid winner in payload: {}", e);
                None
            }
        })
        .collect()
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Participant> for dto::ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id,
            sequence: model.sequence,
            name: model.name.into_string(),
            group: model.group.into_string(),
            added_at: model.added_at.value(),
        }
    }
}

impl From<WinnerRecord> for dto::WinnerDto {
    fn from(model: WinnerRecord) -> Self {
        Self {
            id: model.id,
            name: model.name.into_string(),
            group: model.group.into_string(),
            won_at: model.won_at.value(),
            position: model.position,
        }
    }
}
