//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{ParticipantDto, WinnerDto};

/// `GET /api/health`: process health for external monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub uptime_secs: u64,
    pub active_rooms: usize,
    pub total_viewers: usize,
}

/// `GET /api/rooms`: one summary per live room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub participant_count: usize,
    pub winner_count: usize,
    pub viewer_count: usize,
    pub created_at: String,
}

/// `GET /api/rooms/{room_id}`: full detail of one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDto>,
    pub winners: Vec<WinnerDto>,
    pub viewer_count: usize,
    pub created_at: String,
}
