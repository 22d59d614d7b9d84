//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use fukubiki_shared::time::millis_to_rfc3339;

/// Health check endpoint for external monitoring.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let stats = state.get_stats_usecase.execute().await;
    Json(HealthDto {
        status: "ok".to_string(),
        uptime_secs: stats.uptime_secs,
        active_rooms: stats.active_rooms,
        total_viewers: stats.total_viewers,
    })
}

/// List all live rooms.
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let overviews = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<RoomSummaryDto> = overviews
        .into_iter()
        .map(|overview| RoomSummaryDto {
            id: overview.summary.id.into_string(),
            participant_count: overview.summary.participant_count,
            winner_count: overview.summary.winner_count,
            viewer_count: overview.viewer_count,
            created_at: millis_to_rfc3339(overview.summary.created_at.value()),
        })
        .collect();

    Json(summaries)
}

/// Detail of one room by id.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.get_room_detail_usecase.execute(&room_id).await {
        Ok((summary, snapshot, viewer_count)) => {
            // Domain Model から DTO への変換
            let detail = RoomDetailDto {
                id: summary.id.into_string(),
                participants: snapshot.participants.into_iter().map(Into::into).collect(),
                winners: snapshot.winners.into_iter().map(Into::into).collect(),
                viewer_count,
                created_at: millis_to_rfc3339(summary.created_at.value()),
            };
            Ok(Json(detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
