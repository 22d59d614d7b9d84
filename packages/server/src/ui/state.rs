//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    CurrentStateUseCase, GetRoomDetailUseCase, GetRoomsUseCase, GetStatsUseCase, JoinRoomUseCase,
    LeaveRoomUseCase, RelayEventUseCase, SyncStateUseCase,
};

/// Shared application state: the use-case objects the handlers dispatch to.
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub relay_event_usecase: Arc<RelayEventUseCase>,
    pub sync_state_usecase: Arc<SyncStateUseCase>,
    pub current_state_usecase: Arc<CurrentStateUseCase>,
    pub get_stats_usecase: Arc<GetStatsUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
