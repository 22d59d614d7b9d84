//! UseCase layer: one use-case object per relay operation group.
//!
//! ハンドラ（UI 層）はイベントを解釈して UseCase を呼ぶだけであり、
//! 状態の変異とファンアウト対象の決定はすべてこの層で行う。

mod current_state;
mod error;
mod join_room;
mod leave_room;
mod relay_event;
mod room_query;
mod stats;
mod sync_state;

pub use current_state::CurrentStateUseCase;
pub use error::RelayError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_event::RelayEventUseCase;
pub use room_query::{GetRoomDetailError, GetRoomDetailUseCase, GetRoomsUseCase, RoomOverview};
pub use stats::{GetStatsUseCase, StatsSnapshot};
pub use sync_state::SyncStateUseCase;
