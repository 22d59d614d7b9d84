//! RoomStore trait 定義
//!
//! リレープロセスが必要とするルーム状態へのアクセスをドメイン層が
//! インターフェースとして定義する。具体的な実装は Infrastructure 層が
//! 提供する（依存性の逆転）。ハンドラがグローバルなルームマップへ直接
//! 触れることはない。

use async_trait::async_trait;

use super::{
    entity::{Participant, RoomSnapshot, WinnerRecord},
    error::StoreError,
    value_object::{RoomId, Timestamp},
};

/// Summary of one room for the operational HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub participant_count: usize,
    pub winner_count: usize,
    pub created_at: Timestamp,
}

/// Lifecycle owner of all per-room raffle state.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Create the room if absent; idempotent.
    async fn ensure_room(&self, room_id: &RoomId);

    /// Full replacement of both collections (authoritative admin push);
    /// last writer wins. Creates the room if absent.
    async fn set_roster(
        &self,
        room_id: &RoomId,
        participants: Vec<Participant>,
        winners: Vec<WinnerRecord>,
    );

    /// Partial replacement of the participant list; winners untouched.
    async fn apply_participants_update(&self, room_id: &RoomId, participants: Vec<Participant>);

    /// Partial replacement of the winner list; participants untouched.
    async fn apply_winners_update(&self, room_id: &RoomId, winners: Vec<WinnerRecord>);

    /// Atomic winner append + participant removal. Returns the created
    /// record, or `None` when the room does not exist.
    async fn apply_draw_completed(
        &self,
        room_id: &RoomId,
        winner: &Participant,
        won_at: Timestamp,
    ) -> Option<WinnerRecord>;

    /// Store the latest renderable winner-announcement blob.
    async fn record_display_snapshot(&self, room_id: &RoomId, blob: String);

    /// Full snapshot for late joiners. An unknown room yields the empty
    /// triple; absence is a representable state, never an error.
    async fn snapshot(&self, room_id: &RoomId) -> RoomSnapshot;

    /// Delete the room when its viewer set becomes empty.
    async fn remove_room(&self, room_id: &RoomId);

    /// Number of live rooms.
    async fn active_rooms(&self) -> usize;

    /// Summaries of all live rooms, for the HTTP API.
    async fn list_rooms(&self) -> Vec<RoomSummary>;

    /// Detail of one room; `StoreError::RoomNotFound` when absent (the
    /// HTTP detail endpoint does distinguish absence, unlike `snapshot`).
    async fn room_summary(&self, room_id: &RoomId) -> Result<RoomSummary, StoreError>;
}
