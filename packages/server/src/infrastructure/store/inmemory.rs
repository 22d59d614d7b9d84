//! InMemory RoomStore 実装
//!
//! ドメイン層が定義する `RoomStore` trait の具体的な実装。
//! `Mutex<HashMap<RoomId, Room>>` をインメモリ DB として使用する。
//! ルームは最初の join で遅延生成され、視聴者が 0 になった時点で削除
//! される。ルームの状態はプロセスメモリ上にのみ存在する。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Participant, Room, RoomId, RoomSnapshot, RoomStore, RoomSummary, StoreError, Timestamp,
    WinnerRecord,
};
use fukubiki_shared::time::Clock;

/// In-memory room store. One mutex over the whole map: every relay
/// operation completes its mutation before the next one is applied.
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomId, Room>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn summary_of(room: &Room) -> RoomSummary {
        RoomSummary {
            id: room.id.clone(),
            participant_count: room.participants.len(),
            winner_count: room.winners.len(),
            created_at: room.created_at,
        }
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn ensure_room(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if !rooms.contains_key(room_id) {
            let created_at = Timestamp::new(self.clock.now_millis());
            rooms.insert(room_id.clone(), Room::new(room_id.clone(), created_at));
            tracing::info!("Room '{}' created", room_id);
        }
    }

    async fn set_roster(
        &self,
        room_id: &RoomId,
        participants: Vec<Participant>,
        winners: Vec<WinnerRecord>,
    ) {
        let mut rooms = self.rooms.lock().await;
        let created_at = Timestamp::new(self.clock.now_millis());
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), created_at));
        room.set_roster(participants, winners);
    }

    async fn apply_participants_update(&self, room_id: &RoomId, participants: Vec<Participant>) {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get_mut(room_id) {
            room.apply_participants_update(participants);
        } else {
            tracing::warn!("participants update for unknown room '{}', dropped", room_id);
        }
    }

    async fn apply_winners_update(&self, room_id: &RoomId, winners: Vec<WinnerRecord>) {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get_mut(room_id) {
            room.apply_winners_update(winners);
        } else {
            tracing::warn!("winners update for unknown room '{}', dropped", room_id);
        }
    }

    async fn apply_draw_completed(
        &self,
        room_id: &RoomId,
        winner: &Participant,
        won_at: Timestamp,
    ) -> Option<WinnerRecord> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .get_mut(room_id)
            .map(|room| room.apply_draw_completed(winner, won_at))
    }

    async fn record_display_snapshot(&self, room_id: &RoomId, blob: String) {
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get_mut(room_id) {
            room.record_display(blob);
        }
    }

    async fn snapshot(&self, room_id: &RoomId) -> RoomSnapshot {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Room::snapshot)
            .unwrap_or_default()
    }

    async fn remove_room(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms.remove(room_id).is_some() {
            tracing::info!("Room '{}' deleted (no viewers left)", room_id);
        }
    }

    async fn active_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.lock().await;
        let mut summaries: Vec<RoomSummary> = rooms.values().map(Self::summary_of).collect();
        // Stable listing order for the HTTP API
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        summaries
    }

    async fn room_summary(&self, room_id: &RoomId) -> Result<RoomSummary, StoreError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(Self::summary_of)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.as_str().to_string()))
    }
}
