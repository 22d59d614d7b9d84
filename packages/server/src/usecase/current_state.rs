//! UseCase: 現在状態の問い合わせ（request-current-state）
//!
//! 遅れて参加した視聴者が権威スナップショットを取得する。ルーム全体に
//! スナップショットを流すと無駄が大きいため、返信は要求者にのみ
//! ユニキャストする。存在しないルームでも失敗せず、空のスナップショット
//! を返す。

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, RoomId, RoomSnapshot, RoomStore};

/// 現在状態問い合わせのユースケース
pub struct CurrentStateUseCase {
    store: Arc<dyn RoomStore>,
    pusher: Arc<dyn EventPusher>,
}

impl CurrentStateUseCase {
    pub fn new(store: Arc<dyn RoomStore>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { store, pusher }
    }

    /// スナップショットを取得する。ルームが無ければ空トリプル。
    pub async fn execute(&self, room_id: &RoomId) -> RoomSnapshot {
        self.store.snapshot(room_id).await
    }

    /// スナップショットイベントを要求者にのみ返す。
    pub async fn reply_to(&self, requester: &ConnectionId, event_json: &str) {
        if let Err(e) = self.pusher.push_to(requester, event_json).await {
            tracing::warn!("Failed to reply current state to '{}': {}", requester, e);
        }
    }
}
