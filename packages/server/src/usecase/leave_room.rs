//! UseCase: 切断処理
//!
//! 接続を所属ルームから外し、更新後の視聴者数を返す。視聴者が 0 に
//! なったルームは RoomStore から削除する（状態はそのルームに限って
//! 失われる。許容された仕様）。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, EventPusher, RoomId, RoomStore};

/// 切断のユースケース
pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        store: Arc<dyn RoomStore>,
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
        }
    }

    /// 切断を実行する。
    ///
    /// # Returns
    ///
    /// 影響を受けたルームと残りの視聴者数。どのルームにも属していない
    /// 接続では `None`。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<(RoomId, usize)> {
        // 1. EventPusher から接続を外す
        self.pusher.unregister(connection_id).await;

        // 2. 視聴者集合から外す
        let (room_id, remaining) = self.registry.leave(connection_id).await?;

        // 3. 空になったルームは削除
        if remaining == 0 {
            self.store.remove_room(&room_id).await;
        }

        Some((room_id, remaining))
    }

    /// 更新後の視聴者数を残りのルームメンバー全体へブロードキャストする。
    pub async fn broadcast_viewer_count(&self, room_id: &RoomId, event_json: &str) {
        let targets = self.registry.members(room_id).await;
        if let Err(e) = self.pusher.broadcast(targets, event_json).await {
            tracing::warn!("Failed to broadcast viewer count to '{}': {}", room_id, e);
        }
    }
}
